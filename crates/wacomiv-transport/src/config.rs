use std::fmt;
use std::time::Duration;

use crate::error::{Result, TransportError};

/// Line rates spoken by protocol IV tablets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaudRate {
    B1200,
    B2400,
    B4800,
    #[default]
    B9600,
    B19200,
    B38400,
}

impl BaudRate {
    /// Bits per second.
    pub fn bits_per_second(self) -> u32 {
        match self {
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = TransportError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1200 => Ok(BaudRate::B1200),
            2400 => Ok(BaudRate::B2400),
            4800 => Ok(BaudRate::B4800),
            9600 => Ok(BaudRate::B9600),
            19200 => Ok(BaudRate::B19200),
            38400 => Ok(BaudRate::B38400),
            other => Err(TransportError::UnsupportedBaud(other)),
        }
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits_per_second())
    }
}

/// Serial line settings.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Fixed line rate. Default: 9600.
    pub baud: BaudRate,
    /// How long a read may sit idle before returning `TimedOut`.
    pub read_poll: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud: BaudRate::default(),
            read_poll: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baud_from_known_rates() {
        assert_eq!(BaudRate::try_from(9600).unwrap(), BaudRate::B9600);
        assert_eq!(BaudRate::try_from(38400).unwrap(), BaudRate::B38400);
        assert_eq!(BaudRate::B19200.bits_per_second(), 19200);
    }

    #[test]
    fn baud_rejects_unknown_rate() {
        let err = BaudRate::try_from(115200).unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedBaud(115200)));
    }

    #[test]
    fn default_link_is_9600() {
        let config = LinkConfig::default();
        assert_eq!(config.baud, BaudRate::B9600);
        assert_eq!(config.read_poll, Duration::from_millis(100));
        assert_eq!(config.baud.to_string(), "9600");
    }
}
