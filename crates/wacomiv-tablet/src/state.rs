use serde::Serialize;

use crate::event::Tool;
use crate::model::{Model, Version};

/// Most extra low-order pressure bits any model folds in.
pub const MAX_EXTRA_PRESSURE_BITS: u8 = 2;

/// Default eraser flag within the packet button field.
pub const DEFAULT_ERASER_MASK: u8 = 0x04;

/// A pair of per-axis values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extent {
    pub x: u32,
    pub y: u32,
}

impl Extent {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Ranges published to the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Maximum X and Y coordinates, once known.
    pub bounds: Option<Extent>,
    /// Always `2^(7 + extra_pressure_bits) - 1`.
    pub max_pressure: u16,
    /// Lines per inch on each axis, once known.
    pub resolution: Option<Extent>,
}

/// Everything learned about one connected tablet.
///
/// Owned by whoever processes the tablet's bytes and passed by exclusive
/// reference to the decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabletState {
    pub(crate) model: Model,
    pub(crate) version: Version,
    pub(crate) extra_pressure_bits: u8,
    pub(crate) eraser_button_mask: u8,
    pub(crate) supports_stylus2: bool,
    pub(crate) covers_screen: bool,
    pub(crate) current_tool: Tool,
    pub(crate) tool_in_proximity: bool,
    pub(crate) bounds: Option<Extent>,
    pub(crate) resolution: Option<Extent>,
    pub(crate) packets: u32,
}

impl TabletState {
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            version: Version::default(),
            extra_pressure_bits: 1,
            eraser_button_mask: DEFAULT_ERASER_MASK,
            supports_stylus2: false,
            covers_screen: false,
            current_tool: Tool::None,
            tool_in_proximity: false,
            bounds: None,
            resolution: None,
            packets: 0,
        }
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn extra_pressure_bits(&self) -> u8 {
        self.extra_pressure_bits
    }

    /// Override the pressure width, e.g. when decoding a capture offline.
    /// Values above [`MAX_EXTRA_PRESSURE_BITS`] are clamped.
    pub fn set_extra_pressure_bits(&mut self, bits: u8) {
        self.extra_pressure_bits = bits.min(MAX_EXTRA_PRESSURE_BITS);
    }

    pub fn eraser_button_mask(&self) -> u8 {
        self.eraser_button_mask
    }

    pub fn supports_stylus2(&self) -> bool {
        self.supports_stylus2
    }

    /// True for display tablets (the Cintiq family).
    pub fn covers_screen(&self) -> bool {
        self.covers_screen
    }

    /// Tool reported by the last packet.
    pub fn current_tool(&self) -> Tool {
        self.current_tool
    }

    pub fn bounds(&self) -> Option<Extent> {
        self.bounds
    }

    pub fn resolution(&self) -> Option<Extent> {
        self.resolution
    }

    /// Packets decoded so far.
    pub fn packets(&self) -> u32 {
        self.packets
    }

    pub fn max_pressure(&self) -> u16 {
        (1u16 << (7 + self.extra_pressure_bits)) - 1
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            bounds: self.bounds,
            max_pressure: self.max_pressure(),
            resolution: self.resolution,
        }
    }
}

impl Default for TabletState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = TabletState::new();
        assert_eq!(state.model(), Model::Unknown(0));
        assert_eq!(state.extra_pressure_bits(), 1);
        assert_eq!(state.eraser_button_mask(), 0x04);
        assert!(!state.supports_stylus2());
        assert_eq!(state.current_tool(), Tool::None);
        assert_eq!(state.max_pressure(), 255);
        assert!(state.bounds().is_none());
        assert!(state.resolution().is_none());
    }

    #[test]
    fn pressure_bound_follows_extra_bits() {
        let mut state = TabletState::new();
        for (bits, bound) in [(0, 127), (1, 255), (2, 511)] {
            state.set_extra_pressure_bits(bits);
            assert_eq!(state.max_pressure(), bound);
            assert_eq!(state.capabilities().max_pressure, bound);
        }
    }

    #[test]
    fn extra_bits_are_clamped() {
        let mut state = TabletState::new();
        state.set_extra_pressure_bits(9);
        assert_eq!(state.extra_pressure_bits(), MAX_EXTRA_PRESSURE_BITS);
        assert_eq!(state.max_pressure(), 511);
    }
}
