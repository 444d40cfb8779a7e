use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use wacomiv_setup::SetupConfig;
use wacomiv_transport::{BaudRate, LinkConfig};

use crate::exit::{transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod attach;
pub mod decode;
pub mod probe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bring up a tablet and print decoded events.
    Attach(AttachArgs),
    /// Identify a tablet without starting it streaming.
    Probe(ProbeArgs),
    /// Decode a captured byte stream.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Attach(args) => attach::run(args, format),
        Command::Probe(args) => probe::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Serial line and handshake options shared by the device commands.
#[derive(Args, Debug)]
pub struct LineArgs {
    /// Serial device the tablet is attached to.
    #[arg(env = "WACOMIV_DEVICE")]
    pub device: PathBuf,
    /// Line speed in bits per second.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// Wait for each query response (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub timeout: String,
    /// Do not ask the tablet for its configuration string.
    #[arg(long)]
    pub no_config_query: bool,
}

impl LineArgs {
    pub fn link_config(&self) -> CliResult<LinkConfig> {
        let baud = BaudRate::try_from(self.baud).map_err(|err| transport_error("--baud", err))?;
        Ok(LinkConfig {
            baud,
            ..LinkConfig::default()
        })
    }

    pub fn setup_config(&self, start_streaming: bool) -> CliResult<SetupConfig> {
        Ok(SetupConfig {
            timeout: parse_duration(&self.timeout)?,
            query_configuration: !self.no_config_query,
            start_streaming,
            ..SetupConfig::default()
        })
    }
}

#[derive(Args, Debug)]
pub struct AttachArgs {
    #[command(flatten)]
    pub line: LineArgs,
    /// Exit after printing N events.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub line: LineArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file to decode. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `5s`, `150ms`, or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
