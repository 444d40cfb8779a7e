mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wacomiv", version, about = "Wacom protocol IV serial tablet driver")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attach_subcommand() {
        let cli = Cli::try_parse_from([
            "wacomiv",
            "attach",
            "/dev/ttyS0",
            "--baud",
            "19200",
            "--count",
            "10",
        ])
        .expect("attach args should parse");

        match cli.command {
            Command::Attach(args) => {
                assert_eq!(args.line.baud, 19200);
                assert_eq!(args.count, Some(10));
                assert!(!args.line.no_config_query);
            }
            other => panic!("expected attach, got {other:?}"),
        }
    }

    #[test]
    fn parses_probe_subcommand() {
        let cli = Cli::try_parse_from([
            "wacomiv",
            "probe",
            "/dev/ttyUSB0",
            "--timeout",
            "500ms",
            "--no-config-query",
        ])
        .expect("probe args should parse");
        match cli.command {
            Command::Probe(args) => {
                assert_eq!(args.line.timeout, "500ms");
                assert!(args.line.no_config_query);
            }
            other => panic!("expected probe, got {other:?}"),
        }
    }

    #[test]
    fn decode_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["wacomiv", "--format", "json", "decode"])
            .expect("decode args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Decode(ref args) if args.file.is_none()));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = Cli::try_parse_from(["wacomiv", "--format", "xml", "version"])
            .expect_err("unknown format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
