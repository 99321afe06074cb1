mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, TransportKind};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "smcprims", version, about = "Apple SMC key CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "SMCPRIMS_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Controller backend. Defaults to iokit on macOS and sim elsewhere.
    #[arg(long, value_name = "KIND", env = "SMCPRIMS_TRANSPORT", global = true)]
    transport: Option<TransportKind>,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let transport = cli.transport.unwrap_or_else(TransportKind::platform_default);
    let result = cmd::run(cli.command, transport, format);

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
    fn parses_read_subcommand() {
        let cli = Cli::try_parse_from(["smcprims", "--transport", "sim", "read", "F0Ac"])
            .expect("read args should parse");
        assert!(matches!(cli.command, Command::Read(ref args) if args.key == "F0Ac"));
        assert!(matches!(cli.transport, Some(TransportKind::Sim)));
    }

    #[test]
    fn parses_write_subcommand() {
        let cli = Cli::try_parse_from(["smcprims", "write", "FS! ", "0001"])
            .expect("write args should parse");
        assert!(matches!(cli.command, Command::Write(ref args) if args.data == "0001"));
    }

    #[test]
    fn write_requires_payload() {
        let err = Cli::try_parse_from(["smcprims", "write", "FS! "])
            .expect_err("missing payload should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["smcprims", "fans", "--format", "json"])
            .expect("fans args should parse");
        assert!(matches!(cli.command, Command::Fans(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }

    #[test]
    fn rejects_unknown_transport() {
        let err = Cli::try_parse_from(["smcprims", "--transport", "usb", "list"])
            .expect_err("unknown transport should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
