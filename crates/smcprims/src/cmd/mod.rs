use clap::{Args, Subcommand, ValueEnum};
use smcprims_client::{SimulatedSmc, SmcClient};
use smcprims_transport::Transport;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod fans;
pub mod list;
pub mod read;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read one key and print its decoded value.
    Read(ReadArgs),
    /// Write raw bytes to a key after checking its declared size.
    Write(WriteArgs),
    /// Enumerate every key with its value.
    List(ListArgs),
    /// Print per-fan speeds and modes.
    Fans(FansArgs),
    /// Show version information.
    Version(VersionArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// The AppleSMC IOKit service.
    Iokit,
    /// An in-memory two-fan controller.
    Sim,
}

impl TransportKind {
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Iokit
        } else {
            Self::Sim
        }
    }
}

pub fn run(command: Command, transport: TransportKind, format: OutputFormat) -> CliResult<i32> {
    let command = match command {
        Command::Version(args) => return version::run(args),
        other => other,
    };

    match transport {
        TransportKind::Sim => {
            let mut client = SmcClient::new(SimulatedSmc::demo());
            dispatch(&mut client, command, format)
        }
        TransportKind::Iokit => run_iokit(command, format),
    }
}

#[cfg(target_os = "macos")]
fn run_iokit(command: Command, format: OutputFormat) -> CliResult<i32> {
    use smcprims_transport::IoKitConnection;

    use crate::exit::transport_error;

    let conn = IoKitConnection::open().map_err(|e| transport_error("open AppleSMC", e))?;
    let mut client = SmcClient::new(conn);
    let result = dispatch(&mut client, command, format);
    client
        .into_inner()
        .close()
        .map_err(|e| transport_error("close AppleSMC", e))?;
    result
}

#[cfg(not(target_os = "macos"))]
fn run_iokit(_command: Command, _format: OutputFormat) -> CliResult<i32> {
    Err(crate::exit::transport_error(
        "open AppleSMC",
        smcprims_transport::TransportError::Unsupported("iokit transport requires macOS"),
    ))
}

fn dispatch<T: Transport>(
    client: &mut SmcClient<T>,
    command: Command,
    format: OutputFormat,
) -> CliResult<i32> {
    tracing::debug!(transport = client.transport().transport_name(), "dispatching");
    match command {
        Command::Read(args) => read::run(client, args, format),
        Command::Write(args) => write::run(client, args, format),
        Command::List(args) => list::run(client, args, format),
        Command::Fans(args) => fans::run(client, args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Key name, 1-4 characters (shorter names are space padded).
    pub key: String,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Key name, 1-4 characters (shorter names are space padded).
    pub key: String,
    /// Payload as hex digits, two per byte (e.g. 0001).
    pub data: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Stop after this many keys.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct FansArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
