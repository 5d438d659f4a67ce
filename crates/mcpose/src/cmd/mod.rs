use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use mcpose_transport::DEFAULT_PORT;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Receive datagrams and print the resulting skeleton pose.
    Listen(ListenArgs),
    /// Decode a captured datagram file.
    Decode(DecodeArgs),
    /// Send a datagram to a receiver.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// UDP port to bind.
    #[arg(long, short = 'p', env = "MCPOSE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Local address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,
    /// Processing cycle interval (e.g. 16ms, 1s).
    #[arg(long, default_value = "16ms")]
    pub interval: String,
    /// Exit after N datagrams have been processed.
    #[arg(long)]
    pub count: Option<usize>,
    /// Kernel receive buffer size in bytes.
    #[arg(long, value_name = "BYTES")]
    pub recv_buffer: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Datagram file to decode (`-` reads stdin).
    pub file: PathBuf,
    /// Print the skeleton after apply and mirror instead of raw transforms.
    #[arg(long)]
    pub apply: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Receiver address.
    #[arg(long, default_value_t = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))]
    pub to: SocketAddr,
    /// Send the contents of a datagram file.
    #[arg(long, conflicts_with_all = ["bone", "rotation", "position"])]
    pub file: Option<PathBuf>,
    /// Protocol bone id for a generated single-bone datagram.
    #[arg(long, allow_hyphen_values = true, required_unless_present = "file")]
    pub bone: Option<i16>,
    /// Rotation quaternion x,y,z,w.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,0,0,1")]
    pub rotation: Vec<f32>,
    /// Position x,y,z.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,0,0")]
    pub position: Vec<f32>,
    /// Number of times to send the datagram.
    #[arg(long, default_value_t = 1)]
    pub repeat: usize,
    /// Pause between repeated sends (e.g. 20ms).
    #[arg(long, default_value = "20ms")]
    pub interval: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, to_duration): (&str, fn(u64) -> Duration) =
        if let Some(millis) = input.strip_suffix("ms") {
            (millis, Duration::from_millis)
        } else if let Some(secs) = input.strip_suffix('s') {
            (secs, Duration::from_secs)
        } else {
            (input, Duration::from_millis)
        };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(to_duration(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration("16ms").unwrap(), Duration::from_millis(16));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration(" 40 ").unwrap(), Duration::from_millis(40));
        assert_eq!(parse_duration("250").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_bad_durations() {
        for input in ["", "0ms", "abc", "-5s", "5m", "ms"] {
            let err = parse_duration(input).unwrap_err();
            assert_eq!(err.code, USAGE, "{input}");
        }
    }
}
