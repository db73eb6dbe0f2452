use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use core::time::Duration;
use snowleaf::{SnowflakeId, SystemClock, TWITTER_EPOCH, TimeSource};

/// Command-line and environment configuration for the `snowleaf` binary.
///
/// Every global option can also be supplied through the environment (or a
/// `.env` file in the working directory).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowleaf",
    version,
    about = "Generate and decode 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Worker ID stamped into generated IDs (0..=1023).
    ///
    /// When omitted, an ID is acquired for `HOST_IDENTITY` from an in-process
    /// registry, which always starts from 0.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", global = true)]
    pub worker_id: Option<u64>,

    /// Identity of this host, typically `ip:port`. Used for worker ID
    /// acquisition and logging.
    ///
    /// Environment variable: `HOST_IDENTITY`
    #[arg(long, env = "HOST_IDENTITY", default_value_t = String::from("127.0.0.1"), global = true)]
    pub host_identity: String,

    /// Epoch the embedded timestamps are measured from, in Unix milliseconds.
    ///
    /// Environment variable: `EPOCH_MILLIS`
    #[arg(long, env = "EPOCH_MILLIS", default_value_t = TWITTER_EPOCH.as_millis() as u64, global = true)]
    pub epoch_millis: u64,

    /// Time source driving the generator.
    #[arg(long, value_enum, default_value_t = ClockKind::System, global = true)]
    pub clock: ClockKind,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate IDs, one per line. Ctrl+C stops early.
    Generate {
        /// Number of IDs to print.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,
    },
    /// Print the fields packed into an ID.
    Decode {
        /// The raw 64-bit ID.
        id: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    /// Wall clock; can move backwards under NTP adjustments.
    System,
    /// Wall clock sampled at startup, then advanced monotonically.
    Monotonic,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub worker_id: Option<u64>,
    pub host_identity: String,
    pub epoch: Duration,
    pub clock: ClockKind,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if let Some(worker_id) = args
            .worker_id
            .filter(|worker_id| *worker_id > SnowflakeId::MAX_WORKER_ID)
        {
            bail!(
                "WORKER_ID ({}) exceeds the maximum worker ID ({})",
                worker_id,
                SnowflakeId::MAX_WORKER_ID
            );
        }

        if args.host_identity.trim().is_empty() {
            bail!("HOST_IDENTITY must not be empty");
        }

        let now = SystemClock.current_millis();
        if args.epoch_millis > now {
            bail!(
                "EPOCH_MILLIS ({}) lies in the future (now = {})",
                args.epoch_millis,
                now
            );
        }

        if let Command::Generate { count: 0 } = args.command {
            bail!("--count must be greater than 0");
        }

        Ok(Self {
            worker_id: args.worker_id,
            host_identity: args.host_identity,
            epoch: Duration::from_millis(args.epoch_millis),
            clock: args.clock,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let args =
            CliArgs::try_parse_from(core::iter::once("snowleaf").chain(args.iter().copied()))?;
        CliConfig::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&["--host-identity", "10.0.0.1:8080", "generate"]).unwrap();
        assert_eq!(config.host_identity, "10.0.0.1:8080");
        assert_eq!(config.epoch, TWITTER_EPOCH);
        assert_eq!(config.clock, ClockKind::System);
        assert_eq!(config.command, Command::Generate { count: 1 });
    }

    #[test]
    fn global_options_after_subcommand() {
        let config = parse(&[
            "generate",
            "-n",
            "10",
            "--worker-id",
            "1023",
            "--clock",
            "monotonic",
        ])
        .unwrap();
        assert_eq!(config.worker_id, Some(1023));
        assert_eq!(config.clock, ClockKind::Monotonic);
        assert_eq!(config.command, Command::Generate { count: 10 });
    }

    #[test]
    fn rejects_out_of_range_worker_id() {
        let err = parse(&["--worker-id", "1024", "generate"]).unwrap_err();
        assert!(err.to_string().contains("WORKER_ID"));
    }

    #[test]
    fn rejects_zero_count() {
        assert!(parse(&["generate", "--count", "0"]).is_err());
    }

    #[test]
    fn rejects_future_epoch() {
        let err = parse(&["--epoch-millis", &u64::MAX.to_string(), "decode", "1"]).unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn rejects_empty_host_identity() {
        assert!(parse(&["--host-identity", " ", "decode", "1"]).is_err());
    }
}
