use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `kafka-bridge` - relays messages from a Kafka REST proxy to a downstream sink.
#[derive(Parser, Debug)]
#[command(name = "kafka-bridge")]
#[command(version)]
#[command(
    about = "Consumes from a Kafka REST proxy and forwards to a queue proxy or plain HTTP endpoint.",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file; environment variables override its values
    #[arg(short, long, env = "BRIDGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Consume, enrich and forward until interrupted (default)
    Run,

    /// Probe the source and the sink once and exit non-zero if not good to go
    Check,
}

impl Cli {
    pub fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}
