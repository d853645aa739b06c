//! CLI - Command Line Interface Definitions
//!
//! Defines the CLI structure using clap derive macros.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// SmartWaste - train and monitor the waste classification model
#[derive(Parser, Debug)]
#[command(
    name = "smartwaste",
    author = "AutomataNexus Development Team",
    version,
    about = "SmartWaste CLI - Start and monitor waste classifier training",
    long_about = "Talks to a running SmartWaste classification service.\n\n\
                  Use this CLI to start training runs, follow their progress and attach to runs already in progress."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a training run and follow it to completion
    Train(TrainArgs),

    /// Attach to a training run already in progress
    Watch(WatchArgs),

    /// Show the current training status
    Status(StatusArgs),
}

/// Connection options shared by every command
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Server URL (overrides config and SMARTWASTE_SERVER_URL)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Arguments for the `train` command
#[derive(Parser, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Number of epochs
    #[arg(short, long)]
    pub epochs: Option<u32>,

    /// Learning rate
    #[arg(long)]
    pub lr: Option<f64>,

    /// Batch size
    #[arg(short, long)]
    pub batch_size: Option<u32>,

    /// Milliseconds between status polls
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Return as soon as the service accepts the run
    #[arg(long)]
    pub detach: bool,
}

/// Arguments for the `watch` command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Milliseconds between status polls
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
}

/// Arguments for the `status` command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print training and system status as JSON
    #[arg(long)]
    pub json: bool,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_train_overrides_parse() {
        let cli = Cli::parse_from([
            "smartwaste",
            "train",
            "--epochs",
            "30",
            "--lr",
            "0.0005",
            "--batch-size",
            "16",
            "--server",
            "http://waste.local:5000",
            "--detach",
        ]);
        match cli.command {
            Commands::Train(args) => {
                assert_eq!(args.epochs, Some(30));
                assert_eq!(args.lr, Some(0.0005));
                assert_eq!(args.batch_size, Some(16));
                assert_eq!(
                    args.connection.server.as_deref(),
                    Some("http://waste.local:5000")
                );
                assert!(args.detach);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_quiet_after_subcommand() {
        let cli = Cli::parse_from(["smartwaste", "watch", "--quiet"]);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Watch(_)));
    }
}
