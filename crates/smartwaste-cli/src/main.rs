//! SmartWaste CLI - Command Line Interface for SmartWaste Training
//!
//! The main entry point for the `smartwaste` command-line tool.
//!
//! # Commands
//! - `smartwaste train` - Start a training job and follow it to completion
//! - `smartwaste watch` - Attach to a training job already in progress
//! - `smartwaste status` - Print the current training status
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod presenter;

use cli::{Cli, Commands};
use error::{CliError, CliResult};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Train(args) => execute_async(commands::train::execute(args, cli.quiet)),
        Commands::Watch(args) => execute_async(commands::watch::execute(args, cli.quiet)),
        Commands::Status(args) => execute_async(commands::status::execute(args)),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "smartwaste_cli=debug,smartwaste_monitor=debug"
    } else {
        "smartwaste_cli=warn,smartwaste_monitor=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Drive a command on a single-threaded runtime
fn execute_async<F: std::future::Future<Output = CliResult<()>>>(future: F) -> CliResult<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Other(e.to_string()))?
        .block_on(future)
}
