//! Watch - Attach to a Running Training Job
//!
//! Asks the service whether a run is in progress and, if so, follows it the
//! same way `train` does.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::sync::Arc;

use smartwaste_monitor::TrainingMonitor;

use super::train::finish_run;
use super::utils::{connect, print_info, resolve_config};
use crate::cli::WatchArgs;
use crate::error::CliResult;
use crate::presenter::TerminalPresenter;

/// Execute the `watch` command
pub async fn execute(args: WatchArgs, quiet: bool) -> CliResult<()> {
    let mut config = resolve_config(&args.connection)?;
    if let Some(ms) = args.poll_interval_ms {
        config.monitor.poll_interval_ms = ms;
    }
    config.validate()?;

    let api = connect(&config).await?;
    let presenter = Arc::new(TerminalPresenter::new(quiet));
    let mut monitor =
        TrainingMonitor::new(api.clone(), presenter).with_poll_interval(config.poll_interval());

    if !monitor.check_training_status().await? {
        if !quiet {
            print_info("No training in progress");
        }
        return Ok(());
    }

    let outcome = monitor.wait_for_completion().await?;
    finish_run(api.as_ref(), outcome, quiet).await
}
