//! Train - Start a Training Run
//!
//! Submits a training request to the SmartWaste service and follows the run
//! until the service reports it finished.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::sync::Arc;

use smartwaste_monitor::{
    MonitorConfig, TrainingApi, TrainingMonitor, TrainingOutcome, TrainingRequest,
};

use super::utils::{
    connect, fetch_system_status, print_header, print_info, print_kv, resolve_config,
};
use crate::cli::TrainArgs;
use crate::error::CliResult;
use crate::presenter::TerminalPresenter;

// =============================================================================
// Execute Command
// =============================================================================

/// Execute the `train` command
pub async fn execute(args: TrainArgs, quiet: bool) -> CliResult<()> {
    let mut config = resolve_config(&args.connection)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let request = config.training_request();
    request.validate()?;

    if !quiet {
        print_training_info(&config, &request);
    }

    let api = connect(&config).await?;
    let presenter = Arc::new(TerminalPresenter::new(quiet));
    let mut monitor =
        TrainingMonitor::new(api.clone(), presenter).with_poll_interval(config.poll_interval());

    monitor.start_training(request).await?;

    if args.detach {
        if !quiet {
            print_info("Detached. Run `smartwaste watch` to follow progress.");
        }
        return Ok(());
    }

    let outcome = monitor.wait_for_completion().await?;
    finish_run(api.as_ref(), outcome, quiet).await
}

/// Show the refreshed model after a successful run and map the outcome onto
/// the exit status
pub(crate) async fn finish_run(
    api: &dyn TrainingApi,
    outcome: TrainingOutcome,
    quiet: bool,
) -> CliResult<()> {
    if outcome.is_success() && !quiet {
        if let Some(system) = fetch_system_status(api).await {
            print_kv("Model Accuracy", &system.model.accuracy_label());
            if !system.model.ai_level.is_empty() {
                print_kv("AI Level", &system.model.ai_level);
            }
            print_kv("Runs Completed", &system.training.total_count.to_string());
        }
    }
    outcome.into_result().map(|_| ())?;
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

fn apply_overrides(config: &mut MonitorConfig, args: &TrainArgs) {
    if let Some(epochs) = args.epochs {
        config.training.epochs = epochs;
    }
    if let Some(lr) = args.lr {
        config.training.learning_rate = lr;
    }
    if let Some(batch_size) = args.batch_size {
        config.training.batch_size = batch_size;
    }
    if let Some(ms) = args.poll_interval_ms {
        config.monitor.poll_interval_ms = ms;
    }
}

fn print_training_info(config: &MonitorConfig, request: &TrainingRequest) {
    print_header("SmartWaste Training");
    print_kv("Server", &config.server.url);
    print_kv("Epochs", &request.epochs.to_string());
    print_kv("Learning rate", &request.learning_rate.to_string());
    print_kv("Batch size", &request.batch_size.to_string());
    println!();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConnectionArgs;
    use crate::error::CliError;
    use smartwaste_monitor::{HttpTrainingApi, MonitorError};

    fn args() -> TrainArgs {
        TrainArgs {
            connection: ConnectionArgs {
                server: None,
                config: None,
            },
            epochs: Some(40),
            lr: None,
            batch_size: Some(64),
            poll_interval_ms: Some(500),
            detach: false,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = MonitorConfig::default();
        apply_overrides(&mut config, &args());

        assert_eq!(config.training_request(), TrainingRequest::new(40, 0.001, 64));
        assert_eq!(config.monitor.poll_interval_ms, 500);
    }

    #[tokio::test]
    async fn test_failed_outcome_is_job_failed() {
        let api = HttpTrainingApi::new("http://127.0.0.1:9");
        let err = finish_run(
            &api,
            TrainingOutcome::Failed {
                message: "out of memory".to_string(),
            },
            true,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            &err,
            CliError::Monitor(MonitorError::JobFailed(m)) if m == "out of memory"
        ));
        assert_eq!(err.to_string(), "Training failed: out of memory");
    }

    #[tokio::test]
    async fn test_succeeded_outcome_is_ok() {
        let api = HttpTrainingApi::new("http://127.0.0.1:9");
        let outcome = TrainingOutcome::Succeeded {
            test_accuracy: 0.93,
            message: String::new(),
        };
        assert!(finish_run(&api, outcome, true).await.is_ok());
    }
}
