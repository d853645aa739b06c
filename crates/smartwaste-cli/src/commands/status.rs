//! Status - Show Training Status
//!
//! One-shot query of the training status endpoint, followed by the system
//! summary (dataset, model and run history).
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use smartwaste_monitor::{
    format_loss, format_percent, HttpTrainingApi, ProgressView, SystemStatus, TrainingApi,
    TrainingStatus,
};

use super::utils::{fetch_system_status, print_header, print_kv, resolve_config};
use crate::cli::StatusArgs;
use crate::error::{CliError, CliResult};

/// Execute the `status` command
pub async fn execute(args: StatusArgs) -> CliResult<()> {
    let config = resolve_config(&args.connection)?;
    let api = HttpTrainingApi::new(&config.server.url);

    let envelope = api.training_status().await?;
    if !envelope.success {
        return Err(CliError::Other(
            envelope
                .error
                .unwrap_or_else(|| "status lookup failed".to_string()),
        ));
    }
    let status = envelope
        .data
        .ok_or_else(|| CliError::Other("status response carried no data".to_string()))?;

    let system = fetch_system_status(&api).await;

    if args.json {
        let report = serde_json::json!({ "training": status, "system": system });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header("Training Status");
    for (key, value) in status_rows(&status) {
        print_kv(key, &value);
    }
    if let Some(system) = &system {
        print_header("System Status");
        for (key, value) in system_rows(system) {
            print_kv(&key, &value);
        }
    }
    Ok(())
}

fn state_label(status: &TrainingStatus) -> &'static str {
    match (status.in_progress, status.completed) {
        (true, _) => "running",
        (false, Some(true)) => "completed",
        (false, Some(false)) => "failed",
        (false, None) => "idle",
    }
}

/// Key/value rows shown by `status`
fn status_rows(status: &TrainingStatus) -> Vec<(&'static str, String)> {
    let view = ProgressView::from(status);
    let mut rows = vec![
        ("State", state_label(status).to_string()),
        ("Progress", format!("{:.0}%", view.percent)),
        ("Message", status.message.clone()),
    ];

    if let Some(id) = &status.training_id {
        rows.push(("Training ID", id.clone()));
    }
    if let Some(epoch) = view.epoch_label() {
        rows.push(("Epoch", epoch));
    }
    if let Some(acc) = view.train_accuracy_label() {
        rows.push(("Train Accuracy", acc));
    }
    if let Some(acc) = view.val_accuracy_label() {
        rows.push(("Val Accuracy", acc));
    }
    if let Some(loss) = view.loss_label() {
        rows.push(("Loss", loss));
    }
    if let Some(loss) = status.val_loss {
        rows.push(("Val Loss", format_loss(loss)));
    }
    if let Some(acc) = status.test_accuracy {
        rows.push(("Test Accuracy", format_percent(acc)));
    }
    if let Some(error) = &status.error {
        rows.push(("Error", error.clone()));
    }
    if let Some(start) = &status.start_time {
        rows.push(("Started", start.clone()));
    }
    if let Some(end) = &status.end_time {
        rows.push(("Finished", end.clone()));
    }
    rows
}

/// Key/value rows for the system summary
fn system_rows(system: &SystemStatus) -> Vec<(String, String)> {
    let mut rows = vec![(
        "Total Images".to_string(),
        system.dataset.total_images.to_string(),
    )];
    for (category, count) in &system.dataset.by_category {
        rows.push((format!("  {category}"), count.to_string()));
    }
    let ready = if system.dataset.ready_for_training {
        "yes"
    } else {
        "no"
    };
    rows.push(("Ready to Train".to_string(), ready.to_string()));

    let model = if system.model.loaded {
        "loaded"
    } else if system.model.exists {
        "on disk"
    } else {
        "none"
    };
    rows.push(("Model".to_string(), model.to_string()));
    rows.push(("Model Accuracy".to_string(), system.model.accuracy_label()));
    if !system.model.ai_level.is_empty() {
        rows.push(("AI Level".to_string(), system.model.ai_level.clone()));
    }
    rows.push((
        "Runs Completed".to_string(),
        system.training.total_count.to_string(),
    ));
    rows
}
