//! Terminal presenter
//!
//! Renders monitor callbacks as a progress bar and coloured result lines.

use indicatif::{ProgressBar, ProgressDrawTarget};
use smartwaste_monitor::{MonitorError, Presenter, ProgressView, TrainingOutcome};

use crate::commands::utils::{
    print_error, print_header, print_kv, print_success, print_warning, training_progress_bar,
};

/// Presenter writing to the terminal
pub struct TerminalPresenter {
    bar: ProgressBar,
    quiet: bool,
}

impl TerminalPresenter {
    pub fn new(quiet: bool) -> Self {
        let bar = training_progress_bar();
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bar, quiet }
    }
}

/// One-line metrics summary such as `epoch 3/20 · acc 87.50% · loss 0.1235`
pub fn metrics_line(view: &ProgressView) -> String {
    let mut parts = Vec::new();
    if let Some(epoch) = view.epoch_label() {
        parts.push(format!("epoch {epoch}"));
    }
    if let Some(acc) = view.train_accuracy_label() {
        parts.push(format!("acc {acc}"));
    }
    if let Some(val) = view.val_accuracy_label() {
        parts.push(format!("val {val}"));
    }
    if let Some(loss) = view.loss_label() {
        parts.push(format!("loss {loss}"));
    }
    parts.join(" · ")
}

impl Presenter for TerminalPresenter {
    // One command drives one run, so there is no start control to toggle.
    fn set_start_enabled(&self, enabled: bool) {
        tracing::trace!(enabled, "Start control");
    }

    fn monitoring_started(&self) {
        if !self.quiet {
            print_success("Training started");
        }
        self.bar.reset();
        self.bar.set_message("Waiting for first status...");
    }

    fn status_updated(&self, view: &ProgressView) {
        self.bar.set_position(view.percent.round() as u64);
        let metrics = metrics_line(view);
        if metrics.is_empty() {
            self.bar.set_message(view.message.clone());
        } else {
            self.bar.set_message(format!("{} | {}", view.message, metrics));
        }
    }

    fn training_finished(&self, outcome: &TrainingOutcome) {
        self.bar.finish_and_clear();
        if self.quiet {
            return;
        }
        match outcome {
            TrainingOutcome::Succeeded { message, .. } => {
                print_header("Training Result");
                print_success("Training completed");
                if let Some(accuracy) = outcome.accuracy_label() {
                    print_kv("Test Accuracy", &accuracy);
                }
                if !message.is_empty() {
                    print_kv("Message", message);
                }
            }
            TrainingOutcome::Failed { message } => {
                print_header("Training Result");
                print_warning(&format!("Training failed: {message}"));
            }
        }
    }

    fn start_failed(&self, error: &MonitorError) {
        self.bar.finish_and_clear();
        if !self.quiet {
            print_error("Could not start training");
        }
        tracing::debug!(error = %error, "Start failed");
    }
}
