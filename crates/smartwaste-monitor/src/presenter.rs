//! Presentation port
//!
//! The monitor never touches UI state directly; it reports through this trait.

use crate::error::MonitorError;
use crate::types::{ProgressView, TrainingOutcome};

/// UI collaborator driven by the training monitor
pub trait Presenter: Send + Sync {
    /// Enable or disable the "start training" control
    fn set_start_enabled(&self, enabled: bool);

    /// A polling session began, either after a start or on attach
    fn monitoring_started(&self);

    /// Called on every successful poll
    fn status_updated(&self, view: &ProgressView);

    /// Called exactly once per session when polling stops
    fn training_finished(&self, outcome: &TrainingOutcome);

    /// The start request failed and no polling began
    fn start_failed(&self, error: &MonitorError);
}
