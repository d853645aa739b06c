//! Types - Training Wire Types and UI Projections
//!
//! JSON shapes exchanged with the training service, plus the view types the
//! monitor hands to the presentation layer.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

// =============================================================================
// Requests
// =============================================================================

/// Hyper-parameters sent once per training invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingRequest {
    /// Number of epochs
    pub epochs: u32,
    /// Optimizer learning rate
    pub learning_rate: f64,
    /// Mini-batch size
    pub batch_size: u32,
}

impl TrainingRequest {
    /// Create a new training request
    pub fn new(epochs: u32, learning_rate: f64, batch_size: u32) -> Self {
        Self {
            epochs,
            learning_rate,
            batch_size,
        }
    }

    /// Check that every parameter is positive.
    ///
    /// Range policy (allowed epoch counts, batch sizes) belongs to the
    /// service and comes back as a start rejection.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.epochs == 0 {
            return Err(MonitorError::InvalidRequest(
                "epochs must be greater than 0".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(MonitorError::InvalidRequest(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(MonitorError::InvalidRequest(
                "batch size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Acknowledgement returned by `POST /api/train`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartAck {
    /// Whether the service accepted the job
    pub success: bool,
    /// Rejection reason
    #[serde(default)]
    pub error: Option<String>,
    /// Informational message on success
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope returned by `GET /api/training-status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusEnvelope {
    /// Whether the status lookup succeeded
    pub success: bool,
    /// Current job status
    #[serde(default)]
    pub data: Option<TrainingStatus>,
    /// Failure reason when `success` is false
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusEnvelope {
    /// Status payload, present only on a successful lookup
    pub fn into_status(self) -> Option<TrainingStatus> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// Snapshot of the training job as reported by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatus {
    /// Job still running
    #[serde(default)]
    pub in_progress: bool,
    /// Overall progress, 0 to 100
    #[serde(default)]
    pub progress: f64,
    /// Human-readable progress message
    #[serde(default)]
    pub message: String,
    /// Identifier assigned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_id: Option<String>,
    /// Epoch currently running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_epoch: Option<u32>,
    /// Total epochs in the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_epochs: Option<u32>,
    /// Training accuracy, 0 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Validation accuracy, 0 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_accuracy: Option<f64>,
    /// Training loss
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<f64>,
    /// Validation loss
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_loss: Option<f64>,
    /// Set once the job ends; true only on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Held-out accuracy of the final model, 0 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_accuracy: Option<f64>,
    /// Failure detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// ISO-8601 start timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// ISO-8601 end timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

// =============================================================================
// System Status
// =============================================================================

/// Envelope returned by `GET /api/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemStatusEnvelope {
    /// Whether the lookup succeeded
    pub success: bool,
    /// System summary
    #[serde(default)]
    pub data: Option<SystemStatus>,
    /// Failure reason when `success` is false
    #[serde(default)]
    pub error: Option<String>,
}

impl SystemStatusEnvelope {
    /// Summary payload, present only on a successful lookup
    pub fn into_system_status(self) -> Option<SystemStatus> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// Dataset, model and training summary of the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Collected images
    #[serde(default)]
    pub dataset: DatasetSummary,
    /// Served model
    #[serde(default)]
    pub model: ModelSummary,
    /// Run history
    #[serde(default)]
    pub training: TrainingSummary,
}

/// Raw images collected for training
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Images across all categories
    #[serde(default)]
    pub total_images: u64,
    /// Image count per waste category
    #[serde(default)]
    pub by_category: BTreeMap<String, u64>,
    /// Enough images to start a run
    #[serde(default)]
    pub ready_for_training: bool,
}

/// State of the served model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// A model file is on disk
    #[serde(default)]
    pub exists: bool,
    /// The classifier is loaded in memory
    #[serde(default)]
    pub loaded: bool,
    /// Accuracy of the served model, 0 to 1
    #[serde(default)]
    pub accuracy: f64,
    /// Display tier derived from accuracy
    #[serde(default)]
    pub ai_level: String,
}

/// Training history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Completed runs since the service started
    #[serde(default)]
    pub total_count: u64,
    /// Last known job status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TrainingStatus>,
}

impl ModelSummary {
    /// Accuracy label, or `-` while no model has been trained
    pub fn accuracy_label(&self) -> String {
        if self.accuracy > 0.0 {
            format_percent(self.accuracy)
        } else {
            "-".to_string()
        }
    }
}

// =============================================================================
// Projections
// =============================================================================

/// Status projection handed to the presentation layer on every poll
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    /// Progress percentage clamped to 0..=100
    pub percent: f64,
    /// Progress message
    pub message: String,
    /// `(current, total)` epoch pair when both are known
    pub epoch: Option<(u32, u32)>,
    /// Training accuracy, 0 to 1
    pub train_accuracy: Option<f64>,
    /// Validation accuracy, 0 to 1
    pub val_accuracy: Option<f64>,
    /// Training loss
    pub loss: Option<f64>,
}

impl ProgressView {
    /// Project a service status into view state
    pub fn from_status(status: &TrainingStatus) -> Self {
        let percent = if status.progress.is_finite() {
            status.progress.clamp(0.0, 100.0)
        } else {
            0.0
        };
        // A zero epoch means the job has not reached its first epoch yet.
        let epoch = match (status.current_epoch, status.total_epochs) {
            (Some(current), Some(total)) if current > 0 && total > 0 => Some((current, total)),
            _ => None,
        };

        Self {
            percent,
            message: status.message.clone(),
            epoch,
            train_accuracy: status.accuracy,
            val_accuracy: status.val_accuracy,
            loss: status.loss,
        }
    }

    /// Epoch label such as `3/20`
    pub fn epoch_label(&self) -> Option<String> {
        self.epoch.map(|(current, total)| format!("{current}/{total}"))
    }

    /// Training accuracy label such as `87.50%`
    pub fn train_accuracy_label(&self) -> Option<String> {
        self.train_accuracy.map(format_percent)
    }

    /// Validation accuracy label
    pub fn val_accuracy_label(&self) -> Option<String> {
        self.val_accuracy.map(format_percent)
    }

    /// Loss label with four decimals
    pub fn loss_label(&self) -> Option<String> {
        self.loss.map(format_loss)
    }
}

impl From<&TrainingStatus> for ProgressView {
    fn from(status: &TrainingStatus) -> Self {
        Self::from_status(status)
    }
}

/// Terminal result of one training run
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingOutcome {
    /// Job completed and produced a model
    Succeeded {
        /// Held-out accuracy, 0 to 1
        test_accuracy: f64,
        /// Service completion message
        message: String,
    },
    /// Job stopped without completing
    Failed {
        /// Failure reason
        message: String,
    },
}

impl TrainingOutcome {
    /// Build the outcome from the terminal status
    pub fn from_status(status: &TrainingStatus) -> Self {
        if status.completed == Some(true) {
            TrainingOutcome::Succeeded {
                test_accuracy: status.test_accuracy.unwrap_or(0.0),
                message: status.message.clone(),
            }
        } else {
            let message = if !status.message.is_empty() {
                status.message.clone()
            } else {
                status
                    .error
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Training stopped without a reason".to_string())
            };
            TrainingOutcome::Failed { message }
        }
    }

    /// Whether the job completed
    pub fn is_success(&self) -> bool {
        matches!(self, TrainingOutcome::Succeeded { .. })
    }

    /// Outcome message
    pub fn message(&self) -> &str {
        match self {
            TrainingOutcome::Succeeded { message, .. } | TrainingOutcome::Failed { message } => {
                message
            }
        }
    }

    /// Test accuracy label such as `93.00%`, for successful runs
    pub fn accuracy_label(&self) -> Option<String> {
        match self {
            TrainingOutcome::Succeeded { test_accuracy, .. } => Some(format_percent(*test_accuracy)),
            TrainingOutcome::Failed { .. } => None,
        }
    }

    /// Convert into the test accuracy, or `JobFailed`
    pub fn into_result(self) -> Result<f64, MonitorError> {
        match self {
            TrainingOutcome::Succeeded { test_accuracy, .. } => Ok(test_accuracy),
            TrainingOutcome::Failed { message } => Err(MonitorError::JobFailed(message)),
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Format a 0..1 fraction as a percentage with two decimals
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Format a loss value with four decimals
pub fn format_loss(loss: f64) -> String {
    format!("{loss:.4}")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(TrainingRequest::new(20, 0.001, 32).validate().is_ok());
        assert!(TrainingRequest::new(0, 0.001, 32).validate().is_err());
        assert!(TrainingRequest::new(20, 0.0, 32).validate().is_err());
        assert!(TrainingRequest::new(20, -0.1, 32).validate().is_err());
        assert!(TrainingRequest::new(20, f64::NAN, 32).validate().is_err());
        assert!(TrainingRequest::new(20, 0.001, 0).validate().is_err());
    }

    #[test]
    fn test_request_serializes_snake_case() {
        let json = serde_json::to_value(TrainingRequest::new(10, 0.01, 16)).unwrap();
        assert_eq!(json["epochs"], 10);
        assert_eq!(json["learning_rate"], 0.01);
        assert_eq!(json["batch_size"], 16);
    }

    #[test]
    fn test_status_envelope_from_service_payload() {
        let body = r#"{
            "success": true,
            "data": {
                "in_progress": true,
                "training_id": "train_20240101_120000",
                "current_epoch": 3,
                "total_epochs": 20,
                "progress": 15.0,
                "message": "Training epoch 3/20",
                "accuracy": 0.71,
                "val_accuracy": 0.66,
                "loss": 0.84213,
                "val_loss": 0.9,
                "start_time": "2024-01-01T12:00:00"
            }
        }"#;
        let envelope: StatusEnvelope = serde_json::from_str(body).unwrap();
        let status = envelope.into_status().unwrap();
        assert!(status.in_progress);
        assert_eq!(status.current_epoch, Some(3));
        assert_eq!(status.training_id.as_deref(), Some("train_20240101_120000"));
        assert_eq!(status.completed, None);
    }

    #[test]
    fn test_idle_status_defaults() {
        let status: TrainingStatus = serde_json::from_str(r#"{"message": "Idle"}"#).unwrap();
        assert!(!status.in_progress);
        assert_eq!(status.progress, 0.0);
    }

    #[test]
    fn test_failed_envelope_has_no_status() {
        let envelope: StatusEnvelope =
            serde_json::from_str(r#"{"success": false, "error": "boom"}"#).unwrap();
        assert!(envelope.into_status().is_none());
    }

    #[test]
    fn test_progress_view_projection() {
        let status = TrainingStatus {
            in_progress: true,
            progress: 140.0,
            message: "Training epoch 3/20".to_string(),
            current_epoch: Some(3),
            total_epochs: Some(20),
            accuracy: Some(0.875),
            loss: Some(0.123456),
            ..TrainingStatus::default()
        };
        let view = ProgressView::from(&status);
        assert_eq!(view.percent, 100.0);
        assert_eq!(view.epoch_label().as_deref(), Some("3/20"));
        assert_eq!(view.train_accuracy_label().as_deref(), Some("87.50%"));
        assert_eq!(view.val_accuracy_label(), None);
        assert_eq!(view.loss_label().as_deref(), Some("0.1235"));
    }

    #[test]
    fn test_progress_view_hides_epoch_before_first() {
        let status = TrainingStatus {
            current_epoch: Some(0),
            total_epochs: Some(20),
            ..TrainingStatus::default()
        };
        assert_eq!(ProgressView::from(&status).epoch, None);
    }

    #[test]
    fn test_outcome_success() {
        let status = TrainingStatus {
            completed: Some(true),
            test_accuracy: Some(0.93),
            message: "Training selesai!".to_string(),
            ..TrainingStatus::default()
        };
        let outcome = TrainingOutcome::from_status(&status);
        assert!(outcome.is_success());
        assert_eq!(outcome.accuracy_label().as_deref(), Some("93.00%"));
    }

    #[test]
    fn test_outcome_missing_accuracy_counts_as_zero() {
        let status = TrainingStatus {
            completed: Some(true),
            ..TrainingStatus::default()
        };
        let outcome = TrainingOutcome::from_status(&status);
        assert_eq!(outcome.accuracy_label().as_deref(), Some("0.00%"));
    }

    #[test]
    fn test_outcome_failure_prefers_message() {
        let status = TrainingStatus {
            completed: Some(false),
            message: "out of memory".to_string(),
            error: Some("CUDA OOM".to_string()),
            ..TrainingStatus::default()
        };
        assert_eq!(TrainingOutcome::from_status(&status).message(), "out of memory");
    }

    #[test]
    fn test_outcome_failure_falls_back_to_error() {
        let status = TrainingStatus {
            error: Some("dataset split failed".to_string()),
            ..TrainingStatus::default()
        };
        let outcome = TrainingOutcome::from_status(&status);
        assert_eq!(outcome.message(), "dataset split failed");
        assert!(matches!(
            outcome.into_result(),
            Err(MonitorError::JobFailed(m)) if m == "dataset split failed"
        ));
    }

    #[test]
    fn test_system_status_decodes() {
        let body = r#"{
            "success": true,
            "data": {
                "dataset": {
                    "total_images": 240,
                    "by_category": {"organik": 120, "anorganik": 80, "b3": 40},
                    "ready_for_training": true
                },
                "model": {"exists": true, "loaded": true, "accuracy": 0.87, "ai_level": "AI Elang"},
                "training": {"total_count": 3, "status": {"in_progress": false, "progress": 100, "message": "Training selesai!"}}
            }
        }"#;
        let envelope: SystemStatusEnvelope = serde_json::from_str(body).unwrap();
        let system = envelope.into_system_status().unwrap();
        assert_eq!(system.dataset.total_images, 240);
        assert_eq!(system.dataset.by_category.get("b3"), Some(&40));
        assert!(system.model.loaded);
        assert_eq!(system.model.accuracy_label(), "87.00%");
        assert_eq!(system.training.total_count, 3);
        assert_eq!(
            system.training.status.map(|s| s.message).as_deref(),
            Some("Training selesai!")
        );
    }

    #[test]
    fn test_untrained_model_has_no_accuracy() {
        assert_eq!(ModelSummary::default().accuracy_label(), "-");
        let envelope: SystemStatusEnvelope =
            serde_json::from_str(r#"{"success": false, "error": "disk"}"#).unwrap();
        assert!(envelope.into_system_status().is_none());
    }
}
