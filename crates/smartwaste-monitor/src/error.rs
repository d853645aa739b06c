//! Error - Monitor Error Types
//!
//! Errors surfaced by the training monitor. None of them escape as faults:
//! every variant is also handed to the presentation layer as a message.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

use crate::api::ApiError;

// =============================================================================
// Error Types
// =============================================================================

/// Training monitor errors
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Request parameters failed local validation
    #[error("Invalid training request: {0}")]
    InvalidRequest(String),

    /// Service declined to begin training
    #[error("Training was not started: {0}")]
    StartRejected(String),

    /// Network or decoding failure talking to the service
    #[error("Transport error: {0}")]
    Transport(#[from] ApiError),

    /// Service finished the job without completing it
    #[error("Training failed: {0}")]
    JobFailed(String),

    /// No polling loop is attached to this controller
    #[error("No training session is being monitored")]
    NotMonitoring,

    /// Polling task was cancelled or panicked before reporting an outcome
    #[error("Monitoring task ended unexpectedly: {0}")]
    TaskAborted(String),
}

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

impl From<tokio::task::JoinError> for MonitorError {
    fn from(e: tokio::task::JoinError) -> Self {
        MonitorError::TaskAborted(e.to_string())
    }
}
