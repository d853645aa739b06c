//! SmartWaste Monitor - Training Lifecycle Controller
//!
//! Drives one training run on the SmartWaste classification service: submits
//! the start request, polls the status endpoint on a fixed period and reports
//! every status projection plus a single terminal outcome to a presentation
//! layer.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use smartwaste_monitor::{HttpTrainingApi, TrainingMonitor, TrainingRequest, Presenter};
//!
//! async fn run(presenter: Arc<dyn Presenter>) -> Result<(), smartwaste_monitor::MonitorError> {
//!     let api = Arc::new(HttpTrainingApi::new("http://localhost:5000"));
//!     let mut monitor = TrainingMonitor::new(api, presenter);
//!     monitor.start_training(TrainingRequest::new(20, 0.001, 32)).await?;
//!     let outcome = monitor.wait_for_completion().await?;
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod api;
pub mod config;
pub mod error;
pub mod monitor;
pub mod presenter;
pub mod types;

pub use api::{ApiError, HttpTrainingApi, TrainingApi, DEFAULT_SERVER_URL};
pub use config::{ConfigError, MonitorConfig};
pub use error::{MonitorError, MonitorResult};
pub use monitor::{handle_completion, MonitorState, PollHandle, TrainingMonitor, DEFAULT_POLL_INTERVAL};
pub use presenter::Presenter;
pub use types::{
    format_loss, format_percent, DatasetSummary, ModelSummary, ProgressView, StartAck,
    StatusEnvelope, SystemStatus, SystemStatusEnvelope, TrainingOutcome, TrainingRequest,
    TrainingStatus, TrainingSummary,
};
