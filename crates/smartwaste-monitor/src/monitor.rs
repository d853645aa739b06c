//! Monitor - Training Lifecycle Controller
//!
//! Owns the request/poll/terminate cycle of one training run:
//!
//! ```text
//! Idle --start_training(ok)--> Starting --> Monitoring --poll(in_progress=false)--> Idle
//!   ^                             |
//!   +---- start_training(err) ----+
//! ```
//!
//! At most one polling loop exists per controller. Starting a new loop aborts
//! the previous one first, and a session counter keeps a superseded loop from
//! reporting completion.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::api::TrainingApi;
use crate::error::{MonitorError, MonitorResult};
use crate::presenter::Presenter;
use crate::types::{ProgressView, TrainingOutcome, TrainingRequest, TrainingStatus};

/// Default period between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

// =============================================================================
// State
// =============================================================================

/// Lifecycle state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// No job is being tracked
    Idle,
    /// Start request in flight
    Starting,
    /// Polling loop active
    Monitoring,
}

/// Handle to the active polling loop. Dropping it aborts the loop.
#[derive(Debug)]
pub struct PollHandle {
    session: u64,
    task: JoinHandle<TrainingOutcome>,
}

impl PollHandle {
    /// Session number of the loop
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Whether the loop has stopped
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Training Monitor
// =============================================================================

/// Drives one training run at a time and reports to a [`Presenter`]
pub struct TrainingMonitor {
    api: Arc<dyn TrainingApi>,
    presenter: Arc<dyn Presenter>,
    poll_interval: Duration,
    state: Arc<watch::Sender<MonitorState>>,
    session: Arc<AtomicU64>,
    poll: Option<PollHandle>,
}

impl TrainingMonitor {
    /// Create an idle monitor polling every [`DEFAULT_POLL_INTERVAL`]
    pub fn new(api: Arc<dyn TrainingApi>, presenter: Arc<dyn Presenter>) -> Self {
        let (state, _) = watch::channel(MonitorState::Idle);
        Self {
            api,
            presenter,
            poll_interval: DEFAULT_POLL_INTERVAL,
            state: Arc::new(state),
            session: Arc::new(AtomicU64::new(0)),
            poll: None,
        }
    }

    /// Override the poll period (minimum one millisecond)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Poll period
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Current lifecycle state
    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.state.subscribe()
    }

    /// Active polling loop, if any
    pub fn poll_handle(&self) -> Option<&PollHandle> {
        self.poll.as_ref()
    }

    /// Submit a training job and start polling once the service accepts it.
    ///
    /// On any failure the monitor stays idle, the start control is
    /// re-enabled and no poll is scheduled. The start call is never retried.
    pub async fn start_training(&mut self, request: TrainingRequest) -> MonitorResult<()> {
        if self.state() != MonitorState::Idle {
            let err = MonitorError::StartRejected(
                "a training job is already being monitored".to_string(),
            );
            self.presenter.start_failed(&err);
            return Err(err);
        }
        if let Err(err) = request.validate() {
            self.presenter.start_failed(&err);
            return Err(err);
        }

        self.state.send_replace(MonitorState::Starting);
        self.presenter.set_start_enabled(false);

        let result = match self.api.start_training(&request).await {
            Ok(ack) if ack.success => Ok(ack),
            Ok(ack) => Err(MonitorError::StartRejected(
                ack.error
                    .unwrap_or_else(|| "the service declined the request".to_string()),
            )),
            Err(e) => Err(MonitorError::Transport(e)),
        };

        match result {
            Ok(ack) => {
                tracing::info!(
                    epochs = request.epochs,
                    learning_rate = request.learning_rate,
                    batch_size = request.batch_size,
                    service_message = ack.message.as_deref().unwrap_or_default(),
                    "Training accepted"
                );
                self.presenter.monitoring_started();
                self.monitor_training();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Training start failed");
                self.state.send_replace(MonitorState::Idle);
                self.presenter.set_start_enabled(true);
                self.presenter.start_failed(&err);
                Err(err)
            }
        }
    }

    /// Start a polling loop, aborting any loop already running.
    ///
    /// The first poll fires one full period after this call. Must be called
    /// from within a tokio runtime.
    pub fn monitor_training(&mut self) {
        if let Some(previous) = self.poll.take() {
            tracing::debug!(session = previous.session, "Cancelling previous polling loop");
            drop(previous);
        }

        let session = self.session.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(MonitorState::Monitoring);

        let poll_loop = PollLoop {
            api: Arc::clone(&self.api),
            presenter: Arc::clone(&self.presenter),
            period: self.poll_interval,
            state: Arc::clone(&self.state),
            current_session: Arc::clone(&self.session),
            session,
        };
        tracing::debug!(session, period_ms = self.poll_interval.as_millis() as u64, "Polling started");

        self.poll = Some(PollHandle {
            session,
            task: tokio::spawn(poll_loop.run()),
        });
    }

    /// Ask the service once whether a job is running and attach to it if so.
    ///
    /// Returns `true` when the monitor attached. Never issues a start request.
    pub async fn check_training_status(&mut self) -> MonitorResult<bool> {
        let envelope = self.api.training_status().await.map_err(|e| {
            tracing::warn!(error = %e, "Error checking training status");
            MonitorError::Transport(e)
        })?;

        match envelope.into_status() {
            Some(status) if status.in_progress => {
                tracing::info!(
                    training_id = status.training_id.as_deref().unwrap_or("unknown"),
                    progress = status.progress,
                    "Attaching to training already in progress"
                );
                self.presenter.set_start_enabled(false);
                self.presenter.monitoring_started();
                self.presenter.status_updated(&ProgressView::from(&status));
                self.monitor_training();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Wait for the active loop to report its terminal outcome
    pub async fn wait_for_completion(&mut self) -> MonitorResult<TrainingOutcome> {
        let handle = self.poll.as_mut().ok_or(MonitorError::NotMonitoring)?;
        let joined = (&mut handle.task).await;
        self.poll = None;
        Ok(joined?)
    }
}

// =============================================================================
// Completion
// =============================================================================

/// Terminal handler: report the outcome and re-enable the start control
pub fn handle_completion(presenter: &dyn Presenter, status: &TrainingStatus) -> TrainingOutcome {
    let outcome = TrainingOutcome::from_status(status);
    match &outcome {
        TrainingOutcome::Succeeded { test_accuracy, .. } => {
            tracing::info!(test_accuracy, "Training completed");
        }
        TrainingOutcome::Failed { message } => {
            tracing::warn!(reason = %message, "Training failed");
        }
    }
    presenter.set_start_enabled(true);
    presenter.training_finished(&outcome);
    outcome
}

// =============================================================================
// Polling Loop
// =============================================================================

struct PollLoop {
    api: Arc<dyn TrainingApi>,
    presenter: Arc<dyn Presenter>,
    period: Duration,
    state: Arc<watch::Sender<MonitorState>>,
    current_session: Arc<AtomicU64>,
    session: u64,
}

impl PollLoop {
    async fn run(self) -> TrainingOutcome {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick: u64 = 0;

        loop {
            ticker.tick().await;
            tick += 1;

            // A request still pending at the next tick is dropped and replaced,
            // so one hung call never stalls the loop.
            let mut request = self.api.training_status();
            let response = loop {
                tokio::select! {
                    response = &mut request => break response,
                    _ = ticker.tick() => {
                        tracing::warn!(
                            session = self.session,
                            tick,
                            "Status request still pending, polling again"
                        );
                        tick += 1;
                        request = self.api.training_status();
                    }
                }
            };

            let status = match response {
                Ok(envelope) => match envelope.into_status() {
                    Some(status) => status,
                    None => {
                        tracing::warn!(session = self.session, tick, "Status lookup unsuccessful");
                        continue;
                    }
                },
                Err(e) => {
                    tracing::warn!(session = self.session, tick, error = %e, "Error monitoring training");
                    continue;
                }
            };

            tracing::debug!(
                session = self.session,
                tick,
                progress = status.progress,
                in_progress = status.in_progress,
                "Training status"
            );
            self.presenter.status_updated(&ProgressView::from(&status));

            if !status.in_progress {
                return self.finish(&status);
            }
        }
    }

    fn finish(&self, status: &TrainingStatus) -> TrainingOutcome {
        if self.current_session.load(Ordering::SeqCst) != self.session {
            return TrainingOutcome::from_status(status);
        }
        self.state.send_replace(MonitorState::Idle);
        handle_completion(self.presenter.as_ref(), status)
    }
}

// =============================================================================
// Tests
// =============================================================================
