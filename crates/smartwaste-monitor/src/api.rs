//! API Client for the SmartWaste Training Service
//!
//! Typed access to the training endpoints the monitor depends on. The
//! [`TrainingApi`] trait is the seam the monitor is written against; the
//! HTTP implementation lives in [`HttpTrainingApi`].

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{StartAck, StatusEnvelope, SystemStatusEnvelope, TrainingRequest};

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection or protocol failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success status with an undecodable body
    #[error("Server returned error: {0}")]
    Server(String),
    /// Success status with an undecodable body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Training API Trait
// =============================================================================

/// Endpoints of the training service used by the monitor
#[async_trait::async_trait]
pub trait TrainingApi: Send + Sync {
    /// `POST /api/train`
    async fn start_training(&self, request: &TrainingRequest) -> Result<StartAck, ApiError>;

    /// `GET /api/training-status`
    async fn training_status(&self) -> Result<StatusEnvelope, ApiError>;

    /// `GET /api/status`
    async fn system_status(&self) -> Result<SystemStatusEnvelope, ApiError>;

    /// Whether the service answers at all
    async fn is_available(&self) -> bool;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// reqwest-backed client for the training service
#[derive(Debug, Clone)]
pub struct HttpTrainingApi {
    client: reqwest::Client,
    server_url: String,
}

impl HttpTrainingApi {
    /// Create a client for the given base URL
    pub fn new(server_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), server_url)
    }

    /// Create a client reusing an existing reqwest client
    pub fn with_client(client: reqwest::Client, server_url: &str) -> Self {
        Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

#[async_trait::async_trait]
impl TrainingApi for HttpTrainingApi {
    async fn start_training(&self, request: &TrainingRequest) -> Result<StartAck, ApiError> {
        let url = self.endpoint("/api/train");
        tracing::debug!(%url, epochs = request.epochs, "Submitting training request");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_start_ack(status, &body)
    }

    async fn training_status(&self) -> Result<StatusEnvelope, ApiError> {
        let url = self.endpoint("/api/training-status");
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server(format!("{}: {}", status, body)));
        }

        Ok(response.json().await?)
    }

    async fn system_status(&self) -> Result<SystemStatusEnvelope, ApiError> {
        let url = self.endpoint("/api/status");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_system_status(status, &body)
    }

    async fn is_available(&self) -> bool {
        let url = self.endpoint("/health");
        self.client.get(&url).send().await.is_ok()
    }
}

/// Decode a start acknowledgement.
///
/// Rejections arrive as HTTP 400 with a JSON body, so the body is decoded
/// whatever the status code; only an undecodable body is an error.
fn parse_start_ack(status: StatusCode, body: &str) -> Result<StartAck, ApiError> {
    match serde_json::from_str::<StartAck>(body) {
        Ok(ack) => Ok(ack),
        Err(e) if status.is_success() => Err(ApiError::Json(e)),
        Err(_) => Err(ApiError::Server(format!("{}: {}", status, body))),
    }
}

/// Decode a system status envelope.
///
/// Lookup failures come back as HTTP 500 with `{success: false, error}`, so a
/// decodable body is returned as-is.
fn parse_system_status(status: StatusCode, body: &str) -> Result<SystemStatusEnvelope, ApiError> {
    match serde_json::from_str::<SystemStatusEnvelope>(body) {
        Ok(envelope) => Ok(envelope),
        Err(e) if status.is_success() => Err(ApiError::Json(e)),
        Err(_) => Err(ApiError::Server(format!("{}: {}", status, body))),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let api = HttpTrainingApi::new("http://localhost:5000//");
        assert_eq!(api.server_url(), "http://localhost:5000");
        assert_eq!(
            api.endpoint("/api/training-status"),
            "http://localhost:5000/api/training-status"
        );
    }

    #[test]
    fn test_rejection_body_decoded_from_400() {
        let ack = parse_start_ack(
            StatusCode::BAD_REQUEST,
            r#"{"success": false, "error": "Training sudah berjalan. Tunggu hingga selesai."}"#,
        )
        .unwrap();
        assert!(!ack.success);
        assert_eq!(
            ack.error.as_deref(),
            Some("Training sudah berjalan. Tunggu hingga selesai.")
        );
    }

    #[test]
    fn test_accepted_body() {
        let ack = parse_start_ack(
            StatusCode::OK,
            r#"{"success": true, "message": "Training dimulai!", "data": {"training_id": "train_1"}}"#,
        )
        .unwrap();
        assert!(ack.success);
        assert_eq!(ack.message.as_deref(), Some("Training dimulai!"));
    }

    #[test]
    fn test_html_error_page_is_server_error() {
        let err = parse_start_ack(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").unwrap_err();
        match err {
            ApiError::Server(msg) => assert!(msg.starts_with("502")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_garbage_success_body_is_json_error() {
        let err = parse_start_ack(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }

    #[test]
    fn test_system_status_failure_body_decoded_from_500() {
        let envelope = parse_system_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success": false, "error": "dataset folder missing"}"#,
        )
        .unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("dataset folder missing"));

        let err = parse_system_status(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Server(m) if m.starts_with("502")));
    }
}
