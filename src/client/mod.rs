//! HTTP client for the inference service.
//!
//! This module provides:
//! - [`DiagnosisClient`]: request/response exchange for the diagnose and
//!   feedback endpoints
//! - [`DiagnosisApi`]: client abstraction for dependency injection
//! - [`ClientConfig`]: base URL and timeout configuration
//!
//! The client performs no automatic retries; a failed diagnosis is
//! recoverable by the user triggering it again. Both exchanges are plain
//! request/response over JSON, no streaming.

mod config;

pub use config::ClientConfig;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ClientError;
use crate::wire::{DiagnoseRequest, DiagnosisResponse, FeedbackRequest};

/// Inference service client trait for mocking.
///
/// Abstracts the HTTP client so the screen state machine can be driven
/// by a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagnosisApi: Send + Sync {
    /// Submit an evidence payload and await the diagnosis.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status,
    /// or a body missing required fields.
    async fn diagnose(&self, request: &DiagnoseRequest)
        -> Result<DiagnosisResponse, ClientError>;

    /// Report whether the user judged the diagnosis correct.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or non-success status.
    async fn send_feedback(&self, is_correct: bool) -> Result<(), ClientError>;
}

/// HTTP client for the diagnosis and feedback endpoints.
#[derive(Debug)]
pub struct DiagnosisClient {
    client: Client,
    config: ClientConfig,
}

impl DiagnosisClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn map_send_error(&self, url: &str, e: &reqwest::Error) -> ClientError {
        if e.is_timeout() {
            tracing::error!(url = %url, timeout_ms = self.config.timeout_ms, "Request timed out");
            ClientError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            tracing::error!(url = %url, error = %e, "Request failed");
            ClientError::Network {
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl DiagnosisApi for DiagnosisClient {
    async fn diagnose(
        &self,
        request: &DiagnoseRequest,
    ) -> Result<DiagnosisResponse, ClientError> {
        let url = format!("{}/diagnose", self.config.base_url);
        let start = std::time::Instant::now();

        tracing::debug!(
            url = %url,
            evidence_keys = request.evidence.len(),
            timeout_ms = self.config.timeout_ms,
            "Submitting diagnosis request"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(&url, &e))?;

        let status = response.status();
        tracing::debug!(
            url = %url,
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Diagnosis response received"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        // Required fields absent fail the decode; optional fields default
        // inside the wire types.
        response.json().await.map_err(|e| ClientError::Decode {
            message: format!("Failed to parse diagnosis response: {e}"),
        })
    }

    async fn send_feedback(&self, is_correct: bool) -> Result<(), ClientError> {
        let url = format!("{}/feedback", self.config.base_url);

        tracing::debug!(url = %url, is_correct, "Submitting feedback");

        let response = self
            .client
            .post(&url)
            .json(&FeedbackRequest { is_correct })
            .send()
            .await
            .map_err(|e| self.map_send_error(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        // Response body is ignored beyond the status line.
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::evidence::EvidenceStore;
    use crate::schema::Schema;
    use crate::wire::RiskLevel;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Helper to create a client pointing to the mock server
    fn mock_client(server: &MockServer) -> DiagnosisClient {
        let config = ClientConfig::new()
            .with_base_url(server.uri())
            .with_timeout_ms(5_000);
        DiagnosisClient::new(config).unwrap()
    }

    fn sample_request() -> DiagnoseRequest {
        let mut store = EvidenceStore::new(Schema::builtin());
        store.toggle("Overworked").unwrap();
        DiagnoseRequest::from_evidence(&store)
    }

    #[test]
    fn test_client_new() {
        let client = DiagnosisClient::new(ClientConfig::new()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.config().timeout_ms, 10_000);
    }

    #[tokio::test]
    async fn test_diagnose_success() {
        let server = MockServer::start().await;

        let expected_body = json!({
            "evidence": {
                "Overworked": true,
                "SleepDeprived": false,
                "SmartphoneDistraction": false,
                "CarelessMistake": false
            }
        });
        Mock::given(method("POST"))
            .and(path("/diagnose"))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "risk_score": 0.82,
                "risk_level": "DANGER",
                "advice": "Take a break"
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let response = client.diagnose(&sample_request()).await.unwrap();
        assert_eq!(response.risk_score, 0.82);
        assert_eq!(response.risk_level, RiskLevel::Danger);
        assert_eq!(response.advice, "Take a break");
        assert!(response.improvements.is_empty());
    }

    #[tokio::test]
    async fn test_diagnose_with_improvements() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/diagnose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "risk_score": 0.67,
                "risk_level": "WARNING",
                "advice": "Be careful",
                "improvements": [
                    {"factor": "SleepDeprived", "reduction": 0.21, "advice": "Sleep more"},
                    {"factor": "Overworked", "reduction": 0.12, "advice": "Delegate tasks"}
                ]
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let response = client.diagnose(&sample_request()).await.unwrap();
        assert_eq!(response.improvements.len(), 2);
        // Order comes pre-sorted from the service and is preserved.
        assert_eq!(response.improvements[0].factor, "SleepDeprived");
        assert_eq!(response.improvements[1].factor, "Overworked");
    }

    #[tokio::test]
    async fn test_diagnose_non_success_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/diagnose"))
            .respond_with(ResponseTemplate::new(500).set_body_string("inference failed"))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client.diagnose(&sample_request()).await.unwrap_err();
        match err {
            ClientError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "inference failed");
            }
            e => panic!("Wrong error type: {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_diagnose_missing_required_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/diagnose"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"risk_level": "SAFE", "advice": "ok"})),
            )
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client.diagnose(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_diagnose_connection_refused() {
        // No server listening on this port.
        let config = ClientConfig::new()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout_ms(2_000);
        let client = DiagnosisClient::new(config).unwrap();

        let err = client.diagnose(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Network { .. }));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_diagnose_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/diagnose"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"risk_score": 0.1, "risk_level": "SAFE"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new()
            .with_base_url(server.uri())
            .with_timeout_ms(50);
        let client = DiagnosisClient::new(config).unwrap();

        let err = client.diagnose(&sample_request()).await.unwrap_err();
        assert_eq!(err, ClientError::Timeout { timeout_ms: 50 });
    }

    #[tokio::test]
    async fn test_send_feedback_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_json(&json!({"is_correct": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"alpha": 11.0})))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        assert!(client.send_feedback(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_feedback_failure_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client.send_feedback(false).await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedStatus { status: 503, .. }));
    }
}
