//! The screen state machine.
//!
//! `Idle → Loading → {Success, Failed}`, with both terminal states
//! returning through `Loading` on the next diagnosis. `Success` carries a
//! feedback sub-state that resets only when a new result arrives, so
//! feedback applies to exactly one diagnosis at a time.
//!
//! The no-concurrent-request rule is enforced here as an explicit guard
//! rather than by disabled UI controls alone: a programmatic `diagnose`
//! while one is in flight fails with [`ScreenError::Busy`].

use crate::client::DiagnosisApi;
use crate::error::{ClientError, ScreenError};
use crate::evidence::EvidenceStore;
use crate::wire::{DiagnoseRequest, DiagnosisResponse};

/// Feedback sub-state of a successful diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackState {
    /// No feedback sent for the current result.
    NotSent,
    /// Feedback sent; repeat submission is rejected.
    Sent,
}

/// Overall screen state.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    /// No result on screen.
    Idle,
    /// A diagnosis request is in flight; the trigger is disabled.
    Loading,
    /// A diagnosis result is on screen.
    Success {
        /// The received diagnosis.
        response: DiagnosisResponse,
        /// Feedback sub-state for this result.
        feedback: FeedbackState,
    },
    /// The last exchange failed; the message is user-dismissible.
    Failed {
        /// The failure, classifiable via [`ClientError::is_transport`].
        error: ClientError,
    },
}

/// The diagnostic screen: evidence store, current state, and the client
/// driving the exchange.
///
/// Single logical thread of execution; all mutation happens on discrete
/// user-input or network-completion events, so no locking is needed.
#[derive(Debug)]
pub struct DiagnosisScreen<C> {
    client: C,
    store: EvidenceStore,
    state: ScreenState,
}

impl<C: DiagnosisApi> DiagnosisScreen<C> {
    /// Create a screen in the `Idle` state.
    #[must_use]
    pub const fn new(client: C, store: EvidenceStore) -> Self {
        Self {
            client,
            store,
            state: ScreenState::Idle,
        }
    }

    /// Current screen state.
    #[must_use]
    pub const fn state(&self) -> &ScreenState {
        &self.state
    }

    /// The evidence store, for rendering.
    #[must_use]
    pub const fn evidence(&self) -> &EvidenceStore {
        &self.store
    }

    /// The evidence store, for user-input mutation.
    ///
    /// Mutating evidence never triggers a network call; the diagnosis
    /// exchange is explicit via [`Self::diagnose`].
    pub fn evidence_mut(&mut self) -> &mut EvidenceStore {
        &mut self.store
    }

    /// Run a diagnosis for the current evidence.
    ///
    /// Encodes the store, enters `Loading`, and resolves to `Success` or
    /// `Failed`. A failed exchange leaves the evidence store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Busy`] if a request is already in flight;
    /// the state is not disturbed.
    pub async fn diagnose(&mut self) -> Result<(), ScreenError> {
        if self.state == ScreenState::Loading {
            return Err(ScreenError::Busy);
        }

        let request = DiagnoseRequest::from_evidence(&self.store);
        self.state = ScreenState::Loading;

        match self.client.diagnose(&request).await {
            Ok(response) => {
                tracing::debug!(
                    risk_score = response.risk_score,
                    improvements = response.improvements.len(),
                    "Diagnosis succeeded"
                );
                // A fresh result always starts with feedback NotSent.
                self.state = ScreenState::Success {
                    response,
                    feedback: FeedbackState::NotSent,
                };
            }
            Err(error) => {
                tracing::warn!(error = %error, "Diagnosis failed");
                self.state = ScreenState::Failed { error };
            }
        }
        Ok(())
    }

    /// Send the correctness signal for the current result.
    ///
    /// Best-effort: transport failure is logged and swallowed, leaving
    /// the sub-state at `NotSent` so the user may try again. The
    /// sub-state moves to `Sent` only on a successful exchange.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NoResult`] without a result on screen and
    /// [`ScreenError::FeedbackAlreadySent`] for a repeat submission.
    pub async fn send_feedback(&mut self, is_correct: bool) -> Result<(), ScreenError> {
        let ScreenState::Success { feedback, .. } = &mut self.state else {
            return Err(ScreenError::NoResult);
        };
        if *feedback == FeedbackState::Sent {
            return Err(ScreenError::FeedbackAlreadySent);
        }

        match self.client.send_feedback(is_correct).await {
            Ok(()) => {
                if let ScreenState::Success { feedback, .. } = &mut self.state {
                    *feedback = FeedbackState::Sent;
                }
            }
            Err(error) => {
                // Non-critical telemetry; never blocks or retries.
                tracing::warn!(error = %error, "Feedback submission failed, ignoring");
            }
        }
        Ok(())
    }

    /// Dismiss a failure message, returning to `Idle`.
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, ScreenState::Failed { .. }) {
            self.state = ScreenState::Idle;
        }
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
    use crate::client::MockDiagnosisApi;
    use crate::evidence::AnswerValue;
    use crate::schema::Schema;
    use crate::wire::RiskLevel;
    use async_trait::async_trait;

    fn sample_response(score: f64, level: RiskLevel) -> DiagnosisResponse {
        DiagnosisResponse {
            risk_score: score,
            risk_level: level,
            advice: "Take a break".to_string(),
            improvements: Vec::new(),
        }
    }

    fn screen_with(client: MockDiagnosisApi) -> DiagnosisScreen<MockDiagnosisApi> {
        DiagnosisScreen::new(client, EvidenceStore::new(Schema::builtin()))
    }

    #[test]
    fn test_initial_state_is_idle() {
        let screen = screen_with(MockDiagnosisApi::new());
        assert_eq!(*screen.state(), ScreenState::Idle);
    }

    #[tokio::test]
    async fn test_diagnose_success_transition() {
        let mut client = MockDiagnosisApi::new();
        client
            .expect_diagnose()
            .times(1)
            .returning(|_| Ok(sample_response(0.82, RiskLevel::Danger)));

        let mut screen = screen_with(client);
        screen.evidence_mut().toggle("Overworked").unwrap();
        screen.diagnose().await.unwrap();

        match screen.state() {
            ScreenState::Success { response, feedback } => {
                assert_eq!(response.risk_score, 0.82);
                assert_eq!(*feedback, FeedbackState::NotSent);
            }
            state => panic!("Unexpected state: {state:?}"),
        }
    }

    #[tokio::test]
    async fn test_diagnose_failure_leaves_evidence_untouched() {
        let mut client = MockDiagnosisApi::new();
        client.expect_diagnose().times(1).returning(|_| {
            Err(ClientError::Network {
                message: "connection refused".to_string(),
            })
        });

        let mut screen = screen_with(client);
        screen.evidence_mut().toggle("SleepDeprived").unwrap();
        let before = screen.evidence().answers().clone();

        screen.diagnose().await.unwrap();

        match screen.state() {
            ScreenState::Failed { error } => assert!(error.is_transport()),
            state => panic!("Unexpected state: {state:?}"),
        }
        assert_eq!(*screen.evidence().answers(), before);
    }

    #[tokio::test]
    async fn test_diagnose_encodes_current_evidence() {
        let mut client = MockDiagnosisApi::new();
        client
            .expect_diagnose()
            .withf(|request| {
                request.evidence.get("Overworked") == Some(&AnswerValue::Bool(true))
                    && request.evidence.len() == 4
            })
            .times(1)
            .returning(|_| Ok(sample_response(0.5, RiskLevel::Warning)));

        let mut screen = screen_with(client);
        screen.evidence_mut().toggle("Overworked").unwrap();
        screen.diagnose().await.unwrap();
    }

    #[tokio::test]
    async fn test_busy_guard_rejects_second_diagnose() {
        // A client whose request never resolves.
        struct NeverApi;
        #[async_trait]
        impl DiagnosisApi for NeverApi {
            async fn diagnose(
                &self,
                _: &DiagnoseRequest,
            ) -> Result<DiagnosisResponse, ClientError> {
                std::future::pending().await
            }
            async fn send_feedback(&self, _: bool) -> Result<(), ClientError> {
                std::future::pending().await
            }
        }

        let mut screen = DiagnosisScreen::new(NeverApi, EvidenceStore::new(Schema::builtin()));
        {
            let mut in_flight = tokio_test::task::spawn(screen.diagnose());
            assert!(in_flight.poll().is_pending());
        }
        // The abandoned request left the screen in Loading.
        assert_eq!(*screen.state(), ScreenState::Loading);
        assert_eq!(screen.diagnose().await.unwrap_err(), ScreenError::Busy);
    }

    #[tokio::test]
    async fn test_feedback_not_sent_to_sent() {
        let mut client = MockDiagnosisApi::new();
        client
            .expect_diagnose()
            .returning(|_| Ok(sample_response(0.82, RiskLevel::Danger)));
        client
            .expect_send_feedback()
            .times(1)
            .returning(|_| Ok(()));

        let mut screen = screen_with(client);
        screen.diagnose().await.unwrap();
        screen.send_feedback(true).await.unwrap();

        match screen.state() {
            ScreenState::Success { feedback, .. } => {
                assert_eq!(*feedback, FeedbackState::Sent);
            }
            state => panic!("Unexpected state: {state:?}"),
        }
    }

    #[tokio::test]
    async fn test_feedback_repeat_rejected() {
        let mut client = MockDiagnosisApi::new();
        client
            .expect_diagnose()
            .returning(|_| Ok(sample_response(0.82, RiskLevel::Danger)));
        client.expect_send_feedback().times(1).returning(|_| Ok(()));

        let mut screen = screen_with(client);
        screen.diagnose().await.unwrap();
        screen.send_feedback(true).await.unwrap();

        assert_eq!(
            screen.send_feedback(true).await.unwrap_err(),
            ScreenError::FeedbackAlreadySent
        );
    }

    #[tokio::test]
    async fn test_feedback_failure_swallowed() {
        let mut client = MockDiagnosisApi::new();
        client
            .expect_diagnose()
            .returning(|_| Ok(sample_response(0.82, RiskLevel::Danger)));
        client.expect_send_feedback().times(1).returning(|_| {
            Err(ClientError::Network {
                message: "unreachable".to_string(),
            })
        });

        let mut screen = screen_with(client);
        screen.diagnose().await.unwrap();
        // Best-effort: no error surfaces, sub-state stays NotSent.
        screen.send_feedback(false).await.unwrap();

        match screen.state() {
            ScreenState::Success { feedback, .. } => {
                assert_eq!(*feedback, FeedbackState::NotSent);
            }
            state => panic!("Unexpected state: {state:?}"),
        }
    }

    #[tokio::test]
    async fn test_feedback_without_result_rejected() {
        let mut screen = screen_with(MockDiagnosisApi::new());
        assert_eq!(
            screen.send_feedback(true).await.unwrap_err(),
            ScreenError::NoResult
        );
    }

    #[tokio::test]
    async fn test_new_success_resets_feedback() {
        let mut client = MockDiagnosisApi::new();
        client
            .expect_diagnose()
            .times(2)
            .returning(|_| Ok(sample_response(0.4, RiskLevel::Warning)));
        client.expect_send_feedback().times(1).returning(|_| Ok(()));

        let mut screen = screen_with(client);
        screen.diagnose().await.unwrap();
        screen.send_feedback(true).await.unwrap();

        screen.diagnose().await.unwrap();
        match screen.state() {
            ScreenState::Success { feedback, .. } => {
                assert_eq!(*feedback, FeedbackState::NotSent);
            }
            state => panic!("Unexpected state: {state:?}"),
        }
    }

    #[tokio::test]
    async fn test_dismiss_error_returns_to_idle() {
        let mut client = MockDiagnosisApi::new();
        client.expect_diagnose().returning(|_| {
            Err(ClientError::Timeout { timeout_ms: 10 })
        });

        let mut screen = screen_with(client);
        screen.diagnose().await.unwrap();
        assert!(matches!(screen.state(), ScreenState::Failed { .. }));

        screen.dismiss_error();
        assert_eq!(*screen.state(), ScreenState::Idle);
    }
}
