//! Wire contract with the inference service.
//!
//! This module provides:
//! - [`DiagnoseRequest`]: the outbound evidence payload
//! - [`DiagnosisResponse`] and [`Improvement`]: the inbound result
//! - [`RiskLevel`]: the three-valued classification with a fallback
//! - [`FeedbackRequest`]: the correctness signal
//!
//! One canonical shape is supported: the keyed `evidence` wrapper with an
//! optional `improvements` list. Optional response fields decode to
//! explicit defaults here, at the boundary, so rendering code never probes
//! for field presence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::evidence::{AnswerValue, EvidenceStore};

/// Outbound request body for `POST /diagnose`.
///
/// A structural copy of the evidence record under a single wrapping key.
/// No validation happens here; values were checked when they entered the
/// store, and native JSON typing is preserved so the service can
/// disambiguate input kinds by value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnoseRequest {
    /// Question id to observed value.
    pub evidence: BTreeMap<String, AnswerValue>,
}

impl DiagnoseRequest {
    /// Encode an evidence store into the request payload.
    #[must_use]
    pub fn from_evidence(store: &EvidenceStore) -> Self {
        Self {
            evidence: store.answers().clone(),
        }
    }
}

/// The three-valued risk classification.
///
/// `Unknown` absorbs any value a newer server version may emit, so
/// server-side enum growth degrades to the fallback style instead of a
/// decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Risk score in the comfortable band.
    Safe,
    /// Elevated risk; a break is advisable.
    Warning,
    /// Critical risk; immediate rest is advised.
    Danger,
    /// Any classification this client version does not know.
    #[serde(other)]
    Unknown,
}

/// One what-if improvement suggestion.
///
/// Server-computed sensitivity deltas: how much the risk score would drop
/// if the named evidence factor changed. Ordering is meaningful and comes
/// pre-sorted from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    /// The evidence factor to change.
    pub factor: String,
    /// Expected risk score reduction, in `[0, 1]`.
    pub reduction: f64,
    /// Suggestion text.
    pub advice: String,
}

/// Inbound response body from `POST /diagnose`.
///
/// `risk_score` and `risk_level` are required; a body missing either fails
/// the decode. `advice` and `improvements` default when absent, keeping
/// older server payload shapes decodable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResponse {
    /// Estimated risk probability in `[0, 1]`.
    pub risk_score: f64,
    /// Classification of the score.
    pub risk_level: RiskLevel,
    /// Natural-language advice. Empty when the server sends none.
    #[serde(default)]
    pub advice: String,
    /// What-if suggestions. Empty when absent; absence is not an error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub improvements: Vec<Improvement>,
}

/// Outbound request body for `POST /feedback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Whether the user judged the diagnosis correct.
    pub is_correct: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::schema::{QuestionDefinition, Schema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_store() -> EvidenceStore {
        let schema = Schema::new(vec![
            QuestionDefinition::toggle("Overworked", "Overworked", ""),
            QuestionDefinition::slider("SleepHours", "Sleep hours", "", 0.0, 12.0, 0.5, 7.0),
        ])
        .unwrap();
        EvidenceStore::new(schema)
    }

    #[test]
    fn test_request_is_structural_copy() {
        let mut store = sample_store();
        store.toggle("Overworked").unwrap();
        store.set("SleepHours", AnswerValue::Number(5.5)).unwrap();

        let request = DiagnoseRequest::from_evidence(&store);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"evidence": {"Overworked": true, "SleepHours": 5.5}})
        );
    }

    #[test]
    fn test_request_preserves_native_types() {
        let store = sample_store();
        let body = serde_json::to_string(&DiagnoseRequest::from_evidence(&store)).unwrap();
        // Booleans and numbers stay unquoted on the wire.
        assert!(body.contains("\"Overworked\":false"));
        assert!(body.contains("\"SleepHours\":7"));
        assert!(!body.contains("\"false\""));
    }

    #[test]
    fn test_request_round_trip() {
        let mut store = sample_store();
        store.toggle("Overworked").unwrap();
        let request = DiagnoseRequest::from_evidence(&store);

        let body = serde_json::to_string(&request).unwrap();
        let decoded: DiagnoseRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(decoded.evidence, *store.answers());
    }

    #[test]
    fn test_response_full_shape() {
        let body = json!({
            "risk_score": 0.82,
            "risk_level": "DANGER",
            "advice": "Take a break",
            "improvements": [
                {"factor": "SleepDeprived", "reduction": 0.21, "advice": "Sleep more"}
            ]
        });
        let response: DiagnosisResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.risk_score, 0.82);
        assert_eq!(response.risk_level, RiskLevel::Danger);
        assert_eq!(response.advice, "Take a break");
        assert_eq!(response.improvements.len(), 1);
        assert_eq!(response.improvements[0].factor, "SleepDeprived");
    }

    #[test]
    fn test_response_optional_fields_default() {
        let body = json!({"risk_score": 0.12, "risk_level": "SAFE"});
        let response: DiagnosisResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.risk_level, RiskLevel::Safe);
        assert!(response.advice.is_empty());
        assert!(response.improvements.is_empty());
    }

    #[test]
    fn test_response_missing_required_field_fails() {
        let body = json!({"risk_level": "SAFE", "advice": "ok"});
        assert!(serde_json::from_value::<DiagnosisResponse>(body).is_err());

        let body = json!({"risk_score": 0.5, "advice": "ok"});
        assert!(serde_json::from_value::<DiagnosisResponse>(body).is_err());
    }

    #[test]
    fn test_risk_level_unknown_fallback() {
        let body = json!({"risk_score": 0.5, "risk_level": "CATASTROPHIC"});
        let response: DiagnosisResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn test_risk_level_wire_names() {
        for (level, name) in [
            (RiskLevel::Safe, "\"SAFE\""),
            (RiskLevel::Warning, "\"WARNING\""),
            (RiskLevel::Danger, "\"DANGER\""),
        ] {
            assert_eq!(serde_json::to_string(&level).unwrap(), name);
        }
    }

    #[test]
    fn test_feedback_request_body() {
        let body = serde_json::to_value(FeedbackRequest { is_correct: true }).unwrap();
        assert_eq!(body, json!({"is_correct": true}));
    }
}
