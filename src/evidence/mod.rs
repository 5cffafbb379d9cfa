//! The evidence store.
//!
//! This module provides:
//! - [`AnswerValue`]: a boolean or numeric answer, serialized untagged so
//!   the wire format keeps native JSON types
//! - [`EvidenceStore`]: the in-memory mapping from question id to current
//!   answer, validated at every mutation
//!
//! The store holds exactly one entry per schema question at all times:
//! it is initialized by folding the schema's defaults and never gains or
//! loses keys afterward. Mutation never triggers a network call; the
//! diagnosis exchange is an explicit, user-triggered action.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schema::{InputKind, Schema};

/// A single answer value.
///
/// Serialized untagged: `Bool` becomes a JSON boolean and `Number` a JSON
/// number, which is how the inference service disambiguates input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A toggle answer.
    Bool(bool),
    /// A slider answer.
    Number(f64),
}

impl AnswerValue {
    /// The boolean payload, if this is a toggle answer.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(_) => None,
        }
    }

    /// The numeric payload, if this is a slider answer.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(_) => None,
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// In-memory mapping from question id to current answer.
///
/// Owns a copy of the [`Schema`] so every mutation can be checked against
/// the declared domain before it lands.
#[derive(Debug, Clone)]
pub struct EvidenceStore {
    schema: Schema,
    answers: BTreeMap<String, AnswerValue>,
}

impl EvidenceStore {
    /// Create a store with one default-valued entry per schema question.
    ///
    /// Toggles start `false`; sliders start at their declared default.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        let answers = Self::default_answers(&schema);
        Self { schema, answers }
    }

    /// Reset every answer to its schema default.
    ///
    /// Idempotent; the key set is unchanged.
    pub fn reset(&mut self) {
        self.answers = Self::default_answers(&self.schema);
    }

    fn default_answers(schema: &Schema) -> BTreeMap<String, AnswerValue> {
        schema
            .iter()
            .map(|q| {
                let default = match q.input_kind {
                    InputKind::Toggle => AnswerValue::Bool(false),
                    InputKind::Slider { default, .. } => AnswerValue::Number(default),
                };
                (q.id.clone(), default)
            })
            .collect()
    }

    /// The schema this store was built from.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Current answer for `id`, if the question exists.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<AnswerValue> {
        self.answers.get(id).copied()
    }

    /// The full id-to-answer mapping.
    #[must_use]
    pub const fn answers(&self) -> &BTreeMap<String, AnswerValue> {
        &self.answers
    }

    /// Replace the answer for `id`.
    ///
    /// Out-of-range slider values are rejected, never clamped; on any
    /// error the store is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `id` is not in the schema, the value
    /// type does not match the question's kind, or a slider value falls
    /// outside its declared bounds.
    pub fn set(&mut self, id: &str, value: AnswerValue) -> Result<(), ValidationError> {
        let question = self
            .schema
            .get(id)
            .ok_or_else(|| ValidationError::UnknownQuestion { id: id.to_string() })?;

        match (&question.input_kind, value) {
            (InputKind::Toggle, AnswerValue::Bool(_)) => {}
            (InputKind::Slider { min, max, .. }, AnswerValue::Number(n)) => {
                // NaN fails the range check and is rejected with the rest.
                if !(*min..=*max).contains(&n) {
                    return Err(ValidationError::OutOfRange {
                        id: id.to_string(),
                        value: n,
                        min: *min,
                        max: *max,
                    });
                }
            }
            (kind, _) => {
                return Err(ValidationError::KindMismatch {
                    id: id.to_string(),
                    expected: kind.domain(),
                });
            }
        }

        self.answers.insert(id.to_string(), value);
        Ok(())
    }

    /// Flip the answer of a toggle question, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `id` is not in the schema or the
    /// question is not a toggle.
    pub fn toggle(&mut self, id: &str) -> Result<bool, ValidationError> {
        let question = self
            .schema
            .get(id)
            .ok_or_else(|| ValidationError::UnknownQuestion { id: id.to_string() })?;

        if question.input_kind != InputKind::Toggle {
            return Err(ValidationError::KindMismatch {
                id: id.to_string(),
                expected: question.input_kind.domain(),
            });
        }

        // The entry exists by the one-entry-per-question invariant.
        let flipped = !self.answers.get(id).and_then(|v| v.as_bool()).unwrap_or(false);
        self.answers.insert(id.to_string(), AnswerValue::Bool(flipped));
        Ok(flipped)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::schema::QuestionDefinition;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn mixed_schema() -> Schema {
        Schema::new(vec![
            QuestionDefinition::toggle("Overworked", "Overworked", ""),
            QuestionDefinition::slider("SleepHours", "Sleep hours", "", 0.0, 12.0, 0.5, 7.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_key_set_matches_schema() {
        let store = EvidenceStore::new(Schema::builtin());
        let store_ids: Vec<&str> = store.answers().keys().map(String::as_str).collect();
        let mut schema_ids: Vec<&str> =
            store.schema().iter().map(|q| q.id.as_str()).collect();
        schema_ids.sort_unstable();
        assert_eq!(store_ids, schema_ids);
    }

    #[test]
    fn test_new_defaults() {
        let store = EvidenceStore::new(mixed_schema());
        assert_eq!(store.get("Overworked"), Some(AnswerValue::Bool(false)));
        assert_eq!(store.get("SleepHours"), Some(AnswerValue::Number(7.0)));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = EvidenceStore::new(mixed_schema());
        store.toggle("Overworked").unwrap();
        store.set("SleepHours", AnswerValue::Number(3.0)).unwrap();

        store.reset();
        assert_eq!(store.get("Overworked"), Some(AnswerValue::Bool(false)));
        assert_eq!(store.get("SleepHours"), Some(AnswerValue::Number(7.0)));
    }

    #[test]
    fn test_set_unknown_id_rejected() {
        let mut store = EvidenceStore::new(mixed_schema());
        let err = store.set("Caffeinated", AnswerValue::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownQuestion {
                id: "Caffeinated".to_string()
            }
        );
        assert_eq!(store.answers().len(), 2);
    }

    #[test]
    fn test_set_kind_mismatch_rejected() {
        let mut store = EvidenceStore::new(mixed_schema());
        let err = store.set("Overworked", AnswerValue::Number(1.0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::KindMismatch {
                id: "Overworked".to_string(),
                expected: "boolean",
            }
        );

        let err = store.set("SleepHours", AnswerValue::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::KindMismatch {
                id: "SleepHours".to_string(),
                expected: "number",
            }
        );
    }

    #[test]
    fn test_set_out_of_range_rejected_store_unchanged() {
        let mut store = EvidenceStore::new(mixed_schema());
        let before = store.get("SleepHours");

        let err = store.set("SleepHours", AnswerValue::Number(13.5)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(store.get("SleepHours"), before);

        let err = store.set("SleepHours", AnswerValue::Number(-0.5)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(store.get("SleepHours"), before);
    }

    #[test]
    fn test_set_at_bounds_accepted() {
        let mut store = EvidenceStore::new(mixed_schema());
        store.set("SleepHours", AnswerValue::Number(0.0)).unwrap();
        assert_eq!(store.get("SleepHours"), Some(AnswerValue::Number(0.0)));
        store.set("SleepHours", AnswerValue::Number(12.0)).unwrap();
        assert_eq!(store.get("SleepHours"), Some(AnswerValue::Number(12.0)));
    }

    #[test]
    fn test_toggle_flips_value() {
        let mut store = EvidenceStore::new(mixed_schema());
        assert!(store.toggle("Overworked").unwrap());
        assert_eq!(store.get("Overworked"), Some(AnswerValue::Bool(true)));
        assert!(!store.toggle("Overworked").unwrap());
        assert_eq!(store.get("Overworked"), Some(AnswerValue::Bool(false)));
    }

    #[test]
    fn test_toggle_non_toggle_rejected() {
        let mut store = EvidenceStore::new(mixed_schema());
        let err = store.toggle("SleepHours").unwrap_err();
        assert_eq!(
            err,
            ValidationError::KindMismatch {
                id: "SleepHours".to_string(),
                expected: "number",
            }
        );
    }

    #[test]
    fn test_toggle_unknown_rejected() {
        let mut store = EvidenceStore::new(mixed_schema());
        assert!(matches!(
            store.toggle("Caffeinated").unwrap_err(),
            ValidationError::UnknownQuestion { .. }
        ));
    }

    #[test]
    fn test_answer_value_serde_types() {
        assert_eq!(
            serde_json::to_string(&AnswerValue::Bool(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&AnswerValue::Number(6.5)).unwrap(),
            "6.5"
        );
        let parsed: AnswerValue = serde_json::from_str("false").unwrap();
        assert_eq!(parsed, AnswerValue::Bool(false));
        let parsed: AnswerValue = serde_json::from_str("3.25").unwrap();
        assert_eq!(parsed, AnswerValue::Number(3.25));
    }

    proptest! {
        #[test]
        fn prop_toggle_is_involution(initial in proptest::bool::ANY) {
            let mut store = EvidenceStore::new(mixed_schema());
            store.set("Overworked", AnswerValue::Bool(initial)).unwrap();

            store.toggle("Overworked").unwrap();
            store.toggle("Overworked").unwrap();
            prop_assert_eq!(store.get("Overworked"), Some(AnswerValue::Bool(initial)));
        }

        #[test]
        fn prop_slider_set_get_exact(v in 0.0f64..=12.0f64) {
            let mut store = EvidenceStore::new(mixed_schema());
            store.set("SleepHours", AnswerValue::Number(v)).unwrap();
            prop_assert_eq!(store.get("SleepHours"), Some(AnswerValue::Number(v)));
        }

        #[test]
        fn prop_slider_set_total_never_panics(v in proptest::num::f64::ANY) {
            let mut store = EvidenceStore::new(mixed_schema());
            let in_range = (0.0..=12.0).contains(&v);
            let result = store.set("SleepHours", AnswerValue::Number(v));
            prop_assert_eq!(result.is_ok(), in_range);
            if !in_range {
                prop_assert_eq!(store.get("SleepHours"), Some(AnswerValue::Number(7.0)));
            }
        }
    }
}
