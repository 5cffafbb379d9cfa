//! The question catalog.
//!
//! This module provides:
//! - [`QuestionDefinition`]: one questionnaire entry
//! - [`InputKind`]: tagged variant describing the answer domain
//! - [`Schema`]: the immutable, ordered, validated catalog
//!
//! The schema is pure data. A question's `id` doubles as the evidence key
//! and the wire-format field name, so renaming an id is a breaking change
//! for any consumer of the service contract, not a cosmetic edit.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// The answer domain of a question.
///
/// Dispatch on the variant at render time and at validation time; new
/// kinds (e.g. a multiple-choice input) are added here, never as a
/// parallel type hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// A boolean on/off switch. Defaults to `false`.
    Toggle,
    /// A bounded numeric slider.
    Slider {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive). Must be greater than `min`.
        max: f64,
        /// Granularity of the control.
        step: f64,
        /// Initial value. Must lie within `[min, max]`.
        default: f64,
    },
}

impl InputKind {
    /// Human-readable name of the expected value domain.
    #[must_use]
    pub const fn domain(&self) -> &'static str {
        match self {
            Self::Toggle => "boolean",
            Self::Slider { .. } => "number",
        }
    }
}

/// One entry of the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Stable identifier; evidence key and wire-format field name.
    pub id: String,
    /// The answer domain.
    #[serde(flatten)]
    pub input_kind: InputKind,
    /// Primary display text.
    pub label: String,
    /// Secondary display text.
    pub sub_label: String,
    /// Icon hint for the front end.
    pub icon: String,
    /// Accent color hint for the front end.
    pub accent: String,
}

impl QuestionDefinition {
    /// Create a toggle question.
    #[must_use]
    pub fn toggle(
        id: impl Into<String>,
        label: impl Into<String>,
        sub_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            input_kind: InputKind::Toggle,
            label: label.into(),
            sub_label: sub_label.into(),
            icon: String::new(),
            accent: String::new(),
        }
    }

    /// Create a slider question.
    #[must_use]
    pub fn slider(
        id: impl Into<String>,
        label: impl Into<String>,
        sub_label: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Self {
        Self {
            id: id.into(),
            input_kind: InputKind::Slider {
                min,
                max,
                step,
                default,
            },
            label: label.into(),
            sub_label: sub_label.into(),
            icon: String::new(),
            accent: String::new(),
        }
    }

    /// Set the icon hint.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the accent color hint.
    #[must_use]
    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent = accent.into();
        self
    }

    /// Validate kind-specific parameters.
    fn validate(&self) -> Result<(), SchemaError> {
        if let InputKind::Slider {
            min,
            max,
            step,
            default,
        } = self.input_kind
        {
            if min >= max {
                return Err(SchemaError::InvalidBounds {
                    id: self.id.clone(),
                    min,
                    max,
                });
            }
            if step <= 0.0 {
                return Err(SchemaError::InvalidStep {
                    id: self.id.clone(),
                    step,
                });
            }
            if default < min || default > max {
                return Err(SchemaError::DefaultOutOfRange {
                    id: self.id.clone(),
                    default,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// The immutable, ordered question catalog.
///
/// Built once at start; no runtime mutation path exists. Downstream code
/// indexes questions by `id` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    questions: Vec<QuestionDefinition>,
}

impl Schema {
    /// Build a schema from an ordered list of questions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if any id appears twice or any slider
    /// carries inverted bounds, a non-positive step, or an out-of-range
    /// default.
    pub fn new(questions: Vec<QuestionDefinition>) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(SchemaError::DuplicateId {
                    id: question.id.clone(),
                });
            }
            question.validate()?;
        }
        Ok(Self { questions })
    }

    /// The production catalog.
    ///
    /// Four observable factors feeding the concentration-drop network,
    /// in presentation order.
    #[must_use]
    pub fn builtin() -> Self {
        let questions = vec![
            QuestionDefinition::toggle(
                "Overworked",
                "Overworked",
                "Overtime or task load has exceeded capacity lately",
            )
            .with_icon("activity")
            .with_accent("blue"),
            QuestionDefinition::toggle(
                "SleepDeprived",
                "Sleep deprived",
                "Running on less than six hours of sleep",
            )
            .with_icon("moon")
            .with_accent("indigo"),
            QuestionDefinition::toggle(
                "SmartphoneDistraction",
                "Phone notifications",
                "Notifications keep pulling attention away from work",
            )
            .with_icon("smartphone")
            .with_accent("pink"),
            QuestionDefinition::toggle(
                "CarelessMistake",
                "Careless mistake",
                "An unusual slip happened, like a typo or a bug",
            )
            .with_icon("alert-octagon")
            .with_accent("orange"),
        ];

        // The builtin catalog is validated by construction; unique ids,
        // no sliders to bounds-check.
        Self { questions }
    }

    /// Ordered iteration over the catalog.
    pub fn iter(&self) -> std::slice::Iter<'_, QuestionDefinition> {
        self.questions.iter()
    }

    /// Look up a question by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Number of questions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a QuestionDefinition;
    type IntoIter = std::slice::Iter<'a, QuestionDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_catalog_order_and_ids() {
        let schema = Schema::builtin();
        let ids: Vec<&str> = schema.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Overworked",
                "SleepDeprived",
                "SmartphoneDistraction",
                "CarelessMistake"
            ]
        );
    }

    #[test]
    fn test_builtin_catalog_all_toggles() {
        let schema = Schema::builtin();
        assert!(schema.iter().all(|q| q.input_kind == InputKind::Toggle));
    }

    #[test]
    fn test_get_known_and_unknown() {
        let schema = Schema::builtin();
        assert!(schema.get("Overworked").is_some());
        assert!(schema.get("overworked").is_none());
        assert!(schema.get("Caffeinated").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Schema::new(vec![
            QuestionDefinition::toggle("Overworked", "a", "b"),
            QuestionDefinition::toggle("Overworked", "c", "d"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateId {
                id: "Overworked".to_string()
            }
        );
    }

    #[test]
    fn test_slider_inverted_bounds_rejected() {
        let result = Schema::new(vec![QuestionDefinition::slider(
            "SleepHours",
            "Sleep hours",
            "",
            12.0,
            0.0,
            0.5,
            7.0,
        )]);
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::InvalidBounds { .. }
        ));
    }

    #[test]
    fn test_slider_default_out_of_range_rejected() {
        let result = Schema::new(vec![QuestionDefinition::slider(
            "SleepHours",
            "Sleep hours",
            "",
            0.0,
            12.0,
            0.5,
            13.0,
        )]);
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::DefaultOutOfRange { .. }
        ));
    }

    #[test]
    fn test_slider_non_positive_step_rejected() {
        let result = Schema::new(vec![QuestionDefinition::slider(
            "SleepHours",
            "Sleep hours",
            "",
            0.0,
            12.0,
            0.0,
            7.0,
        )]);
        assert!(matches!(result.unwrap_err(), SchemaError::InvalidStep { .. }));
    }

    #[test]
    fn test_valid_mixed_schema() {
        let schema = Schema::new(vec![
            QuestionDefinition::toggle("Overworked", "Overworked", ""),
            QuestionDefinition::slider("SleepHours", "Sleep hours", "", 0.0, 12.0, 0.5, 7.0),
        ])
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("SleepHours").unwrap().input_kind.domain(), "number");
    }

    #[test]
    fn test_input_kind_serde_tag() {
        let toggle = serde_json::to_value(InputKind::Toggle).unwrap();
        assert_eq!(toggle["kind"], "toggle");

        let slider = serde_json::to_value(InputKind::Slider {
            min: 0.0,
            max: 12.0,
            step: 0.5,
            default: 7.0,
        })
        .unwrap();
        assert_eq!(slider["kind"], "slider");
        assert_eq!(slider["max"], 12.0);
    }
}
