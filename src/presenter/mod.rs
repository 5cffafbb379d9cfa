//! Result presentation.
//!
//! This module provides:
//! - [`RiskStyle`]: the visual descriptor for each risk tier
//! - [`ScoreDisplay`]: clamped, formatted score rendering
//! - [`ImprovementRow`]: one rendered what-if suggestion
//! - [`DiagnosisScreen`]: the screen state machine driving the exchange
//!
//! Everything here is a pure mapping from response data to display
//! descriptors; the only side effects live in the screen state machine,
//! which owns the evidence store and the current result.

mod screen;

pub use screen::{DiagnosisScreen, FeedbackState, ScreenState};

use crate::wire::{Improvement, RiskLevel};

/// Visual descriptor for a risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskStyle {
    /// Display label for the tier.
    pub label: &'static str,
    /// Style for the result card.
    pub base: &'static str,
    /// Accent style for the progress bar.
    pub accent: &'static str,
    /// Icon name for the tier.
    pub icon: &'static str,
}

impl RiskLevel {
    /// The visual descriptor for this tier.
    ///
    /// Total over the enum; unrecognized server values fall back to the
    /// gray style instead of failing.
    #[must_use]
    pub const fn style(self) -> RiskStyle {
        match self {
            Self::Safe => RiskStyle {
                label: "SAFE",
                base: "text-emerald-700 bg-emerald-50",
                accent: "bg-emerald-500",
                icon: "check-circle",
            },
            Self::Warning => RiskStyle {
                label: "WARNING",
                base: "text-amber-700 bg-amber-50",
                accent: "bg-amber-500",
                icon: "info",
            },
            Self::Danger => RiskStyle {
                label: "DANGER",
                base: "text-rose-700 bg-rose-50",
                accent: "bg-rose-600",
                icon: "alert-triangle",
            },
            Self::Unknown => RiskStyle {
                label: "UNKNOWN",
                base: "text-gray-700",
                accent: "bg-gray-400",
                icon: "help-circle",
            },
        }
    }
}

/// Formatted score rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDisplay {
    /// Percent text with one decimal, e.g. `"82.0%"`.
    pub percent_text: String,
    /// Progress-bar width, clamped to `[0, 100]`.
    pub bar_width_percent: f64,
}

impl ScoreDisplay {
    /// Render a risk score.
    ///
    /// The bar width is clamped even for scores outside the nominal
    /// `[0, 1]` range; non-finite scores render as an empty bar.
    #[must_use]
    pub fn from_score(risk_score: f64) -> Self {
        let percent = risk_score * 100.0;
        let bar_width_percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            percent_text: format!("{percent:.1}%"),
            bar_width_percent,
        }
    }
}

/// One rendered what-if suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovementRow {
    /// The evidence factor the suggestion targets.
    pub factor: String,
    /// Suggestion text.
    pub advice: String,
    /// Formatted score delta, e.g. `"-21.0%"`.
    pub delta_text: String,
}

/// Render improvement suggestions, one row per entry.
///
/// Ordering is preserved from the response; the service pre-sorts by
/// largest reduction. An empty or absent list renders zero rows.
#[must_use]
pub fn improvement_rows(improvements: &[Improvement]) -> Vec<ImprovementRow> {
    improvements
        .iter()
        .map(|improvement| ImprovementRow {
            factor: improvement.factor.clone(),
            advice: improvement.advice.clone(),
            delta_text: format!("-{:.1}%", improvement.reduction * 100.0),
        })
        .collect()
}
