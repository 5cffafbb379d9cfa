//! Error types for the focus-check client.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`SchemaError`]: Question catalog construction errors
//! - [`ValidationError`]: Evidence domain violations
//! - [`ClientError`]: Inference service transport and decode errors
//! - [`ScreenError`]: Screen state machine guard violations
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Top-level application error.
///
/// This is the main error type returned by public API functions.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Question catalog error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Evidence validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Inference service error.
    #[error("Diagnosis client error: {0}")]
    Client(#[from] ClientError),

    /// Screen state machine error.
    #[error("Screen error: {0}")]
    Screen(#[from] ScreenError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Question catalog construction errors.
///
/// A [`crate::schema::Schema`] is validated once, when it is built; these
/// errors reject catalogs that downstream code could not index safely.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// Two questions share the same id.
    #[error("Duplicate question id: {id}")]
    DuplicateId {
        /// The id that appears more than once.
        id: String,
    },

    /// Slider bounds are inverted or degenerate.
    #[error("Invalid slider bounds for {id}: min {min} must be less than max {max}")]
    InvalidBounds {
        /// The question id.
        id: String,
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },

    /// Slider default falls outside its declared bounds.
    #[error("Default {default} for {id} is outside [{min}, {max}]")]
    DefaultOutOfRange {
        /// The question id.
        id: String,
        /// Declared default value.
        default: f64,
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },

    /// Slider step is zero or negative.
    #[error("Step {step} for {id} must be positive")]
    InvalidStep {
        /// The question id.
        id: String,
        /// Declared step.
        step: f64,
    },
}

/// Evidence domain violations.
///
/// These errors are raised at the evidence store boundary and handled
/// locally; they never surface as a user-facing alarm.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The id does not name any question in the schema.
    #[error("Unknown question: {id}")]
    UnknownQuestion {
        /// The unrecognized id.
        id: String,
    },

    /// The value's type does not match the question's input kind.
    #[error("Kind mismatch for {id}: expected {expected}")]
    KindMismatch {
        /// The question id.
        id: String,
        /// The expected domain ("boolean" or "number").
        expected: &'static str,
    },

    /// A slider value falls outside its declared bounds.
    ///
    /// Out-of-range values are rejected, never clamped; the store is
    /// left unchanged.
    #[error("Value {value} for {id} is outside [{min}, {max}]")]
    OutOfRange {
        /// The question id.
        id: String,
        /// The rejected value.
        value: f64,
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },
}

/// Inference service errors.
///
/// These errors represent failures when exchanging requests with the
/// diagnosis and feedback endpoints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body could not be decoded.
    ///
    /// Raised when a required field (`risk_score`, `risk_level`) is
    /// missing or malformed. Absent optional fields never produce this.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl ClientError {
    /// Returns true if this error originated at the transport layer.
    ///
    /// Transport failures are recoverable by re-triggering the request;
    /// decode failures indicate a contract mismatch with the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Network { .. } | Self::UnexpectedStatus { .. }
        )
    }
}

/// Screen state machine guard violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// A diagnosis was requested while one is already in flight.
    #[error("A diagnosis is already in flight")]
    Busy,

    /// Feedback was requested without a diagnosis result on screen.
    #[error("No diagnosis result to give feedback on")]
    NoResult,

    /// Feedback was already sent for the current result.
    #[error("Feedback already sent for this result")]
    FeedbackAlreadySent,
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    // Type assertions - verify all errors implement required traits
    assert_impl_all!(AppError: Send, Sync, std::error::Error);
    assert_impl_all!(SchemaError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ValidationError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ClientError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ScreenError: Send, Sync, std::error::Error, Clone);
    assert_impl_all!(ConfigError: Send, Sync, std::error::Error, Clone);

    #[test]
    fn test_app_error_display_validation() {
        let err = AppError::Validation(ValidationError::UnknownQuestion {
            id: "Caffeinated".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Validation error: Unknown question: Caffeinated"
        );
    }

    #[test]
    fn test_app_error_display_client() {
        let err = AppError::Client(ClientError::Timeout { timeout_ms: 10_000 });
        assert_eq!(
            err.to_string(),
            "Diagnosis client error: Request timeout after 10000ms"
        );
    }

    #[test]
    fn test_app_error_display_screen() {
        let err = AppError::Screen(ScreenError::Busy);
        assert_eq!(err.to_string(), "Screen error: A diagnosis is already in flight");
    }

    #[test]
    fn test_app_error_from_schema_error() {
        let schema_err = SchemaError::DuplicateId {
            id: "Overworked".to_string(),
        };
        let app_err: AppError = schema_err.into();
        assert!(matches!(app_err, AppError::Schema(_)));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::InvalidValue {
            var: "REQUEST_TIMEOUT_MS".to_string(),
            reason: "must be a positive integer".to_string(),
        };
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(_)));
    }

    #[test]
    fn test_schema_error_display_bounds() {
        let err = SchemaError::InvalidBounds {
            id: "SleepHours".to_string(),
            min: 10.0,
            max: 2.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid slider bounds for SleepHours: min 10 must be less than max 2"
        );
    }

    #[test]
    fn test_validation_error_display_out_of_range() {
        let err = ValidationError::OutOfRange {
            id: "SleepHours".to_string(),
            value: 13.5,
            min: 0.0,
            max: 12.0,
        };
        assert_eq!(
            err.to_string(),
            "Value 13.5 for SleepHours is outside [0, 12]"
        );
    }

    #[test]
    fn test_validation_error_display_kind_mismatch() {
        let err = ValidationError::KindMismatch {
            id: "Overworked".to_string(),
            expected: "boolean",
        };
        assert_eq!(err.to_string(), "Kind mismatch for Overworked: expected boolean");
    }

    #[test]
    fn test_client_error_is_transport() {
        assert!(ClientError::Timeout { timeout_ms: 1 }.is_transport());
        assert!(ClientError::Network {
            message: "connection refused".to_string()
        }
        .is_transport());
        assert!(ClientError::UnexpectedStatus {
            status: 500,
            body: String::new()
        }
        .is_transport());
        assert!(!ClientError::Decode {
            message: "missing field risk_score".to_string()
        }
        .is_transport());
    }

    #[test]
    fn test_screen_error_display() {
        assert_eq!(
            ScreenError::FeedbackAlreadySent.to_string(),
            "Feedback already sent for this result"
        );
        assert_eq!(
            ScreenError::NoResult.to_string(),
            "No diagnosis result to give feedback on"
        );
    }

    #[test]
    fn test_client_error_clone_eq() {
        let err = ClientError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
