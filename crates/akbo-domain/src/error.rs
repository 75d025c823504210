//! Domain errors
//!
//! Every invariant violation in the kernel surfaces as a [`DomainError`].

use thiserror::Error;

/// Errors raised by domain operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A time value had no timezone information
    #[error("{field} must be a timezone-aware datetime (UTC recommended)")]
    TimestampMustBeTimezoneAware { field: String },

    /// Two time values were in the wrong order (e.g. `now` before `updated_at`)
    #[error("{later} must not be earlier than {earlier}")]
    TimestampOrder { earlier: String, later: String },

    /// Text that is not a date-time at all
    #[error("{field} is not a valid ISO-8601 datetime: {value}")]
    InvalidTimestamp { field: String, value: String },

    /// A value object rule was violated
    #[error("{0}")]
    Validation(String),

    /// An event could not be turned into its outbox form
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    pub fn timezone_required(field: impl Into<String>) -> Self {
        DomainError::TimestampMustBeTimezoneAware {
            field: field.into(),
        }
    }

    pub fn order(earlier: impl Into<String>, later: impl Into<String>) -> Self {
        DomainError::TimestampOrder {
            earlier: earlier.into(),
            later: later.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
