//! Error types for calendar and sidereal-time conversions.

use thiserror::Error;

/// Errors from civil-date / Julian Day conversion.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Malformed or out-of-range civil date, or a Julian Day outside the
    /// supported calendar span.
    #[error("invalid date `{input}`: {reason}")]
    InvalidDate { input: String, reason: &'static str },
    /// Geographic longitude is not a finite number.
    #[error("invalid longitude: {0}")]
    InvalidLongitude(f64),
}

impl TimeError {
    pub(crate) fn invalid_date(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason,
        }
    }
}
