//! Error types for the feed and the advisory search.

use std::borrow::Cow;

use muhurta_chart::{Body, ChartError};
use muhurta_time::TimeError;
use thiserror::Error;

/// Errors from an ephemeris feed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedError {
    /// The feed could not answer for this instant.
    #[error("ephemeris unavailable at JD {jd}: {reason}")]
    Unavailable { jd: f64, reason: String },
    /// The feed answered but left out a tracked body.
    #[error("ephemeris at JD {jd} has no reading for {body}")]
    Incomplete { jd: f64, body: Body },
    /// A tabulated feed failed validation.
    #[error("invalid ephemeris table: {0}")]
    InvalidTable(String),
    #[error("ephemeris table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ephemeris table I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Errors from the advisory search.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdviceError {
    /// Malformed or out-of-range date in the request.
    #[error(transparent)]
    InvalidDate(#[from] TimeError),
    /// Request failed validation (note too long, bad timezone string).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Search parameters or topic catalog failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No natal chart for the user.
    #[error("natal chart not found for `{0}`")]
    NatalChartNotFound(String),
    /// Every window of the scan failed to get positions.
    #[error("ephemeris unavailable for all {windows} windows: {last}")]
    EphemerisUnavailable { windows: usize, last: FeedError },
    #[error(transparent)]
    Chart(ChartError),
}

impl From<ChartError> for AdviceError {
    fn from(e: ChartError) -> Self {
        match e {
            ChartError::NotFound(user) => Self::NatalChartNotFound(user),
            other => Self::Chart(other),
        }
    }
}

impl AdviceError {
    /// Message safe to show an end user.
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            Self::NatalChartNotFound(_) => Cow::Borrowed("natal chart not found"),
            Self::InvalidDate(e) => Cow::Owned(e.to_string()),
            Self::InvalidRequest(msg) => Cow::Owned(msg.clone()),
            Self::EphemerisUnavailable { .. } | Self::InvalidConfig(_) | Self::Chart(_) => {
                Cow::Borrowed("computation temporarily unavailable")
            }
        }
    }
}
