//! Error types for chart classification.

use thiserror::Error;

use crate::body::Body;

/// Errors from chart construction and lookups.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// A longitude, latitude or speed is NaN or infinite.
    #[error("non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },
    /// House cusp table does not partition the circle into 12 arcs.
    #[error("invalid house cusps: {0}")]
    InvalidHouseCusps(String),
    /// Aspect orb table failed validation.
    #[error("invalid aspect table: {0}")]
    InvalidAspectTable(String),
    /// A tracked body is absent from the natal chart.
    #[error("natal chart has no reading for {0}")]
    MissingNatalData(Body),
    /// The natal chart carries no house cusps.
    #[error("natal chart has no house cusps")]
    MissingHouses,
    /// Body name not recognized.
    #[error("unknown body `{0}`")]
    UnknownBody(String),
    /// Sign name not recognized.
    #[error("unknown sign `{0}`")]
    UnknownSign(String),
    /// No natal chart stored for the user.
    #[error("natal chart not found for `{0}`")]
    NotFound(String),
    /// Chart JSON could not be decoded.
    #[error("chart JSON: {0}")]
    Json(#[from] serde_json::Error),
}
