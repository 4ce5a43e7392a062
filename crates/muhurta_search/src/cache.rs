//! Cache key for advisory results.
//!
//! A result depends only on the natal chart, the date, the resolved topic
//! and the timezone, so it may be cached on those for [`DEFAULT_CACHE_TTL`].
//! Storage and invalidation (for example when a natal chart changes) are
//! left to the caller.

use std::time::Duration;

use muhurta_chart::NatalChart;
use muhurta_time::UtcTime;

use crate::advisory_types::AdviceRequest;
use crate::error::AdviceError;
use crate::topic::Topic;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdviceKey {
    /// Canonical JSON of the natal chart.
    pub chart: String,
    /// Normalized `YYYY-MM-DD`.
    pub date: String,
    pub topic: Topic,
    pub timezone: Option<String>,
}

impl AdviceKey {
    pub fn new(natal: &NatalChart, request: &AdviceRequest) -> Result<Self, AdviceError> {
        Ok(Self {
            chart: natal.to_canonical_json()?,
            date: UtcTime::parse_date(&request.date)?.date_string(),
            topic: Topic::resolve(&request.topic),
            timezone: request.timezone.clone(),
        })
    }
}
