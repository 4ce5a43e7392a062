//! Request, response and configuration types for the advisory search.

use std::time::Duration;

use muhurta_chart::Sign;
use serde::{Deserialize, Serialize};

use crate::error::AdviceError;
use crate::scorer::{Factor, TransitAspect};
use crate::topic::{Recommendation, Topic};
use crate::verdict::Verdict;

/// Longest accepted `customNote`, in characters.
pub const MAX_CUSTOM_NOTE_CHARS: usize = 512;

/// Minutes in a civil day.
const MINUTES_PER_DAY: u32 = 1440;

/// Parameters of the window scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Windows per day (default 24).
    pub window_count: u32,
    /// Window length in minutes (default 60).
    pub window_minutes: u32,
    /// Windows reported in `bestWindows` (default 5).
    pub top_n: usize,
    /// Score windows on the rayon pool.
    pub parallel: bool,
    /// Time budget for a sequential scan, in milliseconds. When exceeded
    /// after at least one window succeeded, the scan stops early and the
    /// result is marked partial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            window_count: 24,
            window_minutes: 60,
            top_n: 5,
            parallel: false,
            deadline_ms: None,
        }
    }
}

impl SearchConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.window_count == 0 {
            return Err("window_count must be > 0");
        }
        if self.window_minutes == 0 {
            return Err("window_minutes must be > 0");
        }
        if self.window_count.saturating_mul(self.window_minutes) > MINUTES_PER_DAY {
            return Err("window_count * window_minutes must fit in one day");
        }
        if self.top_n == 0 {
            return Err("top_n must be > 0");
        }
        if self.parallel && self.deadline_ms.is_some() {
            return Err("deadline_ms applies to sequential scans only");
        }
        Ok(())
    }
}

/// Advisory request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    /// Civil date, `YYYY-MM-DD`.
    pub date: String,
    /// Topic key; unknown keys fall back to `custom`.
    pub topic: String,
    /// IANA zone name, echoed back. Windows are sampled in UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Free-text note. Length-checked only; it never reaches the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_note: Option<String>,
}

impl AdviceRequest {
    pub fn new(date: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            topic: topic.into(),
            timezone: None,
            custom_note: None,
        }
    }

    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.custom_note = Some(note.into());
        self
    }

    /// Check the note length and the shape of the zone name.
    pub fn validate(&self) -> Result<(), AdviceError> {
        if let Some(note) = &self.custom_note {
            let n = note.chars().count();
            if n > MAX_CUSTOM_NOTE_CHARS {
                return Err(AdviceError::InvalidRequest(format!(
                    "customNote is {n} characters, limit is {MAX_CUSTOM_NOTE_CHARS}"
                )));
            }
        }
        if let Some(tz) = &self.timezone {
            if !is_zone_name(tz) {
                return Err(AdviceError::InvalidRequest(format!(
                    "timezone `{tz}` is not an IANA zone name"
                )));
            }
        }
        Ok(())
    }
}

// Shape only: `Area/Location`, `UTC`, `Etc/GMT+5`. No zone database lookup.
fn is_zone_name(tz: &str) -> bool {
    !tz.is_empty()
        && tz.len() <= 64
        && !tz.starts_with('/')
        && !tz.ends_with('/')
        && tz
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+'))
}

/// A scored time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredWindow {
    #[serde(rename = "startISO")]
    pub start_iso: String,
    #[serde(rename = "endISO")]
    pub end_iso: String,
    pub score: u8,
}

/// A topic house with the natal sign on its cusp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseRelevance {
    pub house: u8,
    pub sign: Sign,
    pub relevance: String,
}

/// Advisory response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResult {
    pub verdict: Verdict,
    pub color: String,
    pub score: u8,
    pub factors: Vec<Factor>,
    pub aspects: Vec<TransitAspect>,
    pub houses: Vec<HouseRelevance>,
    pub best_windows: Vec<ScoredWindow>,
    pub explanation: String,
    pub recommendations: Vec<Recommendation>,
    pub generated_by: String,
    pub evaluated_at: String,
    pub date: String,
    pub topic: Topic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub topic_description: String,
    /// Set when a deadline cut the scan short.
    #[serde(skip_serializing_if = "is_false")]
    pub partial: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl AdviceResult {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
