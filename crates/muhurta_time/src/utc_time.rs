//! UTC calendar date/time with sub-second precision.
//!
//! `UtcTime` is the civil instant used throughout the engine. Conversion to
//! and from Julian Day validates the calendar fields and never clamps.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeError;
use crate::julian::{
    MAX_YEAR, MIN_YEAR, MS_PER_DAY, calendar_to_jd, days_in_month, jd_to_calendar,
};

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Midnight (00:00:00 UTC) of a civil date.
    pub fn midnight(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, month, day, 0, 0, 0.0)
    }

    /// Check every calendar field against the Gregorian calendar and the
    /// supported year span.
    pub fn validate(&self) -> Result<(), TimeError> {
        let reject = |reason| Err(TimeError::invalid_date(self.to_string(), reason));
        if !(MIN_YEAR..MAX_YEAR).contains(&self.year) {
            return reject("year outside supported range [1583, 4000)");
        }
        if !(1..=12).contains(&self.month) {
            return reject("month must be 1-12");
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return reject("day does not exist in month");
        }
        if self.hour > 23 {
            return reject("hour must be 0-23");
        }
        if self.minute > 59 {
            return reject("minute must be 0-59");
        }
        if !self.second.is_finite() || !(0.0..60.0).contains(&self.second) {
            return reject("second must be in [0, 60)");
        }
        Ok(())
    }

    /// Julian Day of this instant.
    pub fn to_jd(&self) -> Result<f64, TimeError> {
        self.validate()?;
        let day_frac = self.day as f64
            + self.hour as f64 / 24.0
            + self.minute as f64 / 1440.0
            + self.second / 86_400.0;
        Ok(calendar_to_jd(self.year, self.month, day_frac))
    }

    /// Civil instant of a Julian Day, rounded to the millisecond.
    pub fn from_jd(jd: f64) -> Result<Self, TimeError> {
        if !jd.is_finite() {
            return Err(TimeError::invalid_date(
                jd.to_string(),
                "Julian Day is not finite",
            ));
        }
        let lo = calendar_to_jd(MIN_YEAR, 1, 1.0);
        let hi = calendar_to_jd(MAX_YEAR, 1, 1.0);
        if jd < lo || jd >= hi {
            return Err(TimeError::invalid_date(
                jd.to_string(),
                "Julian Day outside supported range [1583, 4000)",
            ));
        }

        // Split at civil midnight so the day number stays integral.
        let shifted = jd + 0.5;
        let mut day_number = shifted.floor();
        let mut ms_of_day = ((shifted - day_number) * MS_PER_DAY).round();
        if ms_of_day >= MS_PER_DAY {
            day_number += 1.0;
            ms_of_day = 0.0;
        }
        let (year, month, day) = jd_to_calendar(day_number - 0.5);
        if year >= MAX_YEAR {
            return Err(TimeError::invalid_date(
                jd.to_string(),
                "Julian Day outside supported range [1583, 4000)",
            ));
        }

        let ms = ms_of_day as u64;
        Ok(Self {
            year,
            month,
            day: day.round() as u32,
            hour: (ms / 3_600_000) as u32,
            minute: ((ms % 3_600_000) / 60_000) as u32,
            second: (ms % 60_000) as f64 / 1000.0,
        })
    }

    /// Parse a civil date in strict `YYYY-MM-DD` form as midnight UTC.
    pub fn parse_date(s: &str) -> Result<Self, TimeError> {
        let trimmed = s.trim();
        if trimmed.len() != 10 {
            return Err(TimeError::invalid_date(s, "expected YYYY-MM-DD"));
        }
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|_| TimeError::invalid_date(s, "expected YYYY-MM-DD"))?;
        let t = Self::midnight(date.year(), date.month(), date.day());
        t.validate()?;
        Ok(t)
    }

    /// Convert to a chrono timestamp (millisecond precision).
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, TimeError> {
        self.validate()?;
        let (whole, millis) = split_millis(self.second);
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_milli_opt(self.hour, self.minute, whole, millis))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| TimeError::invalid_date(self.to_string(), "not representable"))
    }

    /// ISO-8601 with millisecond precision, e.g. `2024-03-20T05:00:00.000Z`.
    pub fn to_iso_millis(&self) -> String {
        let (whole, millis) = split_millis(self.second);
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            self.year, self.month, self.day, self.hour, self.minute, whole, millis
        )
    }

    /// Calendar date part as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Split seconds into whole seconds and milliseconds, never producing 60.
fn split_millis(second: f64) -> (u32, u32) {
    let total = (second.max(0.0) * 1000.0).round() as u32;
    let total = total.min(59_999);
    (total / 1000, total % 1000)
}

/// Julian Day of a UTC instant. Fails with `InvalidDate`, never clamps.
pub fn utc_to_jd(t: &UtcTime) -> Result<f64, TimeError> {
    t.to_jd()
}

/// UTC instant of a Julian Day.
pub fn jd_to_utc(jd: f64) -> Result<UtcTime, TimeError> {
    UtcTime::from_jd(jd)
}

impl From<DateTime<Utc>> for UtcTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second() as f64 + (dt.nanosecond() % 1_000_000_000) as f64 / 1e9,
        }
    }
}

impl FromStr for UtcTime {
    type Err = TimeError;

    /// Accepts RFC 3339 timestamps (`2024-03-20T12:00:00Z`, offsets are
    /// normalized to UTC) or a bare `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 10 {
            return Self::parse_date(trimmed);
        }
        let dt = DateTime::parse_from_rfc3339(trimmed)
            .map_err(|_| TimeError::invalid_date(s, "expected RFC 3339 timestamp"))?;
        let t = Self::from(dt.with_timezone(&Utc));
        t.validate()?;
        Ok(t)
    }
}

impl Display for UtcTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let whole = self.second as u32;
        let frac = self.second - whole as f64;
        if frac.abs() < 1e-9 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:06.3}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian::J2000_JD;

    #[test]
    fn j2000_epoch() {
        let jd = UtcTime::new(2000, 1, 1, 12, 0, 0.0).to_jd().unwrap();
        assert!((jd - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn from_jd_j2000() {
        let t = UtcTime::from_jd(J2000_JD).unwrap();
        assert_eq!(t, UtcTime::new(2000, 1, 1, 12, 0, 0.0));
    }

    #[test]
    fn from_jd_rounds_carry_into_next_day() {
        // 0.2 ms before midnight rounds up to 00:00:00.000 of the next day.
        let jd = UtcTime::midnight(2024, 3, 21).to_jd().unwrap() - 0.000_2 / 86_400.0;
        let t = UtcTime::from_jd(jd).unwrap();
        assert_eq!(t, UtcTime::midnight(2024, 3, 21));
    }

    #[test]
    fn month_out_of_range_rejected() {
        let err = UtcTime::new(2024, 13, 1, 0, 0, 0.0).to_jd().unwrap_err();
        assert!(matches!(err, TimeError::InvalidDate { .. }));
    }

    #[test]
    fn nonexistent_day_rejected() {
        assert!(UtcTime::new(2023, 2, 29, 0, 0, 0.0).to_jd().is_err());
        assert!(UtcTime::new(2024, 2, 29, 0, 0, 0.0).to_jd().is_ok());
        assert!(UtcTime::new(2024, 4, 31, 0, 0, 0.0).to_jd().is_err());
    }

    #[test]
    fn time_fields_rejected_not_clamped() {
        assert!(UtcTime::new(2024, 1, 1, 24, 0, 0.0).to_jd().is_err());
        assert!(UtcTime::new(2024, 1, 1, 0, 60, 0.0).to_jd().is_err());
        assert!(UtcTime::new(2024, 1, 1, 0, 0, 60.0).to_jd().is_err());
        assert!(UtcTime::new(2024, 1, 1, 0, 0, f64::NAN).to_jd().is_err());
    }

    #[test]
    fn year_span_enforced() {
        assert!(UtcTime::midnight(1582, 12, 31).to_jd().is_err());
        assert!(UtcTime::midnight(1583, 1, 1).to_jd().is_ok());
        assert!(UtcTime::midnight(4000, 1, 1).to_jd().is_err());
        assert!(UtcTime::from_jd(f64::INFINITY).is_err());
        assert!(UtcTime::from_jd(0.0).is_err());
    }

    #[test]
    fn parse_date_strict() {
        assert_eq!(
            UtcTime::parse_date("2024-03-20").unwrap(),
            UtcTime::midnight(2024, 3, 20)
        );
        assert!(UtcTime::parse_date("2024-3-20").is_err());
        assert!(UtcTime::parse_date("2024-02-30").is_err());
        assert!(UtcTime::parse_date("20-03-2024").is_err());
        assert!(UtcTime::parse_date("").is_err());
    }

    #[test]
    fn from_str_rfc3339_normalizes_offset() {
        let t: UtcTime = "2024-03-20T17:30:00+05:30".parse().unwrap();
        assert_eq!(t, UtcTime::new(2024, 3, 20, 12, 0, 0.0));
    }

    #[test]
    fn iso_millis_format() {
        let t = UtcTime::new(2024, 3, 20, 5, 0, 0.0);
        assert_eq!(t.to_iso_millis(), "2024-03-20T05:00:00.000Z");
        let t = UtcTime::new(2024, 3, 20, 5, 7, 9.25);
        assert_eq!(t.to_iso_millis(), "2024-03-20T05:07:09.250Z");
    }

    #[test]
    fn datetime_roundtrip() {
        let t = UtcTime::new(2024, 3, 20, 5, 7, 9.25);
        let dt = t.to_datetime().unwrap();
        assert_eq!(UtcTime::from(dt), t);
    }

    #[test]
    fn display_whole_seconds() {
        let t = UtcTime::new(2024, 1, 15, 0, 0, 0.0);
        assert_eq!(t.to_string(), "2024-01-15T00:00:00Z");
    }
}
