//! Civil time and sidereal time for the transit engine.
//!
//! This crate provides:
//! - Gregorian calendar ↔ Julian Day conversion with strict validation
//! - `UtcTime`, the civil instant type used by every other crate
//! - Greenwich mean and local sidereal time

pub mod error;
pub mod julian;
pub mod sidereal;
pub mod utc_time;

pub use error::TimeError;
pub use julian::{
    J2000_JD, MAX_YEAR, MIN_YEAR, SECONDS_PER_DAY, calendar_to_jd, days_in_month, is_leap_year,
    jd_to_calendar,
};
pub use sidereal::{gmst_deg, local_sidereal_time_deg};
pub use utc_time::{UtcTime, jd_to_utc, utc_to_jd};
