//! Zodiac sign and DMS (degrees-minutes-seconds) classification.
//!
//! The tropical ecliptic is divided into 12 equal signs of 30 degrees,
//! starting from Aries at 0 degrees.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::util::normalize_360;

/// The 12 tropical signs starting from Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in order (0 = Aries, 11 = Pisces).
pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    /// English name of the sign.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// 0-based index (Aries=0 .. Pisces=11).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Sign by 0-based index; `None` if index >= 12.
    pub fn from_index(index: u8) -> Option<Self> {
        ALL_SIGNS.get(index as usize).copied()
    }

    /// The sign 180 degrees away.
    pub const fn opposite(self) -> Self {
        ALL_SIGNS[((self as u8 + 6) % 12) as usize]
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sign {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_SIGNS
            .into_iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChartError::UnknownSign(s.to_string()))
    }
}

/// Degrees-minutes-seconds representation of an angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dms {
    /// Whole degrees (0..29 within a sign, or 0..359 standalone).
    pub degrees: u16,
    /// Arc-minutes (0..59).
    pub minutes: u8,
    /// Arc-seconds (0.0..60.0), may include fractional part.
    pub seconds: f64,
}

/// Full sign position of a longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPosition {
    pub sign: Sign,
    /// 0-based sign index (0 = Aries).
    pub sign_index: u8,
    /// Position within the sign as DMS.
    pub dms: Dms,
    /// Decimal degrees within the sign, [0.0, 30.0).
    pub degrees_in_sign: f64,
}

/// Convert DMS back to decimal degrees.
pub fn dms_to_deg(dms: &Dms) -> f64 {
    dms.degrees as f64 + dms.minutes as f64 / 60.0 + dms.seconds / 3600.0
}

/// Convert decimal degrees to degrees-minutes-seconds.
///
/// Handles negative input by taking absolute value.
pub fn deg_to_dms(deg: f64) -> Dms {
    let d = deg.abs();
    let total_degrees = d.floor() as u16;
    let remainder = (d - total_degrees as f64) * 60.0;
    let minutes = remainder.floor() as u8;
    let seconds = (remainder - minutes as f64) * 60.0;
    Dms {
        degrees: total_degrees,
        minutes,
        seconds,
    }
}

/// Sign and in-sign position of an ecliptic longitude.
///
/// `sign_index = floor(normalized / 30)`, so Aries = [0, 30),
/// Taurus = [30, 60), and so on.
pub fn sign_from_longitude(longitude_deg: f64) -> SignPosition {
    let lon = normalize_360(longitude_deg);
    let sign_index = ((lon / 30.0).floor() as u8).min(11);
    let degrees_in_sign = lon - (sign_index as f64) * 30.0;
    SignPosition {
        sign: ALL_SIGNS[sign_index as usize],
        sign_index,
        dms: deg_to_dms(degrees_in_sign),
        degrees_in_sign,
    }
}
