//! Bodies reported by the ephemeris feed and their per-instant readings.
//!
//! The seven classical bodies are the ones the transit scorer tracks and the
//! only ones with essential dignities. The three outer planets are accepted
//! in charts and feeds but carry no dignity and no topic weight.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::util::normalize_360;

/// A body whose geocentric ecliptic position the feed supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// All bodies in traditional order.
pub const ALL_BODIES: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

/// The 7 classical bodies, tracked by the transit scorer.
pub const CLASSICAL_BODIES: [Body; 7] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
];

impl Body {
    /// English display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
        }
    }

    /// 0-based index into [`ALL_BODIES`].
    pub const fn index(self) -> u8 {
        match self {
            Self::Sun => 0,
            Self::Moon => 1,
            Self::Mercury => 2,
            Self::Venus => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::Uranus => 7,
            Self::Neptune => 8,
            Self::Pluto => 9,
        }
    }

    /// Whether this is one of the seven classical bodies.
    pub const fn is_classical(self) -> bool {
        !matches!(self, Self::Uranus | Self::Neptune | Self::Pluto)
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = ChartError;

    /// Case-insensitive English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_BODIES
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChartError::UnknownBody(s.to_string()))
    }
}

/// Geocentric ecliptic reading of one body at one instant.
///
/// Longitude is always normalized to [0, 360). Retrograde motion is derived
/// from the sign of `speed` and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReading")]
pub struct BodyReading {
    /// Ecliptic longitude in degrees, [0, 360).
    pub longitude: f64,
    /// Ecliptic latitude in degrees.
    pub latitude: f64,
    /// Longitude speed in degrees per day.
    pub speed: f64,
}

#[derive(Deserialize)]
struct RawReading {
    longitude: f64,
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    speed: f64,
}

impl TryFrom<RawReading> for BodyReading {
    type Error = ChartError;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        Self::new(raw.longitude, raw.latitude, raw.speed)
    }
}

impl BodyReading {
    /// Build a reading, normalizing the longitude and rejecting non-finite
    /// values.
    pub fn new(longitude: f64, latitude: f64, speed: f64) -> Result<Self, ChartError> {
        for (field, value) in [
            ("longitude", longitude),
            ("latitude", latitude),
            ("speed", speed),
        ] {
            if !value.is_finite() {
                return Err(ChartError::NonFinite { field, value });
            }
        }
        Ok(Self {
            longitude: normalize_360(longitude),
            latitude,
            speed,
        })
    }

    /// A stationary point at a longitude (natal positions, house cusps).
    pub fn fixed(longitude: f64) -> Result<Self, ChartError> {
        Self::new(longitude, 0.0, 0.0)
    }

    /// Apparent backward motion along the ecliptic.
    pub fn is_retrograde(&self) -> bool {
        self.speed < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_indices_sequential() {
        for (i, b) in ALL_BODIES.iter().enumerate() {
            assert_eq!(b.index() as usize, i);
        }
    }

    #[test]
    fn classical_bodies_are_first_seven() {
        assert_eq!(&ALL_BODIES[..7], &CLASSICAL_BODIES);
        assert!(CLASSICAL_BODIES.iter().all(|b| b.is_classical()));
        assert!(!Body::Pluto.is_classical());
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("mercury".parse::<Body>().unwrap(), Body::Mercury);
        assert_eq!(" SATURN ".parse::<Body>().unwrap(), Body::Saturn);
        assert!("Rahu".parse::<Body>().is_err());
    }

    #[test]
    fn reading_normalizes_longitude() {
        let r = BodyReading::new(-10.0, 1.0, 0.5).unwrap();
        assert!((r.longitude - 350.0).abs() < 1e-12);
        let r = BodyReading::new(725.0, 0.0, 0.0).unwrap();
        assert!((r.longitude - 5.0).abs() < 1e-12);
    }

    #[test]
    fn reading_rejects_nan() {
        assert!(matches!(
            BodyReading::new(f64::NAN, 0.0, 0.0),
            Err(ChartError::NonFinite { field: "longitude", .. })
        ));
        assert!(BodyReading::new(10.0, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn retrograde_from_speed_sign() {
        assert!(BodyReading::new(10.0, 0.0, -0.2).unwrap().is_retrograde());
        assert!(!BodyReading::new(10.0, 0.0, 0.0).unwrap().is_retrograde());
        assert!(!BodyReading::new(10.0, 0.0, 1.2).unwrap().is_retrograde());
    }

    #[test]
    fn reading_deserializes_with_defaults() {
        let r: BodyReading = serde_json::from_str(r#"{"longitude": 370.5}"#).unwrap();
        assert!((r.longitude - 10.5).abs() < 1e-12);
        assert_eq!(r.speed, 0.0);
    }
}
