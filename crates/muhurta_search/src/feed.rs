//! Ephemeris feed: the upstream source of transiting positions.
//!
//! The engine never computes orbits itself. It asks an [`EphemerisFeed`]
//! for geocentric ecliptic readings at a Julian Date (UT). Two feeds ship
//! here: [`TabulatedFeed`], which interpolates a JSON sample table, and
//! [`LinearMotionFeed`], which advances fixed epoch readings at constant
//! speed (tests and benches).

use std::collections::BTreeMap;
use std::path::Path;

use muhurta_chart::{Body, BodyReading, CLASSICAL_BODIES, normalize_360, normalize_to_pm180};
use serde::Deserialize;

use crate::error::FeedError;

/// Readings for one instant, keyed by body.
pub type BodyPositions = BTreeMap<Body, BodyReading>;

/// Source of transiting positions.
pub trait EphemerisFeed: Send + Sync {
    /// Readings at `jd` (UT). Must cover the seven classical bodies.
    fn positions_at(&self, jd: f64) -> Result<BodyPositions, FeedError>;
}

impl<F> EphemerisFeed for F
where
    F: Fn(f64) -> Result<BodyPositions, FeedError> + Send + Sync,
{
    fn positions_at(&self, jd: f64) -> Result<BodyPositions, FeedError> {
        self(jd)
    }
}

/// Check that every classical body is present.
pub fn require_classical(positions: &BodyPositions, jd: f64) -> Result<(), FeedError> {
    match CLASSICAL_BODIES.iter().find(|b| !positions.contains_key(b)) {
        Some(&body) => Err(FeedError::Incomplete { jd, body }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Sample {
    jd: f64,
    bodies: BodyPositions,
}

/// Feed backed by a table of samples, linearly interpolated.
///
/// JSON shape: `[{"jd": 2460390.5, "bodies": {"sun": {"longitude": 0.1,
/// "latitude": 0.0, "speed": 0.99}, ...}}, ...]`. Longitudes blend along
/// the shortest arc so a 359° → 1° step passes through 0°. Instants outside
/// `[first.jd, last.jd]` are unavailable.
#[derive(Debug, Clone)]
pub struct TabulatedFeed {
    samples: Vec<Sample>,
}

impl TabulatedFeed {
    pub fn from_json(s: &str) -> Result<Self, FeedError> {
        let samples: Vec<Sample> = serde_json::from_str(s)?;
        Self::from_samples(samples)
    }

    pub fn load(path: &Path) -> Result<Self, FeedError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn from_samples(mut samples: Vec<Sample>) -> Result<Self, FeedError> {
        if samples.is_empty() {
            return Err(FeedError::InvalidTable("no samples".into()));
        }
        if let Some(bad) = samples.iter().find(|s| !s.jd.is_finite()) {
            return Err(FeedError::InvalidTable(format!("non-finite jd {}", bad.jd)));
        }
        samples.sort_by(|a, b| a.jd.total_cmp(&b.jd));
        if let Some(w) = samples.windows(2).find(|w| w[0].jd == w[1].jd) {
            return Err(FeedError::InvalidTable(format!("duplicate jd {}", w[0].jd)));
        }
        Ok(Self { samples })
    }

    /// Covered range `(first_jd, last_jd)`.
    pub fn range(&self) -> (f64, f64) {
        let first = self.samples.first().map_or(f64::NAN, |s| s.jd);
        let last = self.samples.last().map_or(f64::NAN, |s| s.jd);
        (first, last)
    }
}

impl EphemerisFeed for TabulatedFeed {
    fn positions_at(&self, jd: f64) -> Result<BodyPositions, FeedError> {
        let (first, last) = self.range();
        if !jd.is_finite() || jd < first || jd > last {
            return Err(FeedError::Unavailable {
                jd,
                reason: format!("outside table range [{first}, {last}]"),
            });
        }

        // First sample with sample.jd > jd; jd lies in [idx-1, idx).
        let idx = self.samples.partition_point(|s| s.jd <= jd);
        let lo = &self.samples[idx - 1];
        let Some(hi) = self.samples.get(idx) else {
            return Ok(lo.bodies.clone());
        };
        if lo.jd == jd {
            return Ok(lo.bodies.clone());
        }

        let frac = (jd - lo.jd) / (hi.jd - lo.jd);
        let mut out = BodyPositions::new();
        for (body, a) in &lo.bodies {
            let Some(b) = hi.bodies.get(body) else {
                continue;
            };
            let lon = normalize_360(a.longitude + normalize_to_pm180(b.longitude - a.longitude) * frac);
            let lat = a.latitude + (b.latitude - a.latitude) * frac;
            let speed = a.speed + (b.speed - a.speed) * frac;
            out.insert(*body, BodyReading::new(lon, lat, speed)?);
        }
        Ok(out)
    }
}

/// Feed that moves each body at a constant daily speed from an epoch.
#[derive(Debug, Clone)]
pub struct LinearMotionFeed {
    epoch_jd: f64,
    epoch: BodyPositions,
}

impl LinearMotionFeed {
    pub fn new(epoch_jd: f64, epoch: BodyPositions) -> Self {
        Self { epoch_jd, epoch }
    }

    /// Every classical body at `longitude` with `speed`, for quick fixtures.
    pub fn uniform(epoch_jd: f64, longitude: f64, speed: f64) -> Result<Self, FeedError> {
        let mut epoch = BodyPositions::new();
        for body in CLASSICAL_BODIES {
            epoch.insert(body, BodyReading::new(longitude, 0.0, speed)?);
        }
        Ok(Self::new(epoch_jd, epoch))
    }

    /// Replace one body's epoch reading.
    pub fn with(mut self, body: Body, reading: BodyReading) -> Self {
        self.epoch.insert(body, reading);
        self
    }
}

impl EphemerisFeed for LinearMotionFeed {
    fn positions_at(&self, jd: f64) -> Result<BodyPositions, FeedError> {
        if !jd.is_finite() {
            return Err(FeedError::Unavailable {
                jd,
                reason: "non-finite instant".into(),
            });
        }
        let dt = jd - self.epoch_jd;
        let mut out = BodyPositions::new();
        for (body, r) in &self.epoch {
            out.insert(
                *body,
                BodyReading::new(r.longitude + r.speed * dt, r.latitude, r.speed)?,
            );
        }
        Ok(out)
    }
}
