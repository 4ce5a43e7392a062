//! Angular aspect detection with orb tolerance.
//!
//! Two longitudes are compared by their shortest angular separation in
//! [0, 180]. Each aspect type has an exact angle and a maximum orb; a pair
//! is in aspect when `|separation - exact| <= max_orb`. At most one aspect is
//! reported per pair: with overlapping (reconfigured) orb ranges the smallest
//! orb wins, and on an exact tie the earlier table entry wins.
//!
//! Applying vs separating is decided by projecting both points one day
//! forward with their own speeds and re-measuring the orb against the same
//! exact angle.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyReading};
use crate::error::ChartError;
use crate::util::normalize_360;

/// Slack on the orb comparison so decimal inputs landing exactly on
/// `exact ± max_orb` are included despite binary rounding.
const ORB_EPSILON_DEG: f64 = 1e-9;

/// The five major (Ptolemaic) aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

/// All aspect kinds in ascending exact angle.
pub const ALL_ASPECT_KINDS: [AspectKind; 5] = [
    AspectKind::Conjunction,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Opposition,
];

impl AspectKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    /// Exact angle in degrees.
    pub const fn exact_angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    /// Default maximum orb in degrees.
    pub const fn default_max_orb(self) -> f64 {
        match self {
            Self::Sextile => 6.0,
            Self::Conjunction | Self::Square | Self::Trine | Self::Opposition => 8.0,
        }
    }
}

impl Display for AspectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of an orb table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectSpec {
    pub kind: AspectKind,
    /// Exact angle in degrees, [0, 180].
    pub exact_angle: f64,
    /// Maximum orb in degrees, > 0.
    pub max_orb: f64,
}

impl AspectSpec {
    pub const fn standard(kind: AspectKind) -> Self {
        Self {
            kind,
            exact_angle: kind.exact_angle(),
            max_orb: kind.default_max_orb(),
        }
    }
}

/// Default orb table: conjunction 8°, sextile 6°, square 8°, trine 8°,
/// opposition 8°. The ranges are disjoint.
pub const DEFAULT_ASPECTS: [AspectSpec; 5] = [
    AspectSpec::standard(AspectKind::Conjunction),
    AspectSpec::standard(AspectKind::Sextile),
    AspectSpec::standard(AspectKind::Square),
    AspectSpec::standard(AspectKind::Trine),
    AspectSpec::standard(AspectKind::Opposition),
];

/// Direction of an aspect one day ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectMotion {
    /// The orb shrinks over the next day.
    Applying,
    /// The orb grows or stays put. Also the outcome when neither point moves.
    Separating,
}

/// A longitude with an optional daily speed. `None` (or a non-finite
/// speed) means the point does not move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingPoint {
    pub longitude: f64,
    pub speed: Option<f64>,
}

impl MovingPoint {
    pub fn moving(longitude: f64, speed: f64) -> Self {
        Self {
            longitude,
            speed: Some(speed),
        }
    }

    pub fn fixed(longitude: f64) -> Self {
        Self {
            longitude,
            speed: None,
        }
    }

    fn one_day_later(&self) -> f64 {
        let speed = self.speed.filter(|s| s.is_finite()).unwrap_or(0.0);
        self.longitude + speed
    }
}

impl From<&BodyReading> for MovingPoint {
    fn from(r: &BodyReading) -> Self {
        Self::moving(r.longitude, r.speed)
    }
}

/// An aspect found between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectMatch {
    pub kind: AspectKind,
    /// Shortest angular separation, [0, 180].
    pub separation: f64,
    /// `|separation - exact_angle|`.
    pub orb: f64,
    /// Max orb of the matching table row.
    pub max_orb: f64,
    /// `1 - orb / max_orb`, clamped to [0, 1].
    pub strength: f64,
    pub motion: AspectMotion,
}

/// An aspect between two named bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspect {
    pub body_a: Body,
    pub body_b: Body,
    #[serde(flatten)]
    pub detail: AspectMatch,
}

/// Validated orb table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectTable {
    specs: Vec<AspectSpec>,
}

impl Default for AspectTable {
    fn default() -> Self {
        Self {
            specs: DEFAULT_ASPECTS.to_vec(),
        }
    }
}

impl AspectTable {
    /// Build a table from custom rows.
    ///
    /// Each exact angle must lie in [0, 180] and each max orb must be
    /// finite and positive. Kinds may repeat; overlaps are allowed.
    pub fn new(specs: Vec<AspectSpec>) -> Result<Self, ChartError> {
        if specs.is_empty() {
            return Err(ChartError::InvalidAspectTable("table is empty".into()));
        }
        for spec in &specs {
            if !spec.exact_angle.is_finite() || !(0.0..=180.0).contains(&spec.exact_angle) {
                return Err(ChartError::InvalidAspectTable(format!(
                    "{}: exact angle {} outside [0, 180]",
                    spec.kind, spec.exact_angle
                )));
            }
            if !spec.max_orb.is_finite() || spec.max_orb <= 0.0 {
                return Err(ChartError::InvalidAspectTable(format!(
                    "{}: max orb must be positive, got {}",
                    spec.kind, spec.max_orb
                )));
            }
        }
        Ok(Self { specs })
    }

    pub fn specs(&self) -> &[AspectSpec] {
        &self.specs
    }

    /// Row for a kind (first if repeated).
    pub fn spec(&self, kind: AspectKind) -> Option<&AspectSpec> {
        self.specs.iter().find(|s| s.kind == kind)
    }

    /// Best-matching row for a separation, with its orb.
    pub fn classify(&self, separation: f64) -> Option<(AspectSpec, f64)> {
        let mut best: Option<(AspectSpec, f64)> = None;
        for spec in &self.specs {
            let orb = (separation - spec.exact_angle).abs();
            if orb > spec.max_orb + ORB_EPSILON_DEG {
                continue;
            }
            if best.is_none_or(|(_, best_orb)| orb < best_orb) {
                best = Some((*spec, orb));
            }
        }
        best
    }

    /// Aspect between two points, if any.
    pub fn find(&self, a: MovingPoint, b: MovingPoint) -> Option<AspectMatch> {
        if !a.longitude.is_finite() || !b.longitude.is_finite() {
            return None;
        }
        let separation = angular_separation(a.longitude, b.longitude);
        let (spec, orb) = self.classify(separation)?;

        let next_separation = angular_separation(a.one_day_later(), b.one_day_later());
        let next_orb = (next_separation - spec.exact_angle).abs();
        let motion = if next_orb < orb {
            AspectMotion::Applying
        } else {
            AspectMotion::Separating
        };

        Some(AspectMatch {
            kind: spec.kind,
            separation,
            orb,
            max_orb: spec.max_orb,
            strength: (1.0 - orb / spec.max_orb).clamp(0.0, 1.0),
            motion,
        })
    }

    /// Aspect between two named bodies.
    pub fn between(
        &self,
        body_a: Body,
        a: MovingPoint,
        body_b: Body,
        b: MovingPoint,
    ) -> Option<Aspect> {
        self.find(a, b).map(|detail| Aspect {
            body_a,
            body_b,
            detail,
        })
    }
}

/// Shortest angular distance between two longitudes, in [0, 180].
///
/// `min(|a - b| mod 360, 360 - |a - b| mod 360)`.
pub fn angular_separation(a_deg: f64, b_deg: f64) -> f64 {
    let d = normalize_360((normalize_360(a_deg) - normalize_360(b_deg)).abs());
    d.min(360.0 - d)
}

/// Aspect between two points using the default orb table.
pub fn find_aspect(a: MovingPoint, b: MovingPoint) -> Option<AspectMatch> {
    AspectTable::default().find(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn separation_basic() {
        assert!((angular_separation(10.0, 70.0) - 60.0).abs() < EPS);
        assert!((angular_separation(70.0, 10.0) - 60.0).abs() < EPS);
    }

    #[test]
    fn separation_across_zero() {
        assert!((angular_separation(355.0, 5.0) - 10.0).abs() < EPS);
        assert!((angular_separation(5.0, 355.0) - 10.0).abs() < EPS);
    }

    #[test]
    fn separation_at_most_180() {
        assert!((angular_separation(0.0, 180.0) - 180.0).abs() < EPS);
        assert!((angular_separation(10.0, 200.0) - 170.0).abs() < EPS);
        assert!((angular_separation(-90.0, 450.0) - 180.0).abs() < EPS);
    }

    #[test]
    fn exact_trine() {
        let m = find_aspect(MovingPoint::fixed(80.0), MovingPoint::fixed(200.0)).unwrap();
        assert_eq!(m.kind, AspectKind::Trine);
        assert!(m.orb.abs() < EPS);
        assert!((m.strength - 1.0).abs() < EPS);
    }

    #[test]
    fn no_aspect_in_gap() {
        // 30° apart: outside conjunction (8) and sextile (54..66).
        assert!(find_aspect(MovingPoint::fixed(0.0), MovingPoint::fixed(30.0)).is_none());
        // 150° apart: between trine (128) and opposition (172).
        assert!(find_aspect(MovingPoint::fixed(0.0), MovingPoint::fixed(150.0)).is_none());
    }

    #[test]
    fn strength_scales_with_orb() {
        let m = find_aspect(MovingPoint::fixed(0.0), MovingPoint::fixed(94.0)).unwrap();
        assert_eq!(m.kind, AspectKind::Square);
        assert!((m.orb - 4.0).abs() < EPS);
        assert!((m.strength - 0.5).abs() < EPS);
    }

    #[test]
    fn applying_when_orb_shrinks() {
        // Transit at 85 moving +1/day toward exact square with a fixed point at 0.
        let m = find_aspect(MovingPoint::moving(85.0, 1.0), MovingPoint::fixed(0.0)).unwrap();
        assert_eq!(m.kind, AspectKind::Square);
        assert_eq!(m.motion, AspectMotion::Applying);
    }

    #[test]
    fn separating_when_orb_grows() {
        let m = find_aspect(MovingPoint::moving(95.0, 1.0), MovingPoint::fixed(0.0)).unwrap();
        assert_eq!(m.motion, AspectMotion::Separating);
    }

    #[test]
    fn retrograde_can_apply() {
        let m = find_aspect(MovingPoint::moving(95.0, -0.5), MovingPoint::fixed(0.0)).unwrap();
        assert_eq!(m.motion, AspectMotion::Applying);
    }

    #[test]
    fn non_moving_defaults_to_separating() {
        let m = find_aspect(MovingPoint::fixed(85.0), MovingPoint::fixed(0.0)).unwrap();
        assert_eq!(m.motion, AspectMotion::Separating);
        let m = find_aspect(MovingPoint::moving(85.0, 0.0), MovingPoint::moving(0.0, 0.0))
            .unwrap();
        assert_eq!(m.motion, AspectMotion::Separating);
        let m = find_aspect(MovingPoint::moving(85.0, f64::NAN), MovingPoint::fixed(0.0)).unwrap();
        assert_eq!(m.motion, AspectMotion::Separating);
    }

    #[test]
    fn overlapping_table_prefers_smaller_orb() {
        let table = AspectTable::new(vec![
            AspectSpec {
                kind: AspectKind::Conjunction,
                exact_angle: 0.0,
                max_orb: 40.0,
            },
            AspectSpec {
                kind: AspectKind::Sextile,
                exact_angle: 60.0,
                max_orb: 40.0,
            },
        ])
        .unwrap();
        let m = table.find(MovingPoint::fixed(0.0), MovingPoint::fixed(35.0)).unwrap();
        assert_eq!(m.kind, AspectKind::Sextile);
        let m = table.find(MovingPoint::fixed(0.0), MovingPoint::fixed(25.0)).unwrap();
        assert_eq!(m.kind, AspectKind::Conjunction);
        // Exact tie at 30°: earlier row wins.
        let m = table.find(MovingPoint::fixed(0.0), MovingPoint::fixed(30.0)).unwrap();
        assert_eq!(m.kind, AspectKind::Conjunction);
    }

    #[test]
    fn invalid_tables_rejected() {
        assert!(AspectTable::new(vec![]).is_err());
        let bad_orb = AspectSpec {
            kind: AspectKind::Trine,
            exact_angle: 120.0,
            max_orb: 0.0,
        };
        assert!(AspectTable::new(vec![bad_orb]).is_err());
        let bad_angle = AspectSpec {
            kind: AspectKind::Trine,
            exact_angle: 200.0,
            max_orb: 8.0,
        };
        assert!(AspectTable::new(vec![bad_angle]).is_err());
    }

    #[test]
    fn between_keeps_body_order() {
        let a = AspectTable::default()
            .between(
                Body::Mercury,
                MovingPoint::moving(200.0, 1.2),
                Body::Mercury,
                MovingPoint::fixed(80.0),
            )
            .unwrap();
        assert_eq!(a.body_a, Body::Mercury);
        assert_eq!(a.detail.kind, AspectKind::Trine);
    }

    #[test]
    fn non_finite_longitude_has_no_aspect() {
        assert!(find_aspect(MovingPoint::fixed(f64::NAN), MovingPoint::fixed(0.0)).is_none());
    }
}
