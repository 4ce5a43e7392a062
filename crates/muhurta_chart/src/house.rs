//! House (cusp table) assignment.
//!
//! A cusp table holds 12 ecliptic longitudes; house *n* spans from cusp *n*
//! up to (not including) cusp *n+1*, with house 12 closing back to cusp 1.
//! One arc may straddle 0°/360°.

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::sign::{Sign, sign_from_longitude};
use crate::util::normalize_360;

/// Tolerance when checking that the 12 arcs add up to one full turn.
const FULL_TURN_TOLERANCE_DEG: f64 = 1e-6;

/// Validated 12-cusp table covering the circle exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct HouseCusps {
    cusps: [f64; 12],
}

impl HouseCusps {
    /// Build from 12 cusp longitudes (house 1 first).
    ///
    /// Every cusp must be finite and every arc non-empty, and walking the
    /// cusps in order must complete exactly one turn.
    pub fn new(cusps: [f64; 12]) -> Result<Self, ChartError> {
        if let Some(bad) = cusps.iter().find(|c| !c.is_finite()) {
            return Err(ChartError::InvalidHouseCusps(format!(
                "non-finite cusp {bad}"
            )));
        }
        let cusps = cusps.map(normalize_360);
        let mut total = 0.0;
        for i in 0..12 {
            let arc = arc_length(cusps[i], cusps[(i + 1) % 12]);
            if arc <= 0.0 {
                return Err(ChartError::InvalidHouseCusps(format!(
                    "house {} has an empty arc",
                    i + 1
                )));
            }
            total += arc;
        }
        if (total - 360.0).abs() > FULL_TURN_TOLERANCE_DEG {
            return Err(ChartError::InvalidHouseCusps(format!(
                "cusps span {total:.6} degrees, expected one full turn"
            )));
        }
        Ok(Self { cusps })
    }

    /// Equal houses of 30 degrees starting at `start_deg`.
    pub fn equal(start_deg: f64) -> Result<Self, ChartError> {
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = start_deg + i as f64 * 30.0;
        }
        Self::new(cusps)
    }

    /// Cusp longitudes, house 1 first.
    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    /// Cusp longitude of a house (1-12).
    pub fn cusp(&self, house: u8) -> Option<f64> {
        if (1..=12).contains(&house) {
            Some(self.cusps[house as usize - 1])
        } else {
            None
        }
    }

    /// Sign on the cusp of a house (1-12).
    pub fn cusp_sign(&self, house: u8) -> Option<Sign> {
        self.cusp(house).map(|c| sign_from_longitude(c).sign)
    }

    /// House (1-12) containing a longitude.
    pub fn house_of(&self, longitude_deg: f64) -> u8 {
        house_of_longitude(longitude_deg, &self.cusps)
    }
}

impl TryFrom<Vec<f64>> for HouseCusps {
    type Error = ChartError;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        let cusps: [f64; 12] = v.try_into().map_err(|v: Vec<f64>| {
            ChartError::InvalidHouseCusps(format!("expected 12 cusps, got {}", v.len()))
        })?;
        Self::new(cusps)
    }
}

impl From<HouseCusps> for Vec<f64> {
    fn from(h: HouseCusps) -> Self {
        h.cusps.to_vec()
    }
}

/// Forward arc from `start` to `end`, in [0, 360).
fn arc_length(start: f64, end: f64) -> f64 {
    normalize_360(end - start)
}

/// House number (1-12) of a longitude for a raw cusp table.
///
/// For house *i*, with `start = cusp[i]` and `end = cusp[i+1 mod 12]`:
/// if `start <= end` the house is `[start, end)`; otherwise the arc wraps
/// and matches `lon >= start || lon < end`. The first match wins. A table
/// that is not exactly 12 entries long, or matches nothing, yields house 1.
pub fn house_of_longitude(longitude_deg: f64, cusps: &[f64]) -> u8 {
    if cusps.len() != 12 {
        return 1;
    }
    let lon = normalize_360(longitude_deg);
    for i in 0..12 {
        let start = normalize_360(cusps[i]);
        let end = normalize_360(cusps[(i + 1) % 12]);
        let inside = if start <= end {
            lon >= start && lon < end
        } else {
            lon >= start || lon < end
        };
        if inside {
            return i as u8 + 1;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped_table() -> [f64; 12] {
        // House 12 straddles 0°: cusp 12 = 350°, cusp 1 = 20°.
        [
            20.0, 50.0, 80.0, 110.0, 140.0, 170.0, 200.0, 230.0, 260.0, 290.0, 320.0, 350.0,
        ]
    }

    #[test]
    fn wraparound_house_12() {
        assert_eq!(house_of_longitude(359.0, &wrapped_table()), 12);
        assert_eq!(house_of_longitude(5.0, &wrapped_table()), 12);
        assert_eq!(house_of_longitude(350.0, &wrapped_table()), 12);
    }

    #[test]
    fn cusp_belongs_to_its_own_house() {
        let t = wrapped_table();
        for (i, c) in t.iter().enumerate() {
            assert_eq!(house_of_longitude(*c, &t), i as u8 + 1);
        }
    }

    #[test]
    fn just_below_next_cusp() {
        assert_eq!(house_of_longitude(49.999, &wrapped_table()), 1);
    }

    #[test]
    fn degenerate_tables_default_to_house_1() {
        assert_eq!(house_of_longitude(123.0, &[]), 1);
        assert_eq!(house_of_longitude(123.0, &[0.0; 5]), 1);
        assert_eq!(house_of_longitude(123.0, &[0.0; 12]), 1);
        assert_eq!(house_of_longitude(123.0, &[f64::NAN; 12]), 1);
    }

    #[test]
    fn every_longitude_lands_in_exactly_one_house() {
        let t = wrapped_table();
        let cusps = HouseCusps::new(t).unwrap();
        let mut counts = [0u32; 12];
        for tenth in 0..3600 {
            let lon = tenth as f64 / 10.0;
            counts[cusps.house_of(lon) as usize - 1] += 1;
        }
        assert!(counts.iter().all(|&c| c == 300), "{counts:?}");
    }

    #[test]
    fn unequal_quadrant_style_table() {
        let t = [
            100.0, 125.0, 155.0, 190.0, 225.0, 250.0, 280.0, 305.0, 335.0, 10.0, 45.0, 70.0,
        ];
        let cusps = HouseCusps::new(t).unwrap();
        assert_eq!(cusps.house_of(0.0), 9);
        assert_eq!(cusps.house_of(9.99), 9);
        assert_eq!(cusps.house_of(10.0), 10);
        assert_eq!(cusps.house_of(99.0), 12);
    }

    #[test]
    fn equal_houses() {
        let h = HouseCusps::equal(15.0).unwrap();
        assert_eq!(h.cusp(1), Some(15.0));
        assert_eq!(h.cusp(12), Some(345.0));
        assert_eq!(h.cusp(13), None);
        assert_eq!(h.cusp_sign(4), Some(Sign::Cancer));
        assert_eq!(h.house_of(14.0), 12);
    }

    #[test]
    fn out_of_order_cusps_rejected() {
        let mut t = wrapped_table();
        t.swap(3, 4);
        assert!(matches!(
            HouseCusps::new(t),
            Err(ChartError::InvalidHouseCusps(_))
        ));
    }

    #[test]
    fn duplicate_cusp_rejected() {
        let mut t = wrapped_table();
        t[5] = t[4];
        assert!(HouseCusps::new(t).is_err());
    }

    #[test]
    fn wrong_length_rejected_by_serde() {
        let r: Result<HouseCusps, _> = serde_json::from_str("[0, 30, 60]");
        assert!(r.is_err());
    }

    #[test]
    fn serde_roundtrip_normalizes() {
        let h: HouseCusps = serde_json::from_str(
            "[380, 50, 80, 110, 140, 170, 200, 230, 260, 290, 320, 350]",
        )
        .unwrap();
        assert_eq!(h.cusp(1), Some(20.0));
    }
}
