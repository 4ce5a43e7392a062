//! Greenwich Mean Sidereal Time and Local Sidereal Time.
//!
//! GMST polynomial: Meeus, *Astronomical Algorithms*, eq. 12.4, valid for
//! any instant (not only 0h UT). UT is taken to be UTC; the sub-second
//! UT1−UTC difference is below the precision of the upstream feed.

use crate::error::TimeError;
use crate::julian::J2000_JD;

/// Greenwich Mean Sidereal Time in degrees, [0, 360).
///
/// θ₀ = 280.46061837 + 360.98564736629·(JD − 2451545.0)
///      + 0.000387933·T² − T³/38710000
pub fn gmst_deg(jd_ut: f64) -> Result<f64, TimeError> {
    if !jd_ut.is_finite() {
        return Err(TimeError::invalid_date(
            jd_ut.to_string(),
            "Julian Day is not finite",
        ));
    }
    let d = jd_ut - J2000_JD;
    let t = d / 36_525.0;
    let theta = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    Ok(theta.rem_euclid(360.0))
}

/// Local Sidereal Time in degrees, [0, 360).
///
/// LST = GMST + east longitude. West longitudes are negative.
pub fn local_sidereal_time_deg(jd_ut: f64, longitude_east_deg: f64) -> Result<f64, TimeError> {
    if !longitude_east_deg.is_finite() {
        return Err(TimeError::InvalidLongitude(longitude_east_deg));
    }
    let gmst = gmst_deg(jd_ut)?;
    Ok((gmst + longitude_east_deg).rem_euclid(360.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gmst_meeus_example_12a() {
        // 1987 Apr 10, 0h UT → 13h10m46.3668s = 197.693195°
        let g = gmst_deg(2_446_895.5).unwrap();
        assert!((g - 197.693_195).abs() < 1e-4, "GMST = {g}");
    }

    #[test]
    fn gmst_meeus_example_12b() {
        // 1987 Apr 10, 19h21m00s UT → 128.7378734°
        let g = gmst_deg(2_446_896.306_25).unwrap();
        assert!((g - 128.737_873_4).abs() < 1e-4, "GMST = {g}");
    }

    #[test]
    fn lst_adds_east_longitude() {
        let g = gmst_deg(2_446_895.5).unwrap();
        let lst = local_sidereal_time_deg(2_446_895.5, 77.2).unwrap();
        assert!((lst - (g + 77.2).rem_euclid(360.0)).abs() < 1e-9);
    }

    #[test]
    fn lst_west_longitude_wraps() {
        let lst = local_sidereal_time_deg(2_446_895.5, -250.0).unwrap();
        assert!((0.0..360.0).contains(&lst));
    }

    #[test]
    fn gmst_range() {
        for &jd in &[2_451_545.0, 2_451_544.5, 2_460_000.5, 2_440_000.5] {
            let g = gmst_deg(jd).unwrap();
            assert!((0.0..360.0).contains(&g), "GMST out of range: {g}");
        }
    }

    #[test]
    fn non_finite_inputs_rejected() {
        assert!(gmst_deg(f64::NAN).is_err());
        assert!(matches!(
            local_sidereal_time_deg(J2000_JD, f64::INFINITY),
            Err(TimeError::InvalidLongitude(_))
        ));
    }
}
