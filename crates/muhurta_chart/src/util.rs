//! Shared angle helpers.

/// Normalize an angle to [0, 360) degrees.
///
/// Non-finite input is passed through unchanged; callers that need a finite
/// result validate first.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r };
    // -1e-17 % 360 + 360 rounds to exactly 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero() {
        assert!((normalize_360(0.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn normalize_360_wraps() {
        assert!((normalize_360(360.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn normalize_negative() {
        assert!((normalize_360(-10.0) - 350.0).abs() < 1e-15);
    }

    #[test]
    fn normalize_large() {
        assert!((normalize_360(730.0) - 10.0).abs() < 1e-10);
        assert!((normalize_360(-370.0) - 350.0).abs() < 1e-10);
    }

    #[test]
    fn normalize_tiny_negative_stays_in_range() {
        let r = normalize_360(-1e-17);
        assert!((0.0..360.0).contains(&r), "got {r}");
    }

    #[test]
    fn pm180_wraps() {
        assert!((normalize_to_pm180(190.0) + 170.0).abs() < 1e-12);
        assert!((normalize_to_pm180(-190.0) - 170.0).abs() < 1e-12);
        assert!((normalize_to_pm180(180.0) - 180.0).abs() < 1e-12);
    }
}
