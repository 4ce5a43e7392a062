//! Property checks over the sign, house and aspect classifiers.

use muhurta_chart::{
    ALL_ASPECT_KINDS, AspectKind, AspectTable, MovingPoint, angular_separation, find_aspect,
    house_of_longitude, sign_from_longitude,
};

fn sample_longitudes() -> impl Iterator<Item = f64> {
    (0..720).map(|i| i as f64 * 0.5 + 0.123)
}

#[test]
fn sign_is_periodic_in_360() {
    for lon in sample_longitudes() {
        let base = sign_from_longitude(lon);
        for k in [-3i32, -1, 1, 2, 5] {
            let shifted = sign_from_longitude(lon + 360.0 * k as f64);
            assert_eq!(shifted.sign_index, base.sign_index, "lon {lon}, k {k}");
            assert!(
                (shifted.degrees_in_sign - base.degrees_in_sign).abs() < 1e-9,
                "lon {lon}, k {k}"
            );
        }
    }
}

#[test]
fn aspect_type_and_orb_symmetric() {
    for a in sample_longitudes().step_by(7) {
        for b in sample_longitudes().step_by(11) {
            let ab = find_aspect(MovingPoint::fixed(a), MovingPoint::fixed(b));
            let ba = find_aspect(MovingPoint::fixed(b), MovingPoint::fixed(a));
            match (ab, ba) {
                (None, None) => {}
                (Some(x), Some(y)) => {
                    assert_eq!(x.kind, y.kind, "{a} vs {b}");
                    assert!((x.orb - y.orb).abs() < 1e-12, "{a} vs {b}");
                }
                _ => panic!("asymmetric detection for {a} vs {b}"),
            }
        }
    }
}

#[test]
fn motion_follows_transiting_point_not_argument_order() {
    // Transiting body at 85 moving +1/day toward a fixed natal point at 0.
    let transit = MovingPoint::moving(85.0, 1.0);
    let natal = MovingPoint::fixed(0.0);
    let ab = find_aspect(transit, natal).unwrap();
    let ba = find_aspect(natal, transit).unwrap();
    assert_eq!(ab.motion, ba.motion);
}

#[test]
fn orb_boundary_inclusive() {
    let table = AspectTable::default();
    for kind in ALL_ASPECT_KINDS {
        let spec = table.spec(kind).unwrap();
        let base = 40.0;
        for sign in [-1.0, 1.0] {
            let sep = spec.exact_angle + sign * spec.max_orb;
            if !(0.0..=180.0).contains(&sep) {
                continue;
            }
            let m = find_aspect(MovingPoint::fixed(base), MovingPoint::fixed(base + sep))
                .unwrap_or_else(|| panic!("{kind} at {sep} should match"));
            assert_eq!(m.kind, kind);

            let sep_out = spec.exact_angle + sign * (spec.max_orb + 0.01);
            if (0.0..=180.0).contains(&sep_out) {
                let m = find_aspect(MovingPoint::fixed(base), MovingPoint::fixed(base + sep_out));
                assert!(
                    m.map(|m| m.kind) != Some(kind),
                    "{kind} at {sep_out} should not match"
                );
            }
        }
    }
}

#[test]
fn orb_never_exceeds_max() {
    let table = AspectTable::default();
    for a in sample_longitudes().step_by(3) {
        for b in sample_longitudes().step_by(13) {
            if let Some(m) = table.find(MovingPoint::fixed(a), MovingPoint::fixed(b)) {
                assert!(m.orb <= m.max_orb + 1e-9);
                assert!((0.0..=1.0).contains(&m.strength));
            }
        }
    }
}

#[test]
fn separation_in_range() {
    for a in sample_longitudes().step_by(5) {
        for b in sample_longitudes().step_by(9) {
            let s = angular_separation(a, b);
            assert!((0.0..=180.0).contains(&s), "{a} {b} -> {s}");
        }
    }
}

#[test]
fn house_wraparound_example() {
    let mut cusps = [0.0; 12];
    for (i, c) in cusps.iter_mut().enumerate() {
        *c = 20.0 + 30.0 * i as f64;
    }
    cusps[11] = 350.0;
    assert_eq!(house_of_longitude(359.0, &cusps), 12);
}

#[test]
fn mercury_trine_example() {
    let m = find_aspect(MovingPoint::moving(200.0, 1.0), MovingPoint::fixed(80.0)).unwrap();
    assert!((angular_separation(200.0, 80.0) - 120.0).abs() < 1e-12);
    assert_eq!(m.kind, AspectKind::Trine);
    assert!(m.orb.abs() < 1e-12);
    assert!((m.strength - 1.0).abs() < 1e-12);
}
