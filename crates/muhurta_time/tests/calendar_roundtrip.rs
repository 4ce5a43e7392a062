//! Round-trip and monotonicity checks for civil date ↔ Julian Day over
//! [1800, 2200).

use muhurta_time::{UtcTime, days_in_month, jd_to_utc, utc_to_jd};

/// Deterministic pseudo-random sequence (LCG) so failures are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

fn random_instant(rng: &mut Lcg) -> UtcTime {
    let year = 1800 + rng.next(400) as i32;
    let month = 1 + rng.next(12) as u32;
    let day = 1 + rng.next(days_in_month(year, month) as u64) as u32;
    let hour = rng.next(24) as u32;
    let minute = rng.next(60) as u32;
    let second = rng.next(60_000) as f64 / 1000.0;
    UtcTime::new(year, month, day, hour, minute, second)
}

#[test]
fn roundtrip_within_one_second() {
    let mut rng = Lcg(0x5eed);
    for _ in 0..20_000 {
        let t = random_instant(&mut rng);
        let jd = utc_to_jd(&t).expect("valid instant");
        let back = jd_to_utc(jd).expect("jd in range");
        let jd_back = utc_to_jd(&back).expect("roundtrip instant valid");
        let diff_s = (jd_back - jd).abs() * 86_400.0;
        assert!(diff_s < 1.0, "{t} -> {jd} -> {back} differs by {diff_s}s");
        assert_eq!((back.year, back.month, back.day), (t.year, t.month, t.day));
    }
}

#[test]
fn whole_second_instants_roundtrip_exactly() {
    let mut rng = Lcg(42);
    for _ in 0..5_000 {
        let mut t = random_instant(&mut rng);
        t.second = t.second.floor();
        let back = jd_to_utc(utc_to_jd(&t).unwrap()).unwrap();
        assert_eq!(back, t);
    }
}

#[test]
fn consecutive_days_differ_by_one() {
    let mut prev = utc_to_jd(&UtcTime::midnight(1800, 1, 1)).unwrap();
    for year in 1800..1804 {
        for month in 1..=12 {
            for day in 1..=days_in_month(year, month) {
                if (year, month, day) == (1800, 1, 1) {
                    continue;
                }
                let jd = utc_to_jd(&UtcTime::midnight(year, month, day)).unwrap();
                assert!((jd - prev - 1.0).abs() < 1e-9, "{year}-{month}-{day}");
                prev = jd;
            }
        }
    }
}

#[test]
fn boundary_years() {
    let lo = UtcTime::midnight(1800, 1, 1);
    let hi = UtcTime::new(2199, 12, 31, 23, 59, 59.0);
    for t in [lo, hi] {
        assert_eq!(jd_to_utc(utc_to_jd(&t).unwrap()).unwrap(), t);
    }
}
