//! Classification of geocentric ecliptic longitudes.
//!
//! This crate provides:
//! - Body and per-instant reading types (retrograde derived from speed)
//! - Zodiac sign / DMS classification
//! - House assignment from a 12-cusp table, with 0°/360° wraparound
//! - Essential dignity of the seven classical bodies
//! - Aspect detection with orb tolerance and applying/separating motion
//! - Natal chart snapshot and chart store trait
//!
//! All functions are pure.

pub mod aspect;
pub mod body;
pub mod chart;
pub mod dignity;
pub mod error;
pub mod house;
pub mod sign;
pub mod util;

pub use aspect::{
    ALL_ASPECT_KINDS, Aspect, AspectKind, AspectMatch, AspectMotion, AspectSpec, AspectTable,
    DEFAULT_ASPECTS, MovingPoint, angular_separation, find_aspect,
};
pub use body::{ALL_BODIES, Body, BodyReading, CLASSICAL_BODIES};
pub use chart::{InMemoryChartStore, NatalChart, NatalChartStore};
pub use dignity::{
    EssentialDignity, domicile_signs, essential_dignity, exaltation_sign, sign_ruler,
};
pub use error::ChartError;
pub use house::{HouseCusps, house_of_longitude};
pub use sign::{ALL_SIGNS, Dms, Sign, SignPosition, deg_to_dms, dms_to_deg, sign_from_longitude};
pub use util::{normalize_360, normalize_to_pm180};
