//! Distance formulas and input validation.

pub mod distance;
pub mod validation;

pub use distance::{
    DistanceMetric, DistanceUnit, EARTH_RADIUS_KM, chord_distance, distance_between,
    haversine_distance, quick_distance,
};
