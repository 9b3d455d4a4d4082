//! Pairwise distance functions on a spherical earth.
//!
//! Both metrics take the sphere radius explicitly so alternate radii and unit
//! conversions never require re-deriving formulas.

use crate::error::{GeoproxError, Result};
use crate::types::GeoPoint;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Output unit for distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Meters,
}

impl DistanceUnit {
    /// Convert a kilometer value into this unit.
    #[inline]
    pub fn to_unit(self, km: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Meters => km * 1000.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Meters => "m",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = GeoproxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "km" => Ok(DistanceUnit::Kilometers),
            "m" => Ok(DistanceUnit::Meters),
            other => Err(GeoproxError::MethodArgument(format!(
                "unit must be 'km' or 'm', got '{}'",
                other
            ))),
        }
    }
}

/// Distance metric for spatial calculations.
///
/// - **Haversine**: great-circle arc length. The default.
/// - **Chord**: straight-line distance through the sphere between the two
///   surface points. An approximation that always underestimates the arc;
///   kept for legacy feature columns, not as a replacement for haversine.
///
/// The metric only selects the distance an index reports from `nearest`,
/// `k_nearest` and `within_radius`. Radius membership is always decided by
/// great-circle distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Haversine,
    Chord,
}

impl DistanceMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMetric::Haversine => "haversine",
            DistanceMetric::Chord => "chord",
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = GeoproxError;

    /// Accepts `"haversine"`, `"chord"` and the legacy alias `"euclidean"`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "haversine" => Ok(DistanceMetric::Haversine),
            "chord" | "euclidean" => Ok(DistanceMetric::Chord),
            other => Err(GeoproxError::MethodArgument(format!(
                "method must be 'haversine' or 'euclidean', got '{}'",
                other
            ))),
        }
    }
}

/// Central angle in radians between two `(lat, lon)` radian pairs.
#[inline]
pub(crate) fn haversine_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` a hair above 1 for antipodal points
    2.0 * a.min(1.0).sqrt().asin()
}

/// Unit-sphere cartesian coordinates for a `(lat, lon)` radian pair.
#[inline]
pub(crate) fn unit_vector(lat: f64, lon: f64) -> [f64; 3] {
    let cos_lat = lat.cos();
    [cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin()]
}

/// Great-circle distance using the haversine formula:
/// `d = 2R·asin(√(sin²(Δφ/2) + cosφ1·cosφ2·sin²(Δλ/2)))`.
///
/// # Examples
///
/// ```
/// use geoprox::GeoPoint;
/// use geoprox::compute::distance::{haversine_distance, DistanceUnit, EARTH_RADIUS_KM};
///
/// let gangnam = GeoPoint::new(37.4979, 127.0276);
/// let city_hall = GeoPoint::new(37.5665, 126.9780);
///
/// let km = haversine_distance(&gangnam, &city_hall, DistanceUnit::Kilometers, EARTH_RADIUS_KM);
/// assert!(km > 8.5 && km < 9.0);
/// ```
pub fn haversine_distance(
    a: &GeoPoint,
    b: &GeoPoint,
    unit: DistanceUnit,
    earth_radius_km: f64,
) -> f64 {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();
    unit.to_unit(earth_radius_km * haversine_angle(lat1, lon1, lat2, lon2))
}

/// Straight-line 3D distance between two surface points on a sphere of
/// radius `earth_radius_km`.
///
/// Approximation: the chord is always shorter than the arc. The gap is
/// negligible at city scale (well under a millimeter over 10 km) and grows
/// to `πR - 2R` for antipodal points.
///
/// ```
/// use geoprox::GeoPoint;
/// use geoprox::compute::distance::{chord_distance, haversine_distance, DistanceUnit, EARTH_RADIUS_KM};
///
/// let a = GeoPoint::new(37.4979, 127.0276);
/// let b = GeoPoint::new(37.5665, 126.9780);
///
/// let chord = chord_distance(&a, &b, DistanceUnit::Meters, EARTH_RADIUS_KM);
/// let arc = haversine_distance(&a, &b, DistanceUnit::Meters, EARTH_RADIUS_KM);
/// assert!(chord <= arc);
/// ```
pub fn chord_distance(a: &GeoPoint, b: &GeoPoint, unit: DistanceUnit, earth_radius_km: f64) -> f64 {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();
    let p = unit_vector(lat1, lon1);
    let q = unit_vector(lat2, lon2);
    unit.to_unit(earth_radius_km * euclidean_3d(&p, &q))
}

#[inline]
pub(crate) fn euclidean_3d(p: &[f64; 3], q: &[f64; 3]) -> f64 {
    let dx = p[0] - q[0];
    let dy = p[1] - q[1];
    let dz = p[2] - q[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Distance between two points under the given metric.
pub fn distance_between(
    a: &GeoPoint,
    b: &GeoPoint,
    metric: DistanceMetric,
    unit: DistanceUnit,
    earth_radius_km: f64,
) -> f64 {
    match metric {
        DistanceMetric::Haversine => haversine_distance(a, b, unit, earth_radius_km),
        DistanceMetric::Chord => chord_distance(a, b, unit, earth_radius_km),
    }
}

/// String-driven distance helper using [`EARTH_RADIUS_KM`].
///
/// `method` is `"haversine"` or `"euclidean"` (chord), `unit` is `"km"` or
/// `"m"`.
///
/// ```
/// use geoprox::GeoPoint;
/// use geoprox::compute::distance::quick_distance;
///
/// let a = GeoPoint::new(37.5, 127.0);
/// let b = GeoPoint::new(37.6, 127.1);
///
/// let m = quick_distance(&a, &b, "haversine", "m")?;
/// assert!(m > 10_000.0);
/// assert!(quick_distance(&a, &b, "manhattan", "km").is_err());
/// # Ok::<(), geoprox::GeoproxError>(())
/// ```
pub fn quick_distance(a: &GeoPoint, b: &GeoPoint, method: &str, unit: &str) -> Result<f64> {
    let metric: DistanceMetric = method.parse()?;
    let unit: DistanceUnit = unit.parse()?;
    Ok(distance_between(a, b, metric, unit, EARTH_RADIUS_KM))
}
