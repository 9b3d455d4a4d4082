//! Geographic point type used throughout the engine.
//!
//! `GeoPoint` wraps `geo::Point<f64>` (x = longitude, y = latitude) but is
//! constructed latitude-first, matching how coordinates arrive from
//! geocoded record tables.

use crate::compute::validation::validate_geographic_point;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A `(latitude, longitude)` pair in degrees.
///
/// # Examples
///
/// ```
/// use geoprox::GeoPoint;
///
/// let gangnam = GeoPoint::new(37.4979, 127.0276);
/// assert_eq!(gangnam.lat(), 37.4979);
/// assert_eq!(gangnam.lon(), 127.0276);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    inner: geo::Point<f64>,
}

impl GeoPoint {
    /// Create a point without validation. Use [`GeoPoint::try_new`] for
    /// untrusted input.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            inner: geo::Point::new(longitude, latitude),
        }
    }

    /// Create a point, rejecting non-finite or out-of-range coordinates.
    ///
    /// ```
    /// use geoprox::GeoPoint;
    ///
    /// assert!(GeoPoint::try_new(37.5, 127.0).is_ok());
    /// assert!(GeoPoint::try_new(95.0, 127.0).is_err());
    /// assert!(GeoPoint::try_new(f64::NAN, 127.0).is_err());
    /// ```
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        validate_geographic_point(&point)?;
        Ok(point)
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.inner.y()
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.inner.x()
    }

    /// `(latitude, longitude)` in radians.
    #[inline]
    pub fn to_radians(&self) -> (f64, f64) {
        (self.lat().to_radians(), self.lon().to_radians())
    }

    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> geo::Point<f64> {
        self.inner
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(inner: geo::Point<f64>) -> Self {
        Self { inner }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        point.inner
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat(), self.lon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lon_order() {
        let p = GeoPoint::new(37.5665, 126.9780);
        assert_eq!(p.lat(), 37.5665);
        assert_eq!(p.lon(), 126.9780);
        // geo stores longitude as x
        assert_eq!(p.inner().x(), 126.9780);
        assert_eq!(p.inner().y(), 37.5665);
    }

    #[test]
    fn test_geo_point_conversion() {
        let geo_point = geo::Point::new(127.0, 37.5);
        let p: GeoPoint = geo_point.into();
        assert_eq!(p.lat(), 37.5);
        assert_eq!(p.lon(), 127.0);

        let back: geo::Point<f64> = p.into();
        assert_eq!(back, geo_point);
    }

    #[test]
    fn test_to_radians() {
        let (lat, lon) = GeoPoint::new(90.0, -180.0).to_radians();
        assert!((lat - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert!((lon + std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn test_try_new_rejects_invalid() {
        assert!(GeoPoint::try_new(-90.0, 180.0).is_ok());
        assert!(GeoPoint::try_new(90.1, 0.0).is_err());
        assert!(GeoPoint::try_new(0.0, -180.5).is_err());
        assert!(GeoPoint::try_new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let p = GeoPoint::new(37.4979, 127.0276);
        let json = serde_json::to_string(&p).unwrap();
        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
