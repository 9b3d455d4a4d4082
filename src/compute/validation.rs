//! Validation for geographic coordinates and query parameters.

use crate::error::{GeoproxError, Result};
use crate::types::GeoPoint;

/// Validates a point has a finite latitude in [-90, 90] and a finite
/// longitude in [-180, 180].
///
/// # Examples
///
/// ```
/// use geoprox::GeoPoint;
/// use geoprox::compute::validation::validate_geographic_point;
///
/// let city_hall = GeoPoint::new(37.5665, 126.9780);
/// assert!(validate_geographic_point(&city_hall).is_ok());
///
/// let invalid = GeoPoint::new(95.0, 126.9780);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &GeoPoint) -> Result<()> {
    let (lat, lon) = (point.lat(), point.lon());

    if !lat.is_finite() {
        return Err(GeoproxError::InvalidCoordinate(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !lon.is_finite() {
        return Err(GeoproxError::InvalidCoordinate(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoproxError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(GeoproxError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }

    Ok(())
}

/// Validates every point, reporting the first offending row.
pub fn validate_points(points: &[GeoPoint]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_geographic_point(point).map_err(|e| match e {
            GeoproxError::InvalidCoordinate(msg) => {
                GeoproxError::InvalidCoordinate(format!("Point at index {}: {}", idx, msg))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Validates a search radius in kilometers.
///
/// Zero is allowed and matches only coincident points.
///
/// ```
/// use geoprox::compute::validation::validate_radius_km;
///
/// assert!(validate_radius_km(0.7).is_ok());
/// assert!(validate_radius_km(0.0).is_ok());
/// assert!(validate_radius_km(-1.0).is_err());
/// assert!(validate_radius_km(f64::NAN).is_err());
/// ```
pub fn validate_radius_km(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() {
        return Err(GeoproxError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius_km
        )));
    }
    if radius_km < 0.0 {
        return Err(GeoproxError::InvalidInput(format!(
            "Radius must be non-negative, got: {}",
            radius_km
        )));
    }
    Ok(())
}

/// Validates a sphere radius used by the distance formulas.
pub fn validate_earth_radius_km(earth_radius_km: f64) -> Result<()> {
    if !earth_radius_km.is_finite() || earth_radius_km <= 0.0 {
        return Err(GeoproxError::InvalidInput(format!(
            "Earth radius must be positive and finite, got: {}",
            earth_radius_km
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_geographic_point() {
        let gangnam = GeoPoint::new(37.4979, 127.0276);
        assert!(validate_geographic_point(&gangnam).is_ok());

        let london = GeoPoint::new(51.5074, -0.1278);
        assert!(validate_geographic_point(&london).is_ok());

        // Edge cases
        assert!(validate_geographic_point(&GeoPoint::new(0.0, 180.0)).is_ok());
        assert!(validate_geographic_point(&GeoPoint::new(0.0, -180.0)).is_ok());
        assert!(validate_geographic_point(&GeoPoint::new(90.0, 0.0)).is_ok());
        assert!(validate_geographic_point(&GeoPoint::new(-90.0, 0.0)).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(validate_geographic_point(&GeoPoint::new(95.0, 127.0)).is_err());
        assert!(validate_geographic_point(&GeoPoint::new(-90.1, 127.0)).is_err());
    }

    #[test]
    fn test_invalid_longitude() {
        assert!(validate_geographic_point(&GeoPoint::new(37.5, 200.0)).is_err());
        assert!(validate_geographic_point(&GeoPoint::new(37.5, -180.1)).is_err());
    }

    #[test]
    fn test_non_finite_coordinates() {
        assert!(validate_geographic_point(&GeoPoint::new(f64::NAN, 127.0)).is_err());
        assert!(validate_geographic_point(&GeoPoint::new(37.5, f64::NAN)).is_err());
        assert!(validate_geographic_point(&GeoPoint::new(f64::INFINITY, 127.0)).is_err());
        assert!(validate_geographic_point(&GeoPoint::new(37.5, f64::NEG_INFINITY)).is_err());
    }

    #[test]
    fn test_validate_points_reports_index() {
        let points = vec![
            GeoPoint::new(37.5, 127.0),
            GeoPoint::new(37.6, 127.1),
            GeoPoint::new(f64::NAN, 127.2),
        ];
        let err = validate_points(&points).unwrap_err();
        assert!(matches!(err, GeoproxError::InvalidCoordinate(_)));
        assert!(err.to_string().contains("index 2"));
        assert_eq!(
            err.to_string(),
            "Invalid coordinate: Point at index 2: Latitude must be finite, got: NaN"
        );
    }

    #[test]
    fn test_validate_radius() {
        assert!(validate_radius_km(0.7).is_ok());
        assert!(validate_radius_km(0.0).is_ok());
        assert!(validate_radius_km(20_000.0).is_ok());

        assert!(validate_radius_km(-0.1).is_err());
        assert!(validate_radius_km(f64::INFINITY).is_err());
        assert!(validate_radius_km(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_earth_radius() {
        assert!(validate_earth_radius_km(6371.0).is_ok());
        assert!(validate_earth_radius_km(0.0).is_err());
        assert!(validate_earth_radius_km(-6371.0).is_err());
        assert!(validate_earth_radius_km(f64::NAN).is_err());
    }
}
