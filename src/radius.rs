//! Per-point counts of indexed points within a fixed radius.

use crate::error::Result;
use crate::point_set::PointSet;
use crate::spatial_index::SpatialIndex;

/// Radius used for the nearby-store features of the reference analysis.
///
/// Exported for callers that want the same features; no function in this
/// crate falls back to it.
pub const REFERENCE_RADIUS_KM: f64 = 0.7;

/// For every base point, the number of indexed points within `radius_km`
/// (boundary inclusive). Output order follows `base`.
///
/// ```
/// use geoprox::{count_nearby, Config, GeoPoint, PointSet, SpatialIndex};
///
/// let cafes = PointSet::from_points(vec![
///     GeoPoint::new(37.5000, 127.0000),
///     GeoPoint::new(37.5010, 127.0010),
///     GeoPoint::new(37.6000, 127.1000),
/// ])?;
/// let index = SpatialIndex::build(&cafes, &Config::default())?;
///
/// let base = PointSet::from_points(vec![GeoPoint::new(37.5005, 127.0005)])?;
/// assert_eq!(count_nearby(&base, &index, 0.7)?, vec![2]);
/// # Ok::<(), geoprox::GeoproxError>(())
/// ```
pub fn count_nearby<B>(base: &PointSet<B>, index: &SpatialIndex, radius_km: f64) -> Result<Vec<usize>> {
    index.count_within_radius_batch(base.points(), radius_km)
}
