//! Nearest-neighbor join between a base point set and an indexed point set.

use crate::compute::distance::DistanceUnit;
use crate::config::Config;
use crate::error::{GeoproxError, Result};
use crate::point_set::PointSet;
use crate::spatial_index::SpatialIndex;
use serde::Serialize;

/// Nearest match for one base point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult<T> {
    /// Distance to the match, in kilometers unless a unit was requested
    pub distance: f64,
    /// Position of the match in the indexed point set
    pub index: usize,
    pub attribute: T,
}

/// For every base point, the nearest indexed point and its attribute.
///
/// `attributes` must be aligned with the points the index was built from;
/// a length mismatch is a programming error and fails before any query runs.
/// Output order follows `base`.
///
/// # Examples
///
/// ```
/// use geoprox::{join, Config, GeoPoint, PointSet, SpatialIndex};
///
/// let stations = PointSet::new(
///     vec![GeoPoint::new(37.5, 127.0), GeoPoint::new(37.6, 127.1)],
///     vec!["A", "B"],
/// )?;
/// let index = SpatialIndex::build(&stations, &Config::default())?;
///
/// let base = PointSet::from_points(vec![GeoPoint::new(37.5, 127.0)])?;
/// let results = join(&base, &index, stations.attributes())?;
/// assert_eq!(results[0].distance, 0.0);
/// assert_eq!(results[0].attribute, "A");
/// # Ok::<(), geoprox::GeoproxError>(())
/// ```
pub fn join<B, T: Clone>(
    base: &PointSet<B>,
    index: &SpatialIndex,
    attributes: &[T],
) -> Result<Vec<ProximityResult<T>>> {
    join_in_unit(base, index, attributes, DistanceUnit::Kilometers)
}

/// [`join`] with distances converted to `unit`.
pub fn join_in_unit<B, T: Clone>(
    base: &PointSet<B>,
    index: &SpatialIndex,
    attributes: &[T],
    unit: DistanceUnit,
) -> Result<Vec<ProximityResult<T>>> {
    if attributes.len() != index.len() {
        return Err(GeoproxError::IndexContract(format!(
            "index holds {} points but {} attributes were supplied",
            index.len(),
            attributes.len()
        )));
    }

    let matches = index.nearest_batch(base.points())?;
    Ok(matches
        .into_iter()
        .map(|m| ProximityResult {
            distance: unit.to_unit(m.distance_km),
            index: m.index,
            attribute: attributes[m.index].clone(),
        })
        .collect())
}

/// Build an index over `targets` and join `base` against it, reporting
/// distances in `config.unit`.
pub fn nearest_join<B, T: Clone>(
    base: &PointSet<B>,
    targets: &PointSet<T>,
    config: &Config,
) -> Result<Vec<ProximityResult<T>>> {
    let index = SpatialIndex::build(targets, config)?;
    join_in_unit(base, &index, targets.attributes(), config.unit)
}
