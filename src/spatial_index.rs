//! Read-only spatial index for great-circle nearest-neighbor and radius queries.
//!
//! Coordinates are converted to radians at construction and projected onto
//! the unit sphere, then bulk-loaded into an R*-tree. Chord length on the
//! unit sphere is strictly increasing in the central angle, so:
//!
//! - the Euclidean nearest neighbor in 3D is the great-circle nearest neighbor
//! - a chord ball of radius `2·sin(θ/2)` contains exactly the points within
//!   central angle `θ`
//!
//! Queries prune with the tree, then measure the surviving candidates with
//! the exact haversine formula, giving O(log n) lookups instead of a scan.
//!
//! # Example
//!
//! ```rust
//! use geoprox::{Config, GeoPoint, PointSet, SpatialIndex};
//!
//! let stations = PointSet::new(
//!     vec![GeoPoint::new(37.4979, 127.0276), GeoPoint::new(37.5665, 126.9780)],
//!     vec!["Gangnam", "City Hall"],
//! )?;
//! let index = SpatialIndex::build(&stations, &Config::default())?;
//!
//! let nearest = index.nearest(&GeoPoint::new(37.50, 127.03))?;
//! assert_eq!(stations.attributes()[nearest.index], "Gangnam");
//! # Ok::<(), geoprox::GeoproxError>(())
//! ```

use crate::compute::distance::{DistanceMetric, euclidean_3d, haversine_angle, unit_vector};
use crate::compute::validation::{validate_geographic_point, validate_points, validate_radius_km};
use crate::config::Config;
use crate::error::{GeoproxError, Result};
use crate::point_set::PointSet;
use crate::types::GeoPoint;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Tree entry: unit-sphere position tagged with the row it came from.
type IndexEntry = GeomWithData<[f64; 3], usize>;

/// Relative slack on the pruning ball so boundary points survive rounding
/// before the exact distance check.
const PRUNE_SLACK: f64 = 1e-9;

/// A matched indexed point: its distance in kilometers and its position in
/// the point set the index was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub distance_km: f64,
    pub index: usize,
}

/// Prepared query point.
struct Probe {
    lat: f64,
    lon: f64,
    position: [f64; 3],
}

impl Probe {
    fn new(point: &GeoPoint) -> Result<Self> {
        validate_geographic_point(point)?;
        let (lat, lon) = point.to_radians();
        Ok(Self {
            lat,
            lon,
            position: unit_vector(lat, lon),
        })
    }
}

/// Immutable spatial index over a fixed set of geographic points.
///
/// Holds its own copy of the coordinates and nothing else: attributes stay
/// with the caller and are resolved through [`Nearest::index`]. A changed
/// point set needs a new index.
///
/// # Ties
///
/// When several indexed points sit at exactly the same minimal distance,
/// which one [`SpatialIndex::nearest`] returns depends on the tree layout.
/// Callers must not rely on any particular choice; the distance itself is
/// always the true minimum.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
    coords: Vec<(f64, f64)>,
    metric: DistanceMetric,
    earth_radius_km: f64,
    parallel_threshold: usize,
}

impl SpatialIndex {
    /// Build an index over the coordinates of `points`.
    ///
    /// Fails with `EmptyIndex` when `points` is empty. Callers that treat an
    /// empty category as legitimate should branch before building.
    pub fn build<T>(points: &PointSet<T>, config: &Config) -> Result<Self> {
        Self::from_points(points.points(), config)
    }

    pub fn from_points(points: &[GeoPoint], config: &Config) -> Result<Self> {
        config.validate()?;

        if points.is_empty() {
            return Err(GeoproxError::EmptyIndex);
        }
        validate_points(points)?;

        let coords: Vec<(f64, f64)> = points.iter().map(GeoPoint::to_radians).collect();
        let entries: Vec<IndexEntry> = coords
            .iter()
            .enumerate()
            .map(|(idx, &(lat, lon))| GeomWithData::new(unit_vector(lat, lon), idx))
            .collect();

        let tree = RTree::bulk_load(entries);
        log::debug!(
            "Built spatial index over {} points (metric: {}, earth radius: {} km)",
            coords.len(),
            config.metric.as_str(),
            config.earth_radius_km
        );

        Ok(Self {
            tree,
            coords,
            metric: config.metric,
            earth_radius_km: config.earth_radius_km,
            parallel_threshold: config.parallel_threshold,
        })
    }

    /// Number of indexed points.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always `false`; an index cannot be built empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    #[inline]
    pub fn earth_radius_km(&self) -> f64 {
        self.earth_radius_km
    }

    /// Indexed `(lat, lon)` pairs in radians, in build order.
    pub fn coordinates_radians(&self) -> &[(f64, f64)] {
        &self.coords
    }

    /// Great-circle distance from the probe to an entry, in km.
    #[inline]
    fn arc_km(&self, probe: &Probe, entry: &IndexEntry) -> f64 {
        let (lat, lon) = self.coords[entry.data];
        self.earth_radius_km * haversine_angle(probe.lat, probe.lon, lat, lon)
    }

    /// Distance from the probe to an entry under the index metric, in km.
    #[inline]
    fn measure(&self, probe: &Probe, entry: &IndexEntry) -> f64 {
        match self.metric {
            DistanceMetric::Haversine => self.arc_km(probe, entry),
            DistanceMetric::Chord => self.earth_radius_km * euclidean_3d(&probe.position, entry.geom()),
        }
    }

    /// Reported distance for an entry whose arc length is already known.
    #[inline]
    fn report(&self, probe: &Probe, entry: &IndexEntry, arc_km: f64) -> f64 {
        match self.metric {
            DistanceMetric::Haversine => arc_km,
            DistanceMetric::Chord => self.measure(probe, entry),
        }
    }

    /// Nearest indexed point to `query`.
    pub fn nearest(&self, query: &GeoPoint) -> Result<Nearest> {
        let probe = Probe::new(query)?;
        let entry = self
            .tree
            .nearest_neighbor(&probe.position)
            .ok_or(GeoproxError::EmptyIndex)?;

        Ok(Nearest {
            distance_km: self.measure(&probe, entry),
            index: entry.data,
        })
    }

    /// Up to `k` nearest indexed points, ascending by distance.
    pub fn k_nearest(&self, query: &GeoPoint, k: usize) -> Result<Vec<Nearest>> {
        let probe = Probe::new(query)?;
        Ok(self
            .tree
            .nearest_neighbor_iter(&probe.position)
            .take(k)
            .map(|entry| Nearest {
                distance_km: self.measure(&probe, entry),
                index: entry.data,
            })
            .collect())
    }

    /// Squared unit-sphere chord enclosing every point within `radius_km` of
    /// great-circle distance, or `None` when the radius covers the whole sphere.
    fn pruning_ball(&self, radius_km: f64) -> Option<f64> {
        let angle = radius_km / self.earth_radius_km;
        if angle >= PI {
            return None;
        }
        let chord = 2.0 * (angle / 2.0).sin();
        let padded = chord * (1.0 + PRUNE_SLACK) + PRUNE_SLACK;
        Some(padded * padded)
    }

    fn for_each_within<F>(&self, query: &GeoPoint, radius_km: f64, mut visit: F) -> Result<()>
    where
        F: FnMut(&IndexEntry, f64),
    {
        validate_radius_km(radius_km)?;
        let probe = Probe::new(query)?;

        match self.pruning_ball(radius_km) {
            Some(max_squared) => {
                for entry in self.tree.locate_within_distance(probe.position, max_squared) {
                    let arc = self.arc_km(&probe, entry);
                    if arc <= radius_km {
                        visit(entry, self.report(&probe, entry, arc));
                    }
                }
            }
            None => {
                log::warn!(
                    "Radius {} km spans the whole sphere (earth radius {} km); matching every point",
                    radius_km,
                    self.earth_radius_km
                );
                for entry in self.tree.iter() {
                    visit(entry, self.measure(&probe, entry));
                }
            }
        }
        Ok(())
    }

    /// Count indexed points whose great-circle distance to `query` is at most
    /// `radius_km`, whatever the index metric. The boundary is inclusive.
    pub fn count_within_radius(&self, query: &GeoPoint, radius_km: f64) -> Result<usize> {
        let mut count = 0;
        self.for_each_within(query, radius_km, |_, _| count += 1)?;
        Ok(count)
    }

    /// Indexed points within `radius_km` great-circle distance of `query`,
    /// ascending by the reported distance (the index metric). Equal distances
    /// are ordered by index.
    pub fn within_radius(&self, query: &GeoPoint, radius_km: f64) -> Result<Vec<Nearest>> {
        let mut hits = Vec::new();
        self.for_each_within(query, radius_km, |entry, distance_km| {
            hits.push(Nearest {
                distance_km,
                index: entry.data,
            })
        })?;
        hits.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        Ok(hits)
    }

    /// [`SpatialIndex::nearest`] for every query, in input order.
    pub fn nearest_batch(&self, queries: &[GeoPoint]) -> Result<Vec<Nearest>> {
        self.run_batch(queries, |query| self.nearest(query))
    }

    /// [`SpatialIndex::count_within_radius`] for every query, in input order.
    pub fn count_within_radius_batch(
        &self,
        queries: &[GeoPoint],
        radius_km: f64,
    ) -> Result<Vec<usize>> {
        validate_radius_km(radius_km)?;
        self.run_batch(queries, |query| self.count_within_radius(query, radius_km))
    }

    fn run_batch<R, F>(&self, queries: &[GeoPoint], op: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(&GeoPoint) -> Result<R> + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            if queries.len() >= self.parallel_threshold {
                use rayon::prelude::*;
                log::debug!("Running {} index queries on the worker pool", queries.len());
                return queries.par_iter().map(&op).collect();
            }
        }

        #[cfg(not(feature = "parallel"))]
        let _ = self.parallel_threshold;

        queries.iter().map(op).collect()
    }
}
