//! In-memory geospatial proximity engine.
//!
//! ## Features
//! - **Distance metrics**: haversine great-circle distance and 3D chord
//!   distance with an explicit sphere radius and km/m output
//! - **Spatial index**: read-only R*-tree over unit-sphere positions with
//!   exact great-circle nearest-neighbor and inclusive radius queries
//! - **Joins and counts**: nearest match per base point, radius counts per
//!   base point, both in base order
//! - **Feature tables**: named count/distance/label columns, one row per base
//!   point, empty categories filled with zeros
//!
//! ```rust
//! use geoprox::{Config, FeatureAggregator, FeatureSources, GeoPoint, PointSet};
//!
//! let base = PointSet::new(
//!     vec![GeoPoint::new(37.4979, 127.0276), GeoPoint::new(37.5665, 126.9780)],
//!     vec!["Gangnam", "City Hall"],
//! )?;
//! let stores = PointSet::new(
//!     vec![GeoPoint::new(37.4985, 127.0270), GeoPoint::new(37.5670, 126.9775)],
//!     vec!["cafe", "restaurant"],
//! )?;
//!
//! let sources = FeatureSources::new()
//!     .with("cafes", stores.filter(|kind| *kind == "cafe"))?
//!     .with("restaurants", stores.filter(|kind| *kind == "restaurant"))?;
//!
//! let table = FeatureAggregator::new(Config::default()).aggregate(&base, &sources, 0.7)?;
//! assert_eq!(table.counts("cafes"), Some(&[1, 0][..]));
//! assert_eq!(table.counts("restaurants"), Some(&[0, 1][..]));
//! # Ok::<(), geoprox::GeoproxError>(())
//! ```

pub mod aggregate;
pub mod compute;
pub mod config;
pub mod error;
pub mod join;
pub mod point_set;
pub mod radius;
pub mod spatial_index;
pub mod types;

pub use aggregate::{Column, ColumnValues, FeatureAggregator, FeatureSources, FeatureTable};
pub use compute::{
    DistanceMetric, DistanceUnit, EARTH_RADIUS_KM, chord_distance, distance_between,
    haversine_distance, quick_distance,
};
pub use config::Config;
pub use error::{GeoproxError, Result};
pub use join::{ProximityResult, join, join_in_unit, nearest_join};
pub use point_set::PointSet;
pub use radius::{REFERENCE_RADIUS_KM, count_nearby};
pub use spatial_index::{Nearest, SpatialIndex};
pub use types::GeoPoint;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Config, GeoPoint, GeoproxError, PointSet, Result, SpatialIndex};

    pub use crate::{DistanceMetric, DistanceUnit};

    pub use crate::{FeatureAggregator, FeatureSources, FeatureTable};

    pub use crate::{count_nearby, join, nearest_join};
}
