//! Feature aggregation: one widened row of proximity features per base point.
//!
//! Sources are plain point sets keyed by feature name. Each non-empty source
//! gets its own index and a radius count; an empty source yields a column of
//! zeros, since a category with no members in the area is a normal outcome.

use crate::compute::validation::validate_radius_km;
use crate::config::Config;
use crate::error::{GeoproxError, Result};
use crate::join::nearest_join;
use crate::point_set::PointSet;
use crate::radius::count_nearby;
use crate::spatial_index::SpatialIndex;
use crate::types::GeoPoint;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt::Display;

pub const ALL_STORES_COLUMN: &str = "all_stores";
pub const RESTAURANTS_COLUMN: &str = "restaurants";
pub const CAFES_COLUMN: &str = "cafes";
pub const CENTROID_DISTANCE_COLUMN: &str = "centroid_distance";
pub const CENTROID_COLUMN: &str = "centroid";

/// Insertion-ordered mapping from feature name to source points.
#[derive(Debug, Clone)]
pub struct FeatureSources<T> {
    entries: Vec<(String, PointSet<T>)>,
    names: FxHashSet<String>,
}

impl<T> FeatureSources<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            names: FxHashSet::default(),
        }
    }

    /// Append a named source. Names must be unique.
    pub fn insert(&mut self, name: impl Into<String>, source: PointSet<T>) -> Result<()> {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            return Err(GeoproxError::InvalidInput(format!(
                "Duplicate feature name: {}",
                name
            )));
        }
        self.entries.push((name, source));
        Ok(())
    }

    /// Builder form of [`FeatureSources::insert`].
    pub fn with(mut self, name: impl Into<String>, source: PointSet<T>) -> Result<Self> {
        self.insert(name, source)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PointSet<T>)> {
        self.entries.iter().map(|(name, set)| (name.as_str(), set))
    }
}

impl<T> Default for FeatureSources<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Values of one feature column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnValues {
    Count(Vec<usize>),
    Distance(Vec<f64>),
    Label(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Count(v) => v.len(),
            ColumnValues::Distance(v) => v.len(),
            ColumnValues::Label(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub values: ColumnValues,
}

/// Column-oriented feature table keyed by base row order.
///
/// Every column has exactly `len()` rows, so tables built over the same base
/// point set can be concatenated horizontally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTable {
    rows: usize,
    columns: Vec<Column>,
}

impl FeatureTable {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.values)
    }

    pub fn counts(&self, name: &str) -> Option<&[usize]> {
        match self.column(name)? {
            ColumnValues::Count(v) => Some(v),
            _ => None,
        }
    }

    pub fn distances(&self, name: &str) -> Option<&[f64]> {
        match self.column(name)? {
            ColumnValues::Distance(v) => Some(v),
            _ => None,
        }
    }

    pub fn labels(&self, name: &str) -> Option<&[String]> {
        match self.column(name)? {
            ColumnValues::Label(v) => Some(v),
            _ => None,
        }
    }

    /// Append a column. Its length must equal the row count and its name
    /// must be new.
    pub fn push_column(&mut self, name: impl Into<String>, values: ColumnValues) -> Result<()> {
        let name = name.into();
        if values.len() != self.rows {
            return Err(GeoproxError::IndexContract(format!(
                "column '{}' has {} rows, table has {}",
                name,
                values.len(),
                self.rows
            )));
        }
        if self.columns.iter().any(|c| c.name == name) {
            return Err(GeoproxError::InvalidInput(format!(
                "Duplicate column name: {}",
                name
            )));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Concatenate `other`'s columns after this table's columns.
    pub fn hconcat(mut self, other: FeatureTable) -> Result<Self> {
        if other.rows != self.rows {
            return Err(GeoproxError::IndexContract(format!(
                "cannot concatenate a {}-row table onto a {}-row table",
                other.rows, self.rows
            )));
        }
        let existing: FxHashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        if let Some(clash) = other
            .columns
            .iter()
            .find(|c| existing.contains(c.name.as_str()))
        {
            return Err(GeoproxError::InvalidInput(format!(
                "Duplicate column name: {}",
                clash.name
            )));
        }
        self.columns.extend(other.columns);
        Ok(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Produces proximity feature tables for a base point set.
///
/// # Examples
///
/// ```
/// use geoprox::{Config, FeatureAggregator, FeatureSources, GeoPoint, PointSet};
///
/// let base = PointSet::from_points(vec![GeoPoint::new(37.5, 127.0)])?;
/// let cafes = PointSet::from_points(vec![GeoPoint::new(37.501, 127.001)])?;
///
/// let sources = FeatureSources::new()
///     .with("cafes", cafes)?
///     .with("bakeries", PointSet::empty())?;
///
/// let table = FeatureAggregator::new(Config::default()).aggregate(&base, &sources, 0.7)?;
/// assert_eq!(table.column_names(), vec!["cafes", "bakeries"]);
/// assert_eq!(table.counts("cafes"), Some(&[1][..]));
/// assert_eq!(table.counts("bakeries"), Some(&[0][..]));
/// # Ok::<(), geoprox::GeoproxError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureAggregator {
    config: Config,
}

impl FeatureAggregator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// One count column per source, in insertion order.
    pub fn aggregate<B, T>(
        &self,
        base: &PointSet<B>,
        sources: &FeatureSources<T>,
        radius_km: f64,
    ) -> Result<FeatureTable> {
        validate_radius_km(radius_km)?;
        self.config.validate()?;

        let mut table = FeatureTable::new(base.len());
        for (name, source) in sources.iter() {
            let counts = if source.is_empty() {
                log::debug!("Feature '{}' has no source points; filling zeros", name);
                vec![0; base.len()]
            } else {
                let index = SpatialIndex::build(source, &self.config)?;
                count_nearby(base, &index, radius_km)?
            };
            table.push_column(name, ColumnValues::Count(counts))?;
        }

        log::debug!(
            "Aggregated {} features over {} base points (radius {} km)",
            sources.len(),
            base.len(),
            radius_km
        );
        Ok(table)
    }

    /// Nearby store counts split into all stores, restaurants and cafés.
    ///
    /// The category predicates run against each store's attribute; either
    /// category may legitimately be empty.
    pub fn nearby_store_features<B, T, R, C>(
        &self,
        base: &PointSet<B>,
        stores: &PointSet<T>,
        radius_km: f64,
        is_restaurant: R,
        is_cafe: C,
    ) -> Result<FeatureTable>
    where
        T: Clone,
        R: FnMut(&T) -> bool,
        C: FnMut(&T) -> bool,
    {
        let sources = FeatureSources::new()
            .with(ALL_STORES_COLUMN, stores.clone())?
            .with(RESTAURANTS_COLUMN, stores.filter(is_restaurant))?
            .with(CAFES_COLUMN, stores.filter(is_cafe))?;
        self.aggregate(base, &sources, radius_km)
    }

    /// Distance to the nearest target (in the configured unit) and that
    /// target's label, for every base point.
    ///
    /// Unlike counting, a nearest distance has no meaningful value over an
    /// empty target set, so empty targets fail with `EmptyIndex`.
    pub fn assign_nearest<B, T>(
        &self,
        base: &PointSet<B>,
        targets: &PointSet<T>,
        distance_column: &str,
        label_column: &str,
    ) -> Result<FeatureTable>
    where
        T: Clone + Display,
    {
        let matches = nearest_join(base, targets, &self.config)?;

        let (distances, labels): (Vec<f64>, Vec<String>) = matches
            .into_iter()
            .map(|m| (m.distance, m.attribute.to_string()))
            .unzip();

        let mut table = FeatureTable::new(base.len());
        table.push_column(distance_column, ColumnValues::Distance(distances))?;
        table.push_column(label_column, ColumnValues::Label(labels))?;
        Ok(table)
    }

    /// Assign each base point to its nearest centroid.
    ///
    /// Centroids come from an external clustering step and are treated as
    /// ordinary points labelled by position.
    pub fn assign_clusters<B>(&self, base: &PointSet<B>, centroids: &[GeoPoint]) -> Result<FeatureTable> {
        let centroids = PointSet::enumerated(centroids.to_vec())?;
        self.assign_nearest(base, &centroids, CENTROID_DISTANCE_COLUMN, CENTROID_COLUMN)
    }
}
