//! Ordered point collections with aligned per-point attributes.

use crate::compute::validation::validate_points;
use crate::error::{GeoproxError, Result};
use crate::types::GeoPoint;

/// An ordered sequence of validated points plus one attribute per point.
///
/// Attributes are opaque to the engine: a category label, a row identifier,
/// a station name. Order only matters for aligning output rows with input
/// rows.
///
/// # Examples
///
/// ```
/// use geoprox::{GeoPoint, PointSet};
///
/// let stores = PointSet::new(
///     vec![GeoPoint::new(37.50, 127.03), GeoPoint::new(37.51, 127.04)],
///     vec!["cafe", "restaurant"],
/// )?;
///
/// let cafes = stores.filter(|kind| *kind == "cafe");
/// assert_eq!(cafes.len(), 1);
/// # Ok::<(), geoprox::GeoproxError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet<T> {
    points: Vec<GeoPoint>,
    attributes: Vec<T>,
}

impl<T> PointSet<T> {
    /// Build a set from aligned sequences.
    ///
    /// Fails with `IndexContract` on a length mismatch and with
    /// `InvalidCoordinate` on the first invalid point.
    pub fn new(points: Vec<GeoPoint>, attributes: Vec<T>) -> Result<Self> {
        if points.len() != attributes.len() {
            return Err(GeoproxError::IndexContract(format!(
                "{} points but {} attributes",
                points.len(),
                attributes.len()
            )));
        }
        validate_points(&points)?;
        Ok(Self { points, attributes })
    }

    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (GeoPoint, T)>,
    {
        let (points, attributes): (Vec<_>, Vec<_>) = records.into_iter().unzip();
        Self::new(points, attributes)
    }

    /// An empty set. Valid as a feature source; not indexable.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[inline]
    pub fn attributes(&self) -> &[T] {
        &self.attributes
    }

    pub fn get(&self, index: usize) -> Option<(&GeoPoint, &T)> {
        Some((self.points.get(index)?, self.attributes.get(index)?))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&GeoPoint, &T)> {
        self.points.iter().zip(self.attributes.iter())
    }

    /// Keep the points whose attribute matches `predicate`, preserving order.
    ///
    /// Returns a new set; `self` is untouched.
    pub fn filter<F>(&self, mut predicate: F) -> PointSet<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut points = Vec::new();
        let mut attributes = Vec::new();
        for (point, attr) in self.iter() {
            if predicate(attr) {
                points.push(*point);
                attributes.push(attr.clone());
            }
        }
        PointSet { points, attributes }
    }

    pub fn map_attributes<U, F>(self, f: F) -> PointSet<U>
    where
        F: FnMut(T) -> U,
    {
        PointSet {
            points: self.points,
            attributes: self.attributes.into_iter().map(f).collect(),
        }
    }

    pub fn into_parts(self) -> (Vec<GeoPoint>, Vec<T>) {
        (self.points, self.attributes)
    }
}

impl PointSet<usize> {
    /// Points labelled by their position, e.g. cluster centroids.
    pub fn enumerated(points: Vec<GeoPoint>) -> Result<Self> {
        let attributes = (0..points.len()).collect();
        Self::new(points, attributes)
    }
}

impl PointSet<()> {
    pub fn from_points(points: Vec<GeoPoint>) -> Result<Self> {
        let attributes = vec![(); points.len()];
        Self::new(points, attributes)
    }
}

impl<T> Default for PointSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointSet<&'static str> {
        PointSet::new(
            vec![
                GeoPoint::new(37.50, 127.00),
                GeoPoint::new(37.51, 127.01),
                GeoPoint::new(37.52, 127.02),
            ],
            vec!["cafe", "restaurant", "cafe"],
        )
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_is_contract_error() {
        let err = PointSet::new(vec![GeoPoint::new(37.5, 127.0)], vec!["a", "b"]).unwrap_err();
        assert!(matches!(err, GeoproxError::IndexContract(_)));
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let err = PointSet::new(
            vec![GeoPoint::new(37.5, 127.0), GeoPoint::new(f64::NAN, 127.0)],
            vec![1, 2],
        )
        .unwrap_err();
        assert!(matches!(err, GeoproxError::InvalidCoordinate(_)));
    }

    #[test]
    fn test_filter_preserves_order_and_source() {
        let set = sample();
        let cafes = set.filter(|kind| *kind == "cafe");

        assert_eq!(cafes.len(), 2);
        assert_eq!(cafes.points()[0], GeoPoint::new(37.50, 127.00));
        assert_eq!(cafes.points()[1], GeoPoint::new(37.52, 127.02));
        assert_eq!(set.len(), 3);

        let none = set.filter(|kind| *kind == "bakery");
        assert!(none.is_empty());
    }

    #[test]
    fn test_from_records_and_get() {
        let set = PointSet::from_records(vec![
            (GeoPoint::new(37.5, 127.0), "A"),
            (GeoPoint::new(37.6, 127.1), "B"),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1), Some((&GeoPoint::new(37.6, 127.1), &"B")));
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_enumerated_and_map() {
        let centroids =
            PointSet::enumerated(vec![GeoPoint::new(37.5, 127.0), GeoPoint::new(37.6, 127.1)])
                .unwrap();
        assert_eq!(centroids.attributes(), &[0, 1]);

        let labelled = centroids.map_attributes(|i| format!("cluster-{}", i));
        assert_eq!(labelled.attributes()[1], "cluster-1");
    }

    #[test]
    fn test_empty_set() {
        let set: PointSet<String> = PointSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.iter().len(), 0);
    }
}
