//! Data types shared by the star trend pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::TrendError;

/// The ordered set of rating levels a snapshot may carry.
///
/// Levels double as the weights of the average, so a level's numeric value
/// is meaningful and not just a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RatingScale {
    levels: Vec<u8>,
}

impl RatingScale {
    /// Builds a scale from arbitrary levels, sorting and de-duplicating them.
    pub fn new(levels: impl IntoIterator<Item = u8>) -> Result<Self, TrendError> {
        let mut levels: Vec<u8> = levels.into_iter().collect();
        levels.sort_unstable();
        levels.dedup();

        if levels.is_empty() {
            return Err(TrendError::InvalidConfig(
                "rating scale needs at least one level".into(),
            ));
        }

        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub fn contains(&self, rating: u8) -> bool {
        self.levels.binary_search(&rating).is_ok()
    }

    pub fn max(&self) -> u8 {
        self.levels[self.levels.len() - 1]
    }
}

impl Default for RatingScale {
    /// Archivo's star scale: zero to four stars.
    fn default() -> Self {
        Self {
            levels: (0..=4).collect(),
        }
    }
}

/// One dated rating of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<V> {
    version: V,
    rating: u8,
}

impl<V> Snapshot<V> {
    /// Creates a snapshot, rejecting ratings that are not part of `scale`.
    pub fn new(version: V, rating: u8, scale: &RatingScale) -> Result<Self, TrendError> {
        if !scale.contains(rating) {
            return Err(TrendError::RatingOutOfRange {
                rating,
                levels: scale.levels().to_vec(),
            });
        }
        Ok(Self { version, rating })
    }

    pub fn version(&self) -> &V {
        &self.version
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }
}

/// A tracked resource together with its snapshot history.
///
/// Snapshots are kept in ascending version order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource<V> {
    key: String,
    snapshots: Vec<Snapshot<V>>,
}

impl<V: Ord> Resource<V> {
    pub fn new(key: impl Into<String>, mut snapshots: Vec<Snapshot<V>>) -> Result<Self, TrendError> {
        let key = key.into();
        snapshots.sort_by(|a, b| a.version.cmp(&b.version));

        if snapshots.windows(2).any(|w| w[0].version == w[1].version) {
            return Err(TrendError::DuplicateVersion { resource: key });
        }

        Ok(Self { key, snapshots })
    }
}

impl<V> Resource<V> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshots, oldest first.
    pub fn snapshots(&self) -> &[Snapshot<V>] {
        &self.snapshots
    }
}

/// A strictly ascending sequence of checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Checkpoints<V> {
    points: Vec<V>,
}

impl<V: Ord> Checkpoints<V> {
    /// Sorts and de-duplicates arbitrary checkpoint values.
    pub fn from_unsorted(mut points: Vec<V>) -> Self {
        points.sort();
        points.dedup();
        Self { points }
    }

    pub(crate) fn from_ascending(points: Vec<V>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0] < w[1]));
        Self { points }
    }
}

impl<V> Checkpoints<V> {
    pub fn as_slice(&self) -> &[V] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&V> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&V> {
        self.points.last()
    }
}

/// Number of resources holding each level at one checkpoint.
///
/// Every level of the scale is present, zero when nobody holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: BTreeMap<u8, usize>,
}

impl Histogram {
    pub fn empty(scale: &RatingScale) -> Self {
        Self {
            counts: scale.levels().iter().map(|&level| (level, 0)).collect(),
        }
    }

    /// Counts one resource at `rating`. Ratings outside the scale are
    /// refused and reported with `false`.
    pub(crate) fn record(&mut self, rating: u8) -> bool {
        match self.counts.get_mut(&rating) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn count(&self, level: u8) -> usize {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    /// Total resources counted, across all levels.
    pub fn population(&self) -> usize {
        self.counts.values().sum()
    }

    /// Sum of level times count.
    pub fn weighted_sum(&self) -> u64 {
        self.counts
            .iter()
            .map(|(&level, &count)| level as u64 * count as u64)
            .sum()
    }

    /// `(level, count)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&level, &count)| (level, count))
    }
}

/// One histogram per checkpoint, in checkpoint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<V> {
    pub(crate) entries: Vec<(V, Histogram)>,
}

impl<V> Distribution<V> {
    pub fn entries(&self) -> &[(V, Histogram)] {
        &self.entries
    }

    pub fn histograms(&self) -> impl Iterator<Item = &Histogram> {
        self.entries.iter().map(|(_, histogram)| histogram)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything known about the population at one checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<V> {
    pub checkpoint: V,
    pub histogram: Histogram,
    pub population: usize,
    pub weighted_sum: u64,
    pub average: f64,
}

/// The full trend: the scale used and one point per checkpoint, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<V> {
    #[serde(rename = "levels")]
    pub scale: RatingScale,
    pub points: Vec<SeriesPoint<V>>,
}

impl<V> Series<V> {
    pub fn checkpoints(&self) -> impl Iterator<Item = &V> {
        self.points.iter().map(|p| &p.checkpoint)
    }

    pub fn averages(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.average).collect()
    }

    pub fn populations(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.population).collect()
    }

    /// Count of resources at `level` for every checkpoint.
    pub fn level_counts(&self, level: u8) -> Vec<usize> {
        self.points.iter().map(|p| p.histogram.count(level)).collect()
    }

    /// Population at the newest checkpoint, zero for an empty series.
    pub fn latest_population(&self) -> usize {
        self.points.last().map(|p| p.population).unwrap_or(0)
    }
}
