//! Point-in-time lookup of a resource's rating.

use crate::trend::types::Resource;

/// Returns the rating of the newest snapshot strictly older than `checkpoint`,
/// or `None` when the resource had no snapshot yet.
pub fn latest_rating_before<V: Ord>(resource: &Resource<V>, checkpoint: &V) -> Option<u8> {
    resource
        .snapshots()
        .iter()
        .rev()
        .find(|snapshot| snapshot.version() < checkpoint)
        .map(|snapshot| snapshot.rating())
}

/// Remembers how far into a resource's history the previous lookup got.
///
/// Only valid while checkpoints are queried in non-decreasing order, which
/// lets every snapshot be visited at most once across a whole series.
#[derive(Debug)]
pub struct RatingCursor<'a, V> {
    resource: &'a Resource<V>,
    // number of snapshots strictly older than the last checkpoint seen
    seen: usize,
}

impl<'a, V: Ord> RatingCursor<'a, V> {
    pub fn new(resource: &'a Resource<V>) -> Self {
        Self { resource, seen: 0 }
    }

    pub fn rating_before(&mut self, checkpoint: &V) -> Option<u8> {
        let snapshots = self.resource.snapshots();
        while self.seen < snapshots.len() && snapshots[self.seen].version() < checkpoint {
            self.seen += 1;
        }
        self.seen
            .checked_sub(1)
            .map(|newest| snapshots[newest].rating())
    }
}
