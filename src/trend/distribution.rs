//! Per-checkpoint rating histograms over a whole resource collection.

use tracing::debug;

use crate::error::TrendError;
use crate::trend::resolver::RatingCursor;
use crate::trend::types::{Checkpoints, Distribution, Histogram, RatingScale, Resource};

/// Counts, for each checkpoint, how many resources held each rating level.
///
/// Resources without a snapshot before a checkpoint are left out of that
/// checkpoint entirely. Resources are assumed never to lose snapshots, so
/// the population can only grow from one checkpoint to the next.
///
/// Every snapshot rating must be a level of `scale`; otherwise nothing is
/// tallied and `RatingOutOfRange` is returned.
///
/// Each resource's cursor carries over from one checkpoint to the next, so
/// this relies on `checkpoints` being ascending and walks them in order.
pub fn group_by_rating<V: Ord + Clone>(
    resources: &[Resource<V>],
    checkpoints: &Checkpoints<V>,
    scale: &RatingScale,
) -> Result<Distribution<V>, TrendError> {
    check_ratings(resources, scale)?;

    let mut cursors: Vec<RatingCursor<'_, V>> = resources.iter().map(RatingCursor::new).collect();
    let mut entries: Vec<(V, Histogram)> = Vec::with_capacity(checkpoints.len());

    for checkpoint in checkpoints.iter() {
        let mut histogram = Histogram::empty(scale);

        for cursor in cursors.iter_mut() {
            let Some(rating) = cursor.rating_before(checkpoint) else {
                continue;
            };
            let recorded = histogram.record(rating);
            debug_assert!(recorded, "ratings were checked against the scale");
        }

        if let Some((_, previous)) = entries.last() {
            debug_assert!(
                previous.population() <= histogram.population(),
                "population shrank between checkpoints"
            );
        }

        debug!(population = histogram.population(), "Checkpoint tallied");
        entries.push((checkpoint.clone(), histogram));
    }

    Ok(Distribution { entries })
}

/// Rejects resources whose snapshots were rated on a different scale.
fn check_ratings<V>(resources: &[Resource<V>], scale: &RatingScale) -> Result<(), TrendError> {
    for resource in resources {
        if let Some(snapshot) = resource
            .snapshots()
            .iter()
            .find(|snapshot| !scale.contains(snapshot.rating()))
        {
            debug!(resource = resource.key(), "Snapshot rating outside the scale");
            return Err(TrendError::RatingOutOfRange {
                rating: snapshot.rating(),
                levels: scale.levels().to_vec(),
            });
        }
    }
    Ok(())
}
