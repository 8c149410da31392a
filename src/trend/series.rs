//! Composition of checkpoints, histograms and averages into a [`Series`].

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::TrendError;
use crate::trend::average::average_ratings;
use crate::trend::checkpoints::CheckpointPlan;
use crate::trend::distribution::group_by_rating;
use crate::trend::types::{Checkpoints, RatingScale, Resource, Series, SeriesPoint};

/// Evaluates `resources` at every checkpoint.
///
/// `resources` must not change while this runs; the output depends only on
/// them and on `checkpoints`. Fails when a snapshot rating is not a level
/// of `scale`.
pub fn build_series<V: Ord + Clone>(
    resources: &[Resource<V>],
    checkpoints: &Checkpoints<V>,
    scale: &RatingScale,
) -> Result<Series<V>, TrendError> {
    let distribution = group_by_rating(resources, checkpoints, scale)?;
    let averages = average_ratings(&distribution);

    let points = distribution
        .entries
        .into_iter()
        .zip(averages)
        .map(|((checkpoint, histogram), average)| SeriesPoint {
            population: histogram.population(),
            weighted_sum: histogram.weighted_sum(),
            average,
            checkpoint,
            histogram,
        })
        .collect();

    Ok(Series {
        scale: scale.clone(),
        points,
    })
}

/// Star trend over calendar time, ending at `now`.
#[tracing::instrument(skip(resources, scale), fields(resources = resources.len()))]
pub fn star_trend(
    resources: &[Resource<DateTime<Utc>>],
    plan: &CheckpointPlan,
    scale: &RatingScale,
    now: DateTime<Utc>,
) -> Result<Series<DateTime<Utc>>, TrendError> {
    let checkpoints = plan.dates(now)?;
    let series = build_series(resources, &checkpoints, scale)?;

    info!(
        checkpoints = series.points.len(),
        latest_population = series.latest_population(),
        "Star trend computed"
    );
    Ok(series)
}
