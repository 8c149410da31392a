//! Population-weighted average rating per checkpoint.

use crate::trend::types::{Distribution, Histogram};

/// Weighted mean level of a histogram. An empty population averages to 0.0.
pub fn average_rating(histogram: &Histogram) -> f64 {
    let population = histogram.population();
    if population == 0 {
        0.0
    } else {
        histogram.weighted_sum() as f64 / population as f64
    }
}

/// One average per checkpoint, aligned with the distribution's order.
pub fn average_ratings<V>(distribution: &Distribution<V>) -> Vec<f64> {
    distribution.histograms().map(average_rating).collect()
}
