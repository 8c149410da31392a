//! Star rating trends over time.
//!
//! Checkpoints are generated backwards from "now", every resource is
//! resolved to the rating it held strictly before each checkpoint, the
//! ratings are tallied into one histogram per checkpoint, and the
//! population-weighted average is derived from each histogram.

pub mod average;
pub mod checkpoints;
pub mod distribution;
pub mod resolver;
pub mod series;
pub mod types;

pub use checkpoints::{CheckpointPlan, StepBack};
pub use series::{build_series, star_trend};
pub use types::{
    Checkpoints, Distribution, Histogram, RatingScale, Resource, Series, SeriesPoint, Snapshot,
};
