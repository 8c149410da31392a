//! Error types for the star trend core.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrendError {
    /// A checkpoint plan or rating scale that cannot produce a meaningful series.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Rating {rating} is not a level of the scale {levels:?}")]
    RatingOutOfRange { rating: u8, levels: Vec<u8> },

    #[error("Resource '{resource}' has more than one snapshot with the same version")]
    DuplicateVersion { resource: String },
}
