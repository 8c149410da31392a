pub mod chart;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod sink;
pub mod trend;

pub use error::TrendError;
