//! Destinations a computed trend can be persisted to.

mod local;
mod s3;

pub use local::LocalDirSink;
pub use s3::S3Sink;

use anyhow::Result;
use async_trait::async_trait;

/// Stores named, already encoded bodies.
#[async_trait]
pub trait SeriesSink: Send + Sync {
    async fn put(&self, name: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}

/// Content type for a file name, looking through a trailing `.gz`.
pub fn content_type_for(name: &str) -> &'static str {
    if name.ends_with(".gz") {
        "application/gzip"
    } else if name.ends_with(".json") {
        "application/json"
    } else if name.ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    }
}
