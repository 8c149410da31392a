use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::SeriesSink;

/// Writes bodies as files into a directory, creating it when missing.
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SeriesSink for LocalDirSink {
    async fn put(&self, name: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("cannot create {}", self.dir.display()))?;

        let path = self.dir.join(name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;

        debug!(path = %path.display(), bytes = body.len(), "File written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[tokio::test]
    async fn test_put_creates_dir_and_file() {
        let dir = env::temp_dir().join("star_trend_test_sink");
        let _ = fs::remove_dir_all(&dir); // clean up any prior run

        let sink = LocalDirSink::new(&dir);
        sink.put("a.json", b"{}".to_vec(), "application/json")
            .await
            .unwrap();

        assert_eq!(fs::read(dir.join("a.json")).unwrap(), b"{}");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_file() {
        let dir = env::temp_dir().join("star_trend_test_sink_overwrite");
        let _ = fs::remove_dir_all(&dir);

        let sink = LocalDirSink::new(&dir);
        sink.put("a.csv", b"old".to_vec(), "text/csv").await.unwrap();
        sink.put("a.csv", b"new".to_vec(), "text/csv").await.unwrap();

        assert_eq!(fs::read_to_string(dir.join("a.csv")).unwrap(), "new");

        fs::remove_dir_all(&dir).unwrap();
    }
}
