use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use super::SeriesSink;

/// Uploads bodies to an S3 bucket, under an optional key prefix.
pub struct S3Sink {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3Sink {
    /// Creates a sink using the ambient AWS configuration (env vars, instance
    /// profile, etc.).
    pub async fn from_env(bucket: String, prefix: String) -> Self {
        let config = aws_config::load_from_env().await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket,
            prefix,
        }
    }

    fn key(&self, name: &str) -> String {
        object_key(&self.prefix, name)
    }
}

fn object_key(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

#[async_trait]
impl SeriesSink for S3Sink {
    async fn put(&self, name: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let key = self.key(name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await?;

        info!(bucket = %self.bucket, key = %key, "Uploaded to S3");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("", "a.json"), "a.json");
        assert_eq!(object_key("stats", "a.json"), "stats/a.json");
        assert_eq!(object_key("/stats/", "a.json"), "stats/a.json");
    }
}
