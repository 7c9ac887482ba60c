#[cfg(feature = "storage-s3")]
use crate::S3Sink;
use crate::{ObjectSink, StorageError, StorageResult};
use std::sync::Arc;
use surisink_core::S3Config;

/// Create the object sink based on configuration
pub async fn create_sink(config: &S3Config, prefix: &str) -> StorageResult<Arc<dyn ObjectSink>> {
    if config.endpoint.is_empty() {
        return Err(StorageError::ConfigError(
            "S3_ENDPOINT not configured".to_string(),
        ));
    }
    if config.bucket.is_empty() {
        return Err(StorageError::ConfigError(
            "S3_BUCKET not configured".to_string(),
        ));
    }

    build(config, prefix).await
}

#[cfg(feature = "storage-s3")]
async fn build(config: &S3Config, prefix: &str) -> StorageResult<Arc<dyn ObjectSink>> {
    let sink = S3Sink::new(
        &config.endpoint,
        &config.access_key,
        &config.secret_key,
        config.bucket.clone(),
        prefix.to_string(),
        config.region.clone(),
        config.use_ssl,
    )
    .await?;

    tracing::info!(
        endpoint = %sink.endpoint_url(),
        bucket = %config.bucket,
        region = %config.region,
        "S3 sink initialized"
    );

    Ok(Arc::new(sink))
}

#[cfg(not(feature = "storage-s3"))]
async fn build(_config: &S3Config, _prefix: &str) -> StorageResult<Arc<dyn ObjectSink>> {
    Err(StorageError::ConfigError(
        "S3 sink not available (storage-s3 feature not enabled)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str, bucket: &str) -> S3Config {
        S3Config {
            endpoint: endpoint.to_string(),
            access_key: "minio".to_string(),
            secret_key: "minio123".to_string(),
            bucket: bucket.to_string(),
            use_ssl: false,
            region: "us-east-1".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_endpoint_rejected() {
        let result = create_sink(&config("", "files"), "suricata").await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn missing_bucket_rejected() {
        let result = create_sink(&config("localhost:9000", ""), "suricata").await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn builds_s3_sink_without_network() {
        let sink = create_sink(&config("localhost:9000", "files"), "suricata")
            .await
            .unwrap();
        assert_eq!(sink.bucket(), "files");
    }
}
