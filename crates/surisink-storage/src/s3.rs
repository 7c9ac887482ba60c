use std::time::Instant;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration, Tag, Tagging};
use aws_sdk_s3::Client;
use surisink_core::FileRecord;

use crate::keys::object_key;
use crate::metadata::{object_metadata, object_tags};
use crate::traits::{ObjectSink, StorageError, StorageResult};

/// Region that must not be sent as a location constraint on bucket creation.
const DEFAULT_REGION: &str = "us-east-1";

/// S3-compatible object sink
#[derive(Clone)]
pub struct S3Sink {
    client: Client,
    bucket: String,
    prefix: String,
    region: String,
    endpoint_url: String,
}

impl S3Sink {
    /// Create a new S3Sink instance
    ///
    /// # Arguments
    /// * `endpoint` - host[:port] or full URL of the S3-compatible service
    ///   (e.g., "localhost:9000" for MinIO)
    /// * `use_ssl` - scheme used when `endpoint` carries none
    /// * `prefix` - first component of every object key
    pub async fn new(
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        bucket: String,
        prefix: String,
        region: String,
        use_ssl: bool,
    ) -> StorageResult<Self> {
        if bucket.is_empty() {
            return Err(StorageError::ConfigError("bucket name is empty".to_string()));
        }

        let endpoint_url = endpoint_url(endpoint, use_ssl);
        let credentials = Credentials::new(access_key, secret_key, None, None, "surisink-static");

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials)
            // Attempts are counted by the caller's retry loop.
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        // Path-style addressing keeps MinIO and other self-hosted services working.
        let config = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint_url.clone())
            .force_path_style(true)
            .build();

        Ok(S3Sink {
            client: Client::from_conf(config),
            bucket,
            prefix,
            region,
            endpoint_url,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    async fn put_tags(&self, key: &str, record: &FileRecord) -> StorageResult<()> {
        let tag_set = object_tags(record)
            .into_iter()
            .map(|(k, v)| Tag::builder().key(k).value(v).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::TaggingFailed(e.to_string()))?;
        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| StorageError::TaggingFailed(e.to_string()))?;

        self.client
            .put_object_tagging()
            .bucket(&self.bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| StorageError::TaggingFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ObjectSink for S3Sink {
    async fn upload(&self, record: &FileRecord) -> StorageResult<String> {
        let key = object_key(
            &self.prefix,
            &record.observed_at,
            &record.flow_id,
            &record.content_hash,
            &record.original_name,
        );
        let start = Instant::now();

        let body = ByteStream::from_path(&record.path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to read {}: {}",
                record.path.display(),
                e
            ))
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(&record.mime_type)
            .set_metadata(Some(object_metadata(record).into_iter().collect()))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(
                    error = %DisplayErrorContext(&e),
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = record.size_bytes,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 put failed"
                );
                StorageError::UploadFailed(DisplayErrorContext(&e).to_string())
            })?;

        self.put_tags(&key, record).await?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = record.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put and tagging successful"
        );

        Ok(key)
    }

    async fn ensure_bucket(&self) -> StorageResult<()> {
        let head = self.client.head_bucket().bucket(&self.bucket).send().await;
        let err = match head {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket, "Bucket exists");
                return Ok(());
            }
            Err(err) => err,
        };

        let missing = err
            .as_service_error()
            .map(|e| e.is_not_found())
            .unwrap_or(false);
        if !missing {
            return Err(StorageError::BucketFailed(
                DisplayErrorContext(&err).to_string(),
            ));
        }

        let mut create = self.client.create_bucket().bucket(&self.bucket);
        if self.region != DEFAULT_REGION {
            create = create.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        match create.send().await {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket, "Bucket created");
                Ok(())
            }
            Err(err) => {
                let already_there = err
                    .as_service_error()
                    .map(|e| e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists())
                    .unwrap_or(false);
                if already_there {
                    Ok(())
                } else {
                    Err(StorageError::BucketFailed(
                        DisplayErrorContext(&err).to_string(),
                    ))
                }
            }
        }
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Full endpoint URL; a bare `host[:port]` gets a scheme from `use_ssl`.
fn endpoint_url(endpoint: &str, use_ssl: bool) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else if use_ssl {
        format!("https://{}", endpoint)
    } else {
        format!("http://{}", endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_scheme_from_ssl_flag() {
        assert_eq!(endpoint_url("localhost:9000", false), "http://localhost:9000");
        assert_eq!(endpoint_url("s3.example.com", true), "https://s3.example.com");
    }

    #[test]
    fn explicit_scheme_kept() {
        assert_eq!(endpoint_url("http://minio:9000/", true), "http://minio:9000");
        assert_eq!(endpoint_url("https://s3.amazonaws.com", false), "https://s3.amazonaws.com");
    }

    #[tokio::test]
    async fn empty_bucket_rejected() {
        let result = S3Sink::new(
            "localhost:9000",
            "ak",
            "sk",
            String::new(),
            "suricata".to_string(),
            DEFAULT_REGION.to_string(),
            false,
        )
        .await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
