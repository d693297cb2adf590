//! S3-compatible object storage provider.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use glimpze_core::config::S3StorageConfig;
use glimpze_core::error::{AppError, ErrorKind};
use glimpze_core::result::AppResult;
use glimpze_core::traits::BlobStore;

/// S3-compatible blob store.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Build a client from configuration.
    ///
    /// Static credentials are used when both keys are set; otherwise the
    /// standard AWS provider chain (environment, profile, instance role)
    /// is consulted.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 blob store"
        );

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style);

        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }
        if !config.access_key.is_empty() && !config.secret_key.is_empty() {
            builder = builder.credentials_provider(Credentials::new(
                &config.access_key,
                &config.secret_key,
                None,
                None,
                "glimpze-config",
            ));
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }

    fn map_err<E>(context: &'static str) -> impl FnOnce(E) -> AppError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |e| AppError::with_source(ErrorKind::Storage, context, e)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(Self::map_err("Failed to upload object"))?;

        debug!(key, size, "Uploaded object");
        Ok(())
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        let presigning =
            PresigningConfig::expires_in(expires_in).map_err(Self::map_err("Invalid presign TTL"))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(Self::map_err("Failed to presign object"))?;

        Ok(request.uri().to_string())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(Self::map_err("Failed to delete object"))?;

        debug!(key, "Deleted object");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| true)
            .map_err(Self::map_err("Bucket is not reachable"))
    }
}
