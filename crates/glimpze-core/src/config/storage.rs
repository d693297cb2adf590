//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Blob provider: `"s3"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Lifetime of presigned read URLs in seconds.
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_seconds: u64,
    /// Maximum size of a single attachment in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Maximum number of attachments per post.
    #[serde(default = "default_max_files")]
    pub max_files_per_post: usize,
    /// Accepted attachment extensions (lowercase, without dot).
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            presign_ttl_seconds: default_presign_ttl(),
            max_file_size_bytes: default_max_file_size(),
            max_files_per_post: default_max_files(),
            allowed_extensions: default_allowed_extensions(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration (AWS, R2, MinIO).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// Endpoint URL for non-AWS services. Empty uses the AWS default.
    #[serde(default)]
    pub endpoint: String,
    /// Region (`"auto"` for R2).
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (MinIO).
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: false,
        }
    }
}

fn default_provider() -> String {
    "s3".to_string()
}

fn default_presign_ttl() -> u64 {
    15 * 60
}

fn default_max_file_size() -> u64 {
    4 << 20
}

fn default_max_files() -> usize {
    4
}

fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "webp"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_region() -> String {
    "auto".to_string()
}
