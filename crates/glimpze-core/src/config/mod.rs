//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod mail;
pub mod quota;
pub mod storage;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, RateLimitConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::mail::MailConfig;
pub use self::quota::{QuotaConfig, QuotaGrant};
pub use self::storage::{S3StorageConfig, StorageConfig};
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment name (`"development"`, `"production"`, ...).
    #[serde(default = "default_environment")]
    pub environment: String,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistent store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session registry backing store settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token and credential settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Daily action quota settings.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `GLIMPZE_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .set_default("environment", env)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GLIMPZE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Whether the application runs in production mode.
    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "prod" | "production")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            auth: AuthConfig::default(),
            quota: QuotaConfig::default(),
            storage: StorageConfig::default(),
            mail: MailConfig::default(),
            worker: WorkerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}
