//! # glimpze-storage
//!
//! Blob storage for post attachments. Supports S3-compatible object stores
//! (R2, MinIO, AWS) and an in-memory store for tests, plus the checks every
//! upload must pass before it reaches a store.

pub mod manager;
pub mod providers;
pub mod upload;

pub use manager::StorageManager;
pub use upload::{UploadPolicy, UploadedFile, ValidatedUpload};
