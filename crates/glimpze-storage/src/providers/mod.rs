//! Blob store providers.

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

#[cfg(feature = "memory")]
pub use memory::MemoryBlobStore;
#[cfg(feature = "s3")]
pub use s3::S3BlobStore;
