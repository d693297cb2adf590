//! # glimpze-core
//!
//! Core crate for Glimpze. Contains configuration schemas, the traits
//! implemented by the cache and blob storage crates, pagination types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Glimpze crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
