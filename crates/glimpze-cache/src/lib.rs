//! # glimpze-cache
//!
//! Cache provider implementations for Glimpze. Two modes are supported:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//!   with an expiry per entry
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. The session
//! registry is the main consumer, so every write carries its own TTL.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
