//! # glimpze-database
//!
//! Persistence for Glimpze: PostgreSQL connection management, the store
//! traits every service is written against, their PostgreSQL repositories,
//! and an in-memory implementation used by tests and local development.
//!
//! Every quota-gated mutation consumes its quota inside the same
//! transaction as the write it guards, so a failed write never costs quota
//! and an exhausted quota never leaves a partial write.

pub mod connection;
mod error;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use store::Stores;
