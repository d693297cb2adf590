//! Job implementations.

pub mod replenish;

pub use replenish::{ReplenishJob, ReplenishReport};
