//! Background tasks for Glimpze.
//!
//! This crate provides:
//! - The quota replenishment sweep over every user's ledger row
//! - A runner that fires the sweep at local midnight and then on a fixed
//!   interval until the shutdown signal is received

pub mod jobs;
pub mod runner;

pub use jobs::{ReplenishJob, ReplenishReport};
pub use runner::ReplenishRunner;
