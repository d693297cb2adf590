//! Core type definitions used across the Glimpze workspace.

pub mod pagination;

pub use pagination::PageRequest;
