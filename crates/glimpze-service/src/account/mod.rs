//! Registration and activation.

pub mod service;

pub use service::{AccountService, Registration};
