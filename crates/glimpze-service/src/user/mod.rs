//! User lookup, profiles, and role administration.

pub mod service;

pub use service::{UserDetails, UserService};
