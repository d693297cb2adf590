//! Session registry and the login, refresh, and logout flows.

pub mod manager;
pub mod registry;

pub use manager::{LoginResult, SessionManager};
pub use registry::SessionRegistry;
