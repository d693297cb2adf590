//! User domain entities.

pub mod limit;
pub mod model;
pub mod profile;
pub mod role;

pub use limit::{QuotaKind, UserLimit};
pub use model::{NewUser, User};
pub use profile::UserProfile;
pub use role::{ADMIN_ROLE, DEFAULT_ROLE, MODERATOR_ROLE, Role};
