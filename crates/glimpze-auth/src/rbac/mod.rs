//! Role-precedence and ownership guards.

pub mod guard;

pub use guard::RoleGuard;
