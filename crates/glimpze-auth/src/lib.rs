//! # glimpze-auth
//!
//! Authentication and authorization for Glimpze.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and policy enforcement
//! - `jwt`: access/refresh token minting and verification
//! - `session`: session registry and the login, refresh, and logout flows
//! - `token`: one-time activation tokens
//! - `cookies`: `Set-Cookie` values for the auth cookies
//! - `rbac`: role-precedence and ownership guards

pub mod cookies;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;
pub mod token;

pub use jwt::{Claims, TokenClass, TokenError, TokenIssuer, TokenPair, TokenVerifier};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::RoleGuard;
pub use session::{LoginResult, SessionManager, SessionRegistry};
pub use cookies::AuthCookies;
