//! Access/refresh token minting and verification.

pub mod claims;
pub mod error;
pub mod issuer;
pub mod verifier;

pub use claims::{Claims, TokenClass};
pub use error::TokenError;
pub use issuer::{IssuedToken, TokenIssuer, TokenPair};
pub use verifier::TokenVerifier;
