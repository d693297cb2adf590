//! One-time user tokens (account activation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Purpose a user token was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Confirms ownership of the registration email.
    Activation,
}

impl TokenScope {
    /// Value stored in the `scope` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activation => "activation",
        }
    }
}

/// A minted token. Only `hash` is persisted, against the owning user's row;
/// `plaintext` is handed to the user once and never stored.
#[derive(Debug, Clone)]
pub struct UserToken {
    /// Value sent to the user.
    pub plaintext: String,
    /// SHA-256 of `plaintext`.
    pub hash: Vec<u8>,
    /// Expiry instant.
    pub expiry: DateTime<Utc>,
    /// Purpose.
    pub scope: TokenScope,
}
