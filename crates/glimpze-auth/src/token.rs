//! One-time activation tokens.
//!
//! The plaintext goes out by email once; only its SHA-256 digest is stored.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

use glimpze_entity::token::{TokenScope, UserToken};

/// Random bytes behind every plaintext token.
const TOKEN_BYTES: usize = 16;

/// Mints an activation token valid for `ttl`.
pub fn generate_activation(ttl: Duration) -> UserToken {
    let mut raw = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut raw);
    let plaintext = URL_SAFE_NO_PAD.encode(raw);

    UserToken {
        hash: hash_token(&plaintext),
        plaintext,
        expiry: Utc::now() + ttl,
        scope: TokenScope::Activation,
    }
}

/// Digest under which a plaintext token is stored and looked up.
pub fn hash_token(plaintext: &str) -> Vec<u8> {
    Sha256::digest(plaintext.as_bytes()).to_vec()
}
