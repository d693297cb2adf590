//! Token verification: signature, algorithm, expiry, issuer and audience.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use glimpze_core::config::AuthConfig;
use glimpze_core::error::AppError;

use super::claims::{Claims, TokenClass};
use super::error::TokenError;
use super::issuer::check_secrets;

/// Verifies tokens of either class against that class's secret.
#[derive(Clone)]
pub struct TokenVerifier {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        check_secrets(config)?;

        // Only HS256 is accepted; `none` and asymmetric algorithms fail.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Ok(Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        })
    }

    /// Decodes and validates a token of the given class.
    pub fn verify(&self, token: &str, class: TokenClass) -> Result<Claims, TokenError> {
        let key = match class {
            TokenClass::Access => &self.access_key,
            TokenClass::Refresh => &self.refresh_key,
        };
        let data = decode::<Claims>(token, key, &self.validation)?;
        Ok(data.claims)
    }
}
