//! Password policy enforcement for new passwords.

use glimpze_core::config::AuthConfig;
use glimpze_core::error::AppError;

/// Validates passwords against the configured length and strength rules.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
    /// Maximum password length in bytes (Argon2 input bound).
    max_length: usize,
    /// Minimum zxcvbn score; 0 disables the check.
    min_strength: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
            min_strength: config.password_min_strength.min(4),
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if password.len() > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be at most {} bytes long",
                self.max_length
            )));
        }

        if self.min_strength > 0 {
            let estimate = zxcvbn::zxcvbn(password, &[]);
            if (estimate.score() as u8) < self.min_strength {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password with more entropy.",
                ));
            }
        }

        Ok(())
    }
}
