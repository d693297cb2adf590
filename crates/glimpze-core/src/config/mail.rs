//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Mail delivery settings (Mailtrap HTTP API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// API token for the send endpoint.
    #[serde(default)]
    pub api_key: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Send endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// When set, messages are logged instead of sent.
    #[serde(default = "default_true")]
    pub sandbox: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            api_url: default_api_url(),
            sandbox: true,
        }
    }
}

fn default_from_email() -> String {
    "no-reply@glimpze.local".to_string()
}

fn default_from_name() -> String {
    "Glimpze".to_string()
}

fn default_api_url() -> String {
    "https://send.api.mailtrap.io/api/send".to_string()
}

fn default_true() -> bool {
    true
}
