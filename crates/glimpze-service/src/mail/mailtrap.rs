//! Mail delivery through the Mailtrap HTTP send API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use glimpze_core::config::MailConfig;
use glimpze_core::error::{AppError, ErrorKind};
use glimpze_core::result::AppResult;

use super::{MailMessage, Mailer};

/// HTTP request timeout for one send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends mail through Mailtrap. In sandbox mode messages are only logged.
#[derive(Clone)]
pub struct MailtrapMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_email: String,
    from_name: String,
    sandbox: bool,
}

impl std::fmt::Debug for MailtrapMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailtrapMailer")
            .field("api_url", &self.api_url)
            .field("from_email", &self.from_email)
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

impl MailtrapMailer {
    /// Creates a mailer. Outside sandbox mode an API key is required.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        if !config.sandbox && config.api_key.is_empty() {
            return Err(AppError::configuration(
                "mail.api_key is required when mail.sandbox is off",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            sandbox: config.sandbox,
        })
    }
}

#[async_trait]
impl Mailer for MailtrapMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        if self.sandbox {
            info!(
                to = %message.to_email,
                subject = %message.subject,
                "Sandbox mode: mail not sent"
            );
            return Ok(());
        }

        let payload = json!({
            "from": { "email": self.from_email, "name": self.from_name },
            "to": [{ "email": message.to_email, "name": message.to_name }],
            "subject": message.subject,
            "html": message.html,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Mail API request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Mail API rejected message");
            return Err(AppError::external_service(format!(
                "Mail API returned HTTP {}",
                status.as_u16()
            )));
        }

        info!(to = %message.to_email, "Mail sent");
        Ok(())
    }
}
