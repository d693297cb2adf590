//! Outbound mail.
//!
//! [`MailtrapMailer`] talks to the Mailtrap send API; [`OutboxMailer`]
//! keeps messages in memory for tests and local runs.

pub mod mailtrap;
pub mod outbox;
pub mod templates;

use async_trait::async_trait;
use serde::Serialize;

use glimpze_core::result::AppResult;

pub use mailtrap::MailtrapMailer;
pub use outbox::OutboxMailer;

/// A rendered message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    /// Recipient address.
    pub to_email: String,
    /// Recipient display name.
    pub to_name: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Delivers mail messages.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    /// Send one message.
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}
