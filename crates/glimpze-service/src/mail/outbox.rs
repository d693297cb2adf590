//! In-memory mailer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;

use super::{MailMessage, Mailer};

/// Collects messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct OutboxMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    failing: bool,
}

impl OutboxMailer {
    /// An outbox that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox that rejects every message.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Every message accepted so far, oldest first.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        if self.failing {
            return Err(AppError::external_service("Outbox is configured to fail"));
        }
        debug!(to = %message.to_email, "Mail queued in outbox");
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());
        Ok(())
    }
}
