//! Outbound email

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

#[automock]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "email delivered to log"
        );

        Ok(())
    }
}

/// The message carrying a login code.
#[must_use]
pub fn otp_message(to: &str, name: &str, code: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your OTP Code".to_string(),
        body: format!(
            "Hello {name},\n\nYour OTP code is {code}.\nIt will expire in 5 minutes.\n"
        ),
    }
}
