use async_trait::async_trait;

/// Outbound email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the confirm-your-email message. `link` is the full verification
    /// URL the recipient should follow.
    async fn send_verification(&self, to: &str, name: &str, link: &str)
    -> Result<(), MailerError>;
}

/// Mail transport errors.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Message build failed: {0}")]
    Message(String),

    #[error("Transport failed: {0}")]
    Transport(String),
}
