use crate::email::{EmailError, EmailMessage, EmailProvider};
use async_trait::async_trait;
use tracing::info;

pub struct NullProvider;

impl NullProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for NullProvider {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        message.validate()?;

        let body_preview = message.body.chars().take(200).collect::<String>();

        let attachments = message
            .attachments
            .iter()
            .map(|a| format!("{} ({} bytes)", a.filename, a.data.len()))
            .collect::<Vec<_>>()
            .join(", ");

        // Log the email that would have been sent
        info!(
            "NULL EMAIL PROVIDER - Would send email:\n\
             From: {}\n\
             To: {}\n\
             Cc: {}\n\
             Reply-To: {}\n\
             Subject: {}\n\
             Attachments: {}\n\
             Body (first 200 chars): {}{}",
            message.from,
            message.to.join(", "),
            if message.cc.is_empty() { "(none)".to_string() } else { message.cc.join(", ") },
            message.reply_to.as_deref().unwrap_or("(none)"),
            message.subject,
            if attachments.is_empty() { "(none)" } else { attachments.as_str() },
            body_preview,
            if body_preview.len() >= 200 { "..." } else { "" }
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "Null Email Provider (Logging Only)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::Attachment;

    #[tokio::test]
    async fn test_null_provider_send_with_attachment() {
        let provider = NullProvider::new();
        let message = EmailMessage::new("test@example.com", "sender@example.com", "Posters")
            .with_cc(vec!["cc@example.com".to_string()])
            .with_text("Test body content")
            .with_attachment(Attachment::png("poster.png", vec![1, 2, 3]));

        assert!(provider.send_email(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_null_provider_rejects_invalid_recipient() {
        let provider = NullProvider::new();
        let message = EmailMessage::new("nobody", "sender@example.com", "Posters");

        let result = provider.send_email(message).await;
        assert!(matches!(result, Err(EmailError::InvalidEmail(_))));
    }

    #[test]
    fn test_null_provider_name() {
        let provider = NullProvider::new();
        assert_eq!(provider.name(), "Null Email Provider (Logging Only)");
    }
}
