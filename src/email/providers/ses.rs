use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sesv2::{
    Client,
    config::{Credentials, Region},
    primitives::Blob,
    types::{Destination, EmailContent, RawMessage},
};
use tracing::{debug, error};

use crate::email::{EmailError, EmailMessage, EmailProvider, SesConfig, mime};

pub struct SesProvider {
    client: Client,
}

impl SesProvider {
    pub async fn new(config: &SesConfig) -> Result<Self, EmailError> {
        let mut aws_config_builder = aws_config::defaults(BehaviorVersion::latest());

        // Set region if provided, otherwise use default from environment
        if let Some(region) = &config.region {
            aws_config_builder = aws_config_builder.region(Region::new(region.clone()));
        }

        // If credentials are provided, use them. Otherwise, use the default provider chain
        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "greetings-poster-ses-provider",
            );
            aws_config_builder = aws_config_builder.credentials_provider(credentials);
        }

        let aws_config = aws_config_builder.load().await;
        let client = Client::new(&aws_config);

        Ok(Self { client })
    }
}

/// Greetings always travel as raw MIME so the posters can be attached.
fn raw_content(message: &EmailMessage) -> Result<EmailContent, EmailError> {
    let raw = RawMessage::builder()
        .data(Blob::new(mime::build_raw_message(message)))
        .build()
        .map_err(|e| EmailError::MessageError(e.to_string()))?;

    Ok(EmailContent::builder().raw(raw).build())
}

#[async_trait]
impl EmailProvider for SesProvider {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        message.validate()?;
        debug!(
            "Sending email via SES to: {:?} (cc: {:?}, {} attachments)",
            message.to,
            message.cc,
            message.attachments.len()
        );

        let destination = Destination::builder()
            .set_to_addresses(Some(message.to.clone()))
            .set_cc_addresses((!message.cc.is_empty()).then(|| message.cc.clone()))
            .build();

        let content = raw_content(&message)?;

        let mut send_email_builder = self
            .client
            .send_email()
            .from_email_address(&message.from)
            .destination(destination)
            .content(content);

        if let Some(reply_to) = &message.reply_to {
            send_email_builder = send_email_builder.reply_to_addresses(reply_to);
        }

        match send_email_builder.send().await {
            Ok(output) => {
                debug!(
                    "Email sent successfully. Message ID: {:?}",
                    output.message_id()
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to send email via SES: {}", e);
                Err(EmailError::AwsError(e.to_string()))
            }
        }
    }

    fn name(&self) -> &str {
        "Amazon SES"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::Attachment;

    #[test]
    fn test_message_is_sent_as_raw_mime() {
        let message = EmailMessage::new("team@example.com", "HR <hr@example.com>", "Posters")
            .with_text("See attached.")
            .with_attachment(Attachment::png("birthday_A_2024-03-15.png", vec![1, 2, 3]));

        let content = raw_content(&message).unwrap();
        assert!(content.simple().is_none());
        let raw = content.raw().unwrap();
        let data = std::str::from_utf8(raw.data().as_ref()).unwrap();
        assert!(data.starts_with("From: HR <hr@example.com>\r\n"));
        assert!(data.contains("filename=\"birthday_A_2024-03-15.png\""));
    }
}
