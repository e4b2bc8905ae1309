// Greeting delivery - providers, message types and MIME rendering
pub mod config;
pub mod error;
pub mod greetings;
pub mod mime;
pub mod providers;
pub mod types;

pub use config::*;
pub use error::*;
pub use greetings::{greeting_body, greeting_message, greeting_subject};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Delivers a finished message. Implementations validate addresses first.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError>;
    fn name(&self) -> &str;
}

pub type DynEmailProvider = Arc<dyn EmailProvider>;

pub async fn create_provider(config: &EmailProviderConfig) -> Result<DynEmailProvider, EmailError> {
    let provider: DynEmailProvider = match config {
        EmailProviderConfig::Ses(ses_config) => {
            Arc::new(providers::ses::SesProvider::new(ses_config).await?)
        }
        EmailProviderConfig::Null => Arc::new(providers::null::NullProvider::new()),
    };
    info!("Email provider: {}", provider.name());
    Ok(provider)
}
