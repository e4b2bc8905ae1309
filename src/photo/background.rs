use async_trait::async_trait;
use image::RgbaImage;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::PhotoError;

/// External background-removal capability.
///
/// Returns `None` when the service is not available at all (not configured),
/// which callers treat the same as exhausted retries: the original photo is used.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    async fn remove_background(
        &self,
        image: &[u8],
        api_key: &str,
    ) -> Option<Result<Vec<u8>, PhotoError>>;

    fn name(&self) -> &str;
}

/// Used when no background-removal endpoint is configured.
pub struct NoBackgroundRemoval;

#[async_trait]
impl BackgroundRemover for NoBackgroundRemoval {
    async fn remove_background(
        &self,
        _image: &[u8],
        _api_key: &str,
    ) -> Option<Result<Vec<u8>, PhotoError>> {
        None
    }

    fn name(&self) -> &str {
        "No background removal"
    }
}

/// Posts the raw photo to an HTTP endpoint and expects the cut-out image back.
pub struct HttpBackgroundRemover {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackgroundRemover {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PhotoError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn call(&self, image: &[u8], api_key: &str) -> Result<Vec<u8>, PhotoError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-Key", api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PhotoError::BadStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl BackgroundRemover for HttpBackgroundRemover {
    async fn remove_background(
        &self,
        image: &[u8],
        api_key: &str,
    ) -> Option<Result<Vec<u8>, PhotoError>> {
        Some(self.call(image, api_key).await)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

/// Exponential backoff between background-removal attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given zero-based failed attempt: base, 2*base, 4*base, ...
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Prepare a birthday photo: background removed when possible, always RGBA.
///
/// Only an undecodable source photo is an error; every service failure falls
/// back to the original image.
pub async fn prepare_birthday_photo(
    bytes: &[u8],
    api_key: Option<&str>,
    remover: &dyn BackgroundRemover,
    retry: &RetryPolicy,
) -> Result<RgbaImage, PhotoError> {
    match api_key.filter(|key| !key.is_empty()) {
        Some(api_key) => {
            if let Some(cutout) = remove_with_retries(bytes, api_key, remover, retry).await {
                return Ok(cutout);
            }
        }
        None => debug!("No background removal API key configured, using original photo"),
    }

    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

async fn remove_with_retries(
    bytes: &[u8],
    api_key: &str,
    remover: &dyn BackgroundRemover,
    retry: &RetryPolicy,
) -> Option<RgbaImage> {
    for attempt in 0..retry.attempts {
        let outcome = match remover.remove_background(bytes, api_key).await {
            None => {
                debug!("Background removal unavailable ({})", remover.name());
                return None;
            }
            Some(result) => result.and_then(|processed| {
                image::load_from_memory(&processed)
                    .map(|img| img.to_rgba8())
                    .map_err(PhotoError::from)
            }),
        };

        match outcome {
            Ok(cutout) => {
                debug!("Background removed on attempt {}", attempt + 1);
                return Some(cutout);
            }
            Err(e) => {
                warn!(
                    "Background removal attempt {}/{} failed: {}",
                    attempt + 1,
                    retry.attempts,
                    e
                );
            }
        }

        if attempt + 1 < retry.attempts {
            tokio::time::sleep(retry.delay_after(attempt)).await;
        }
    }

    info!(
        "Background removal gave up after {} attempts, using original photo",
        retry.attempts
    );
    None
}
