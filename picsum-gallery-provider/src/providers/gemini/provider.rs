//! Gemini `DescriptionSource` implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{DescriptionSource, StatusMapper};

use super::GeminiClient;
use super::http::build_request;

impl GeminiClient {
    /// Describe the image at `image_url` in one short sentence.
    ///
    /// Fails with 401 before any I/O when no key is configured. Every failure
    /// is an [`HttpError`](crate::HttpError).
    pub async fn generate_description(&self, image_url: &str) -> Result<String> {
        let Some(api_key) = self.key_source.resolve() else {
            log::warn!("[{}] No API key configured", self.client_name());
            return Err(self.not_configured_error());
        };

        let image = self.fetch_image(image_url).await?;
        log::debug!(
            "[{}] Encoded {} image ({} base64 bytes)",
            self.client_name(),
            image.mime_type,
            image.data.len()
        );

        let response = self.post_generate(&api_key, &build_request(image)).await?;
        let description = self.extract_description(&response)?;
        log::info!("[{}] Generated description for {image_url}", self.client_name());
        Ok(description)
    }
}

#[async_trait]
impl DescriptionSource for GeminiClient {
    fn id(&self) -> &'static str {
        "gemini"
    }

    fn is_available(&self) -> bool {
        self.is_service_available()
    }

    async fn generate_description(&self, image_url: &str) -> Result<String> {
        GeminiClient::generate_description(self, image_url).await
    }
}
