//! Gemini status and payload error mapping

use crate::error::HttpError;
use crate::http_client::{HttpUtils, RawResponse};
use crate::traits::StatusMapper;

use super::GeminiClient;
use super::types::ErrorEnvelope;

pub(crate) const IMAGE_FETCH_FAILED_MESSAGE: &str = "Unable to process image for description.";
pub(crate) const FORBIDDEN_MESSAGE: &str =
    "Google Gemini API access forbidden. Please check your API key permissions.";
pub(crate) const RATE_LIMITED_MESSAGE: &str =
    "Google Gemini rate limit exceeded. Please try again later.";
pub(crate) const QUOTA_MESSAGE: &str =
    "Google Gemini quota exceeded. Please try again later or check your billing.";
pub(crate) const UNAVAILABLE_MESSAGE: &str = "Description temporarily unavailable.";
pub(crate) const SAFETY_MESSAGE: &str = "Image content was filtered for safety reasons.";
pub(crate) const NO_DESCRIPTION_MESSAGE: &str = "Unable to generate description for this image.";

impl GeminiClient {
    pub(crate) fn not_configured_error(&self) -> HttpError {
        HttpError::new(
            format!(
                "AI descriptions require a Google Gemini API key. Please configure {}.",
                self.key_source.hint()
            ),
            401,
        )
    }

    pub(crate) fn invalid_key_error(&self, status: u16) -> HttpError {
        HttpError::new(
            format!(
                "Invalid Google Gemini API key. Please check {}.",
                self.key_source.hint()
            ),
            status,
        )
    }

    pub(crate) fn image_fetch_error() -> HttpError {
        HttpError::new(IMAGE_FETCH_FAILED_MESSAGE, 400)
    }

    pub(crate) fn safety_error() -> HttpError {
        HttpError::new(SAFETY_MESSAGE, 400)
    }

    pub(crate) fn no_description_error() -> HttpError {
        HttpError::new(NO_DESCRIPTION_MESSAGE, 500)
    }
}

/// Gemini status mapping
/// Reference: <https://ai.google.dev/gemini-api/docs/troubleshooting>
impl StatusMapper for GeminiClient {
    fn client_name(&self) -> &'static str {
        "gemini"
    }

    fn map_status(&self, response: &RawResponse) -> HttpError {
        let status = response.status;
        match status {
            401 => self.invalid_key_error(status),
            403 => HttpError::new(FORBIDDEN_MESSAGE, status),
            429 => HttpError::new(RATE_LIMITED_MESSAGE, status),
            // Gemini reports bad keys and exhausted quota as 400 with a message
            400 => {
                let detail = HttpUtils::parse_json::<ErrorEnvelope>(
                    &response.text(),
                    self.client_name(),
                )
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|body| body.message)
                .unwrap_or_default();

                if detail.contains("API key") {
                    self.invalid_key_error(status)
                } else if detail.contains("quota") {
                    HttpError::new(QUOTA_MESSAGE, status)
                } else {
                    HttpError::new(UNAVAILABLE_MESSAGE, status)
                }
            }
            _ => HttpError::new(UNAVAILABLE_MESSAGE, status),
        }
    }
}
