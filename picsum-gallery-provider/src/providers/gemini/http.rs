//! Gemini HTTP request methods

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{HttpError, Result};
use crate::http_client::{HttpUtils, RawResponse};
use crate::traits::StatusMapper;
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

use super::types::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData,
    RequestContent, RequestPart, default_safety_settings,
};
use super::{DEFAULT_MIME_TYPE, GeminiClient, PROMPT};

/// Image payload ready to inline into a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

impl GeminiClient {
    /// Download the image and base64-encode it
    pub(crate) async fn fetch_image(&self, image_url: &str) -> Result<EncodedImage> {
        let response = HttpUtils::execute_request(
            self.client.get(image_url),
            self.client_name(),
            "GET",
            image_url,
        )
        .await
        .map_err(|e| {
            log::warn!("[{}] Image download failed: {e}", self.client_name());
            Self::image_fetch_error()
        })?;

        if !response.is_success() {
            log::warn!(
                "[{}] Image download returned HTTP {}",
                self.client_name(),
                response.status
            );
            return Err(Self::image_fetch_error());
        }

        Ok(encode_image(&response))
    }

    /// POST the generateContent request
    pub(crate) async fn post_generate(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<RawResponse> {
        log::debug!(
            "[{}] POST {} (key {})",
            self.client_name(),
            self.endpoint,
            mask_secret(api_key)
        );

        HttpUtils::execute_request(
            self.client
                .post(&self.endpoint)
                .header("x-goog-api-key", api_key)
                .json(body),
            self.client_name(),
            "POST",
            &self.endpoint,
        )
        .await
        .map_err(|e| {
            log::error!("[{}] {e}", self.client_name());
            HttpError::new(super::error::UNAVAILABLE_MESSAGE, e.status)
        })
    }

    /// Turn a generateContent response into the description text
    pub(crate) fn extract_description(&self, response: &RawResponse) -> Result<String> {
        if !response.is_success() {
            let error = self.map_status(response);
            log::warn!(
                "[{}] generateContent failed with HTTP {}: {}",
                self.client_name(),
                response.status,
                truncate_for_log(&response.text())
            );
            return Err(error);
        }

        let parsed: GenerateContentResponse =
            HttpUtils::parse_json(&response.text(), self.client_name())
                .map_err(|_| Self::no_description_error())?;

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            return Err(Self::no_description_error());
        };

        let text = candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        match text {
            Some(text) => Ok(text),
            None if candidate.finish_reason.as_deref() == Some("SAFETY") => {
                log::warn!("[{}] Description withheld by safety filter", self.client_name());
                Err(Self::safety_error())
            }
            None => Err(Self::no_description_error()),
        }
    }
}

/// Build the full request body for one image
pub(crate) fn build_request(image: EncodedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![
                RequestPart::Text {
                    text: PROMPT.to_string(),
                },
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type,
                        data: image.data,
                    },
                },
            ],
        }],
        generation_config: GenerationConfig::default(),
        safety_settings: default_safety_settings(),
    }
}

/// Base64-encode a downloaded image, keeping its `image/*` MIME type
pub(crate) fn encode_image(response: &RawResponse) -> EncodedImage {
    let mime_type = response
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    EncodedImage {
        mime_type,
        data: STANDARD.encode(&response.body),
    }
}
