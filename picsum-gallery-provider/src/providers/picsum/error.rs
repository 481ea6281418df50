//! Lorem Picsum status mapping

use crate::error::HttpError;
use crate::http_client::RawResponse;
use crate::traits::StatusMapper;

use super::PicsumClient;

pub(crate) const NOT_FOUND_MESSAGE: &str =
    "No images found for this page. Please try a different page.";
pub(crate) const UNAVAILABLE_MESSAGE: &str =
    "Server is temporarily unavailable. Please try again later.";
pub(crate) const GENERIC_MESSAGE: &str = "Failed to fetch images";
pub(crate) const NETWORK_MESSAGE: &str =
    "Network connection error. Please check your internet connection and try again.";

impl StatusMapper for PicsumClient {
    fn client_name(&self) -> &'static str {
        "picsum"
    }

    fn map_status(&self, response: &RawResponse) -> HttpError {
        let status = response.status;
        let message = match status {
            404 => NOT_FOUND_MESSAGE.to_string(),
            500..=u16::MAX => UNAVAILABLE_MESSAGE.to_string(),
            400..=499 => format!("Failed to load images: {}", response.status_text),
            _ => GENERIC_MESSAGE.to_string(),
        };
        HttpError::from_response(status, &response.status_text, Some(&message))
    }
}
