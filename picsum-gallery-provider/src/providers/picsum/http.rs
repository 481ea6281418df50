//! Lorem Picsum HTTP request methods

use crate::error::{HttpError, Result};
use crate::http_client::{HttpUtils, RawResponse};
use crate::traits::StatusMapper;
use crate::types::{Image, ListParams};
use crate::utils::log_sanitizer::truncate_for_log;

use super::PicsumClient;
use super::error::NETWORK_MESSAGE;

impl PicsumClient {
    /// URL of one listing page
    pub(crate) fn list_url(&self, params: ListParams) -> String {
        format!(
            "{}/v2/list?page={}&limit={}",
            self.base_url, params.page, params.limit
        )
    }

    /// Execute the listing GET request
    pub(crate) async fn get_list(&self, params: ListParams) -> Result<Vec<Image>> {
        params.validate()?;

        let url = self.list_url(params);
        let response =
            HttpUtils::execute_request(self.client.get(&url), self.client_name(), "GET", &url)
                .await
                .map_err(|e| {
                    log::error!("[{}] {e}", self.client_name());
                    HttpError::transport(NETWORK_MESSAGE)
                })?;

        self.parse_list(&response)
    }

    /// Map a listing response to images or an error
    pub(crate) fn parse_list(&self, response: &RawResponse) -> Result<Vec<Image>> {
        if !response.is_success() {
            let error = self.map_status(response);
            log::warn!(
                "[{}] Listing failed with HTTP {}: {}",
                self.client_name(),
                response.status,
                truncate_for_log(&response.text())
            );
            return Err(error);
        }

        // An unreadable listing is reported like a lost connection
        HttpUtils::parse_json(&response.text(), self.client_name())
            .map_err(|_| HttpError::transport(NETWORK_MESSAGE))
    }
}
