//! Client shared utility functions

use std::time::Duration;

use reqwest::Client;

// ============ HTTP Client ============

/// Default connection timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP Client with timeout configuration
///
/// Falls back to a client without timeouts if the TLS backend cannot be
/// initialised with the custom builder.
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            log::error!("Failed to build configured HTTP client, using defaults: {e}");
            Client::new()
        })
}

// ============ URL handling ============

/// Remove the trailing slash of a base URL
pub fn normalize_base_url(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
