//! Generic HTTP client tools
//!
//! Shared request/response handling for both clients: sending, logging,
//! reading the body, JSON parsing and the retry loop.
//!
//! # design principles
//! - **Status mapping stays with each client** - the listing and description endpoints word their errors differently
//! - **Transport failures are normalized here** - callers only see [`HttpError`]
//! - **Retry is opt-in** - the clients never retry on their own, the orchestration layer wraps calls in [`HttpUtils::with_retry`]

use std::future::Future;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::HttpError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Status reported when an upstream body cannot be decoded.
pub const BAD_PAYLOAD_STATUS: u16 = 502;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase, empty for unknown codes.
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and reads the whole response.
    ///
    /// Non-2xx statuses are *not* errors here; the caller maps them.
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `client_name` - client tag for logs
    /// * `method_name` - "GET", "POST", for logs
    /// * `url` - target URL for logs
    ///
    /// # Returns
    /// * `Ok(RawResponse)` - any response that was received in full
    /// * `Err(HttpError)` with status `0` - no response or unreadable body
    pub async fn execute_request(
        request_builder: RequestBuilder,
        client_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<RawResponse, HttpError> {
        log::debug!("[{client_name}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            let kind = if e.is_timeout() {
                "Request timeout"
            } else {
                "Network error"
            };
            log::warn!("[{client_name}] {kind}: {e}");
            HttpError::transport(format!("{kind}: {e}"))
        })?;

        let status = response.status();
        log::debug!("[{client_name}] Response Status: {status}");

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            log::warn!("[{client_name}] Failed to read response body: {e}");
            HttpError::transport(format!("Failed to read response body: {e}"))
        })?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body: body.to_vec(),
        })
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(HttpError)` with [`BAD_PAYLOAD_STATUS`] - parsing failed
    pub fn parse_json<T>(response_text: &str, client_name: &str) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{client_name}] JSON parse failed: {e}");
            log::error!(
                "[{client_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            HttpError::new(
                format!("Invalid response from {client_name}: {e}"),
                BAD_PAYLOAD_STATUS,
            )
        })
    }

    /// Runs `operation` until it succeeds or `policy` gives up.
    ///
    /// `on_retry` is invoked with the 0-based retry index and the error that
    /// triggered it, before sleeping.
    ///
    /// # Retry strategy
    /// - Client errors (4xx) are returned immediately
    /// - Server errors and transport errors are retried `policy.max_retries` times
    /// - Exponential backoff: 1s, 2s, 4s, ... (maximum 30 seconds)
    pub async fn with_retry<T, F, Fut, R>(
        policy: &RetryPolicy,
        client_name: &str,
        mut operation: F,
        mut on_retry: R,
    ) -> Result<T, HttpError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, HttpError>>,
        R: FnMut(u32, &HttpError),
    {
        let mut failures = 0_u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if policy.should_retry(&e, failures) => {
                    let delay = policy.delay(failures);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        client_name,
                        failures + 1,
                        policy.max_retries + 1,
                        delay.as_secs_f32(),
                        e
                    );
                    on_retry(failures, &e);
                    tokio::time::sleep(delay).await;
                    failures += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Retry policy for listing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(30_000),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Whether a request that has already failed `failures` times (before
    /// this one) should be attempted again after `error`.
    #[must_use]
    pub fn should_retry(&self, error: &HttpError, failures: u32) -> bool {
        is_retryable(error) && failures < self.max_retries
    }

    /// Backoff before retry number `retry` (0-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let capped = retry.min(20); // Prevent 2^retry from overflowing
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(1_u64 << capped).min(max_ms))
    }
}

/// Determine whether the error can be retried
///
/// Server errors and transport failures are transient; client errors
/// (bad page, missing key, rate limit) are not.
fn is_retryable(error: &HttpError) -> bool {
    !error.is_client_error()
}
