//! Google Gemini image description client

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::providers::common::create_http_client;

pub(crate) const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
/// Environment variable read by [`ApiKeySource::default`].
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Value shipped in example env files; treated as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_key_here";

pub(crate) const PROMPT: &str = "Describe this image in one short, engaging sentence (maximum 20 words). Focus on the main subject and visual elements.";
pub(crate) const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Where the Gemini API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read the named environment variable on every call.
    Env(String),
    /// Fixed key (embedding applications, tests).
    Static(String),
}

impl Default for ApiKeySource {
    fn default() -> Self {
        Self::Env(DEFAULT_API_KEY_ENV.to_string())
    }
}

impl ApiKeySource {
    /// Current key, or `None` when missing, blank or the placeholder.
    pub fn resolve(&self) -> Option<String> {
        let raw = match self {
            Self::Env(var) => std::env::var(var).ok()?,
            Self::Static(key) => key.clone(),
        };
        let key = raw.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            None
        } else {
            Some(key.to_string())
        }
    }

    /// Name shown in configuration hints.
    pub(crate) fn hint(&self) -> &str {
        match self {
            Self::Env(var) => var,
            Self::Static(_) => "the API key",
        }
    }
}

/// Google Gemini description client
pub struct GeminiClient {
    pub(crate) client: Client,
    pub(crate) endpoint: String,
    pub(crate) key_source: ApiKeySource,
}

impl GeminiClient {
    /// Client reading `GEMINI_API_KEY` at call time.
    pub fn new() -> Self {
        Self::with_key_source(ApiKeySource::default())
    }

    pub fn with_key_source(key_source: ApiKeySource) -> Self {
        Self {
            client: create_http_client(),
            endpoint: GEMINI_API_URL.to_string(),
            key_source,
        }
    }

    /// Override the `generateContent` endpoint (other model, proxy, test server).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// True iff a usable key is configured. No network I/O.
    pub fn is_service_available(&self) -> bool {
        self.key_source.resolve().is_some()
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}
