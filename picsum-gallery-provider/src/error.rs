use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status used for failures that never produced an HTTP response
/// (DNS failure, connection refused, timeout, truncated body).
pub const TRANSPORT_STATUS: u16 = 0;

/// Unified error type for every network operation in the gallery.
///
/// Both clients normalize `reqwest` and `serde_json` failures into this shape,
/// so the orchestration layer and any front-end only ever deal with a message
/// and a status code.
///
/// # Classification
///
/// - [`is_client_error`](Self::is_client_error): `400..500`, never retried
/// - [`is_server_error`](Self::is_server_error): `>= 500`, retryable
/// - [`is_transport_error`](Self::is_transport_error): status `0`, retryable
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct HttpError {
    /// Human readable message, suitable for display.
    pub message: String,
    /// HTTP status code, or [`TRANSPORT_STATUS`] for non-HTTP failures.
    pub status: u16,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Build an error from a response status line.
    ///
    /// Without a custom message the result reads `HTTP {status}: {status_text}`.
    pub fn from_response(status: u16, status_text: &str, custom_message: Option<&str>) -> Self {
        let message = match custom_message {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => format!("HTTP {status}: {status_text}"),
        };
        Self::new(message, status)
    }

    /// Status-0 error for failures below the HTTP layer.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(message, TRANSPORT_STATUS)
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        self.status == TRANSPORT_STATUS
    }

    /// Whether the failure is an expected outcome (bad input, missing page,
    /// unconfigured key), used to pick the log level.
    ///
    /// Returns `true` for `warn`, `false` for `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        self.is_client_error()
    }
}

/// Convenience type alias for `Result<T, HttpError>`.
pub type Result<T> = std::result::Result<T, HttpError>;
