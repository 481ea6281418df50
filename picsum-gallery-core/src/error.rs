//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use picsum_gallery_provider::HttpError;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Invalid configuration (page size of zero, initial page out of range)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Network error (converting from library)
    #[error("{0}")]
    Http(#[from] HttpError),
}

impl CoreError {
    /// Whether it is expected behavior (bad input, missing page), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidConfig(_) => true,
            Self::Http(e) => e.is_expected(),
        }
    }

    /// Status of the underlying HTTP failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => Some(e.status),
            Self::InvalidConfig(_) => None,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
