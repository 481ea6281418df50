use serde::{Deserialize, Serialize};

use crate::error::{HttpError, Result};
use crate::providers::picsum;

// ============ Image ============

/// One photo as returned by the listing endpoint.
///
/// Sourced verbatim from the API; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub author: String,
    /// Original width in pixels.
    pub width: u32,
    /// Original height in pixels.
    pub height: u32,
    /// Unsplash page of the photo.
    pub url: String,
    /// Full resolution download URL.
    pub download_url: String,
}

impl Image {
    /// Grid thumbnail URL (400×300).
    #[must_use]
    pub fn thumbnail_url(&self) -> String {
        picsum::image_url(
            &self.id,
            picsum::DEFAULT_THUMBNAIL_WIDTH,
            picsum::DEFAULT_THUMBNAIL_HEIGHT,
        )
    }

    /// Detail view URL (800×600).
    #[must_use]
    pub fn large_url(&self) -> String {
        picsum::large_image_url(&self.id)
    }
}

// ============ Listing parameters ============

/// Page request for the listing endpoint. Pages are 1-indexed.
///
/// # Default
///
/// The default is `page = 1, limit = 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl ListParams {
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Reject values the endpoint cannot serve (`page = 0`, `limit = 0`).
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(HttpError::new("Page number must be at least 1", 400));
        }
        if self.limit == 0 {
            return Err(HttpError::new("Page size must be at least 1", 400));
        }
        Ok(())
    }
}
