//! Lorem Picsum image listing client

mod error;
mod http;
mod provider;

use reqwest::Client;

use crate::providers::common::{create_http_client, normalize_base_url};

pub(crate) const PICSUM_BASE: &str = "https://picsum.photos";
/// Thumbnail size used by the grid.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 300;
/// Detail image size used by the modal.
pub const LARGE_WIDTH: u32 = 800;
pub const LARGE_HEIGHT: u32 = 600;

/// Lorem Picsum listing client
pub struct PicsumClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl PicsumClient {
    pub fn new() -> Self {
        Self::with_base_url(PICSUM_BASE)
    }

    /// Client against a mirror or a local test server.
    pub fn with_base_url(base_url: impl AsRef<str>) -> Self {
        Self {
            client: create_http_client(),
            base_url: normalize_base_url(base_url.as_ref()),
        }
    }
}

impl Default for PicsumClient {
    fn default() -> Self {
        Self::new()
    }
}

/// CDN URL of image `id` cropped to `width`×`height`.
pub fn image_url(id: &str, width: u32, height: u32) -> String {
    format!(
        "{PICSUM_BASE}/id/{}/{width}/{height}",
        urlencoding::encode(id)
    )
}

/// CDN URL of the modal-sized rendition of image `id`.
pub fn large_image_url(id: &str) -> String {
    image_url(id, LARGE_WIDTH, LARGE_HEIGHT)
}
