use async_trait::async_trait;

use crate::error::{HttpError, Result};
use crate::http_client::RawResponse;
use crate::types::{Image, ListParams};

/// Status mapping trait (internal use)
/// Each client words non-2xx responses for its own endpoint
pub(crate) trait StatusMapper {
    /// Client identifier used in log tags
    fn client_name(&self) -> &'static str;

    /// Map a received non-2xx response to the unified error type
    fn map_status(&self, response: &RawResponse) -> HttpError;
}

/// Source of paginated image listings.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Source identifier
    fn id(&self) -> &'static str;

    /// Fetch one page of images.
    ///
    /// Implementations do not cache and do not retry.
    async fn get_images(&self, params: ListParams) -> Result<Vec<Image>>;
}

/// Source of one-sentence image descriptions.
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// Source identifier
    fn id(&self) -> &'static str;

    /// Whether a request could be made right now (credential configured).
    /// Performs no I/O.
    fn is_available(&self) -> bool;

    /// Describe the image found at `image_url`.
    async fn generate_description(&self, image_url: &str) -> Result<String>;
}
