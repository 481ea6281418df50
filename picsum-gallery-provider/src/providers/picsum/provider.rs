//! Lorem Picsum `ImageSource` implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::ImageSource;
use crate::types::{Image, ListParams};

use super::PicsumClient;

#[async_trait]
impl ImageSource for PicsumClient {
    fn id(&self) -> &'static str {
        "picsum"
    }

    async fn get_images(&self, params: ListParams) -> Result<Vec<Image>> {
        let images = self.get_list(params).await?;
        log::debug!(
            "[picsum] page {} (limit {}) returned {} images",
            params.page,
            params.limit,
            images.len()
        );
        Ok(images)
    }
}
