//! Business logic service layer

mod image_query_service;
mod modal_description_service;
mod pagination_service;

pub use image_query_service::{CachePolicy, ImageQueryService};
pub use modal_description_service::{ModalConfig, ModalDescriptionService};
pub use pagination_service::PaginationHandle;

use std::sync::Arc;

use picsum_gallery_provider::{DescriptionSource, GeminiClient, ImageSource, PicsumClient};

use crate::error::CoreResult;
use crate::types::PaginationConfig;

/// Service context - holds all dependencies
///
/// The embedding application builds one context per gallery and hands an
/// `Arc` of it to every service; the pagination handle inside it is the
/// single page counter all views observe.
pub struct GalleryContext {
    /// Image listing source
    pub image_source: Arc<dyn ImageSource>,
    /// Description source
    pub description_source: Arc<dyn DescriptionSource>,
    pagination: PaginationHandle,
}

impl GalleryContext {
    /// Create service context
    pub fn new(
        image_source: Arc<dyn ImageSource>,
        description_source: Arc<dyn DescriptionSource>,
        pagination: PaginationConfig,
    ) -> CoreResult<Self> {
        pagination.validate()?;
        log::info!(
            "Gallery context created: images from {}, descriptions from {} ({})",
            image_source.id(),
            description_source.id(),
            if description_source.is_available() {
                "available"
            } else {
                "not configured"
            }
        );
        Ok(Self {
            image_source,
            description_source,
            pagination: PaginationHandle::new(pagination),
        })
    }

    /// Context backed by Lorem Picsum and Gemini (key from `GEMINI_API_KEY`).
    pub fn with_default_clients(pagination: PaginationConfig) -> CoreResult<Self> {
        Self::new(
            Arc::new(PicsumClient::new()),
            Arc::new(GeminiClient::new()),
            pagination,
        )
    }

    /// The shared page counter
    pub fn pagination(&self) -> &PaginationHandle {
        &self.pagination
    }

    /// Page size configured for the gallery
    pub fn page_size(&self) -> u32 {
        self.pagination.current().items_per_page()
    }
}
