//! Picsum Gallery Core Library
//!
//! Orchestration for a paginated photo gallery, independent of any UI:
//! - Shared pagination state (`PaginationHandle`)
//! - Cached, retrying page queries (`ImageQueryService`)
//! - Debounced, cancellable modal descriptions (`ModalDescriptionService`)
//!
//! Network access goes through the `ImageSource` and `DescriptionSource`
//! traits from `picsum-gallery-provider`, so front-ends and tests can supply
//! their own implementations.

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use picsum_gallery_provider::{DescriptionSource, ImageSource};
pub use services::{
    CachePolicy, GalleryContext, ImageQueryService, ModalConfig, ModalDescriptionService,
    PaginationHandle,
};
