//! Type definition module

mod fetch_state;
mod modal;
mod pagination;

pub use fetch_state::{FetchState, PageSnapshot};
pub use modal::{DescriptionPhase, ModalDescriptionState};
pub use pagination::{Pagination, PaginationConfig};

// Re-export public types of the provider library
pub use picsum_gallery_provider::{HttpError, Image, ListParams};
