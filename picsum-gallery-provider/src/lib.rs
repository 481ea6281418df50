//! # picsum-gallery-provider
//!
//! HTTP clients behind the picsum gallery.
//!
//! ## Clients
//!
//! | Client | Endpoint | Auth |
//! |--------|----------|------|
//! | [`PicsumClient`] | [Lorem Picsum](https://picsum.photos/) `GET /v2/list` | none |
//! | [`GeminiClient`] | Google Gemini `generateContent` | `x-goog-api-key` header |
//!
//! Both implement the async source traits ([`ImageSource`], [`DescriptionSource`])
//! consumed by `picsum-gallery-core`.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use picsum_gallery_provider::{GeminiClient, ImageSource, ListParams, PicsumClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let picsum = PicsumClient::new();
//!     let images = picsum.get_images(ListParams::new(1, 10)).await?;
//!
//!     // Reads GEMINI_API_KEY on every call
//!     let gemini = GeminiClient::new();
//!     if gemini.is_service_available() {
//!         let text = gemini.generate_description(&images[0].large_url()).await?;
//!         println!("{}: {text}", images[0].author);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, HttpError>`](HttpError). Status `0`
//! marks failures that never produced an HTTP response. Client errors (4xx)
//! are final; server and transport errors are worth retrying, see
//! [`RetryPolicy`] and [`HttpUtils::with_retry`].

mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{HttpError, Result, TRANSPORT_STATUS};

// Re-export HTTP helpers used by the orchestration layer
pub use http_client::{BAD_PAYLOAD_STATUS, HttpUtils, RawResponse, RetryPolicy};

// Re-export source traits (status mapping stays internal)
pub use traits::{DescriptionSource, ImageSource};

// Re-export types
pub use types::{Image, ListParams};

// Re-export clients and CDN URL builders
pub use providers::gemini::{DEFAULT_API_KEY_ENV, PLACEHOLDER_API_KEY};
pub use providers::picsum::{
    DEFAULT_THUMBNAIL_HEIGHT, DEFAULT_THUMBNAIL_WIDTH, LARGE_HEIGHT, LARGE_WIDTH, image_url,
    large_image_url,
};
pub use providers::{ApiKeySource, GeminiClient, PicsumClient};

// Re-export utils module
pub use utils::log_sanitizer;
