//! Client implementations

/// Shared utilities used by client implementations.
pub mod common;

pub mod gemini;
pub mod picsum;

pub use gemini::{ApiKeySource, GeminiClient};
pub use picsum::PicsumClient;
