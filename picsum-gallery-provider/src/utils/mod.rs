//! Utility modules.

/// Log sanitization utilities to keep payloads and keys out of logs.
pub mod log_sanitizer;
