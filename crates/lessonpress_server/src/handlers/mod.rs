//! HTTP request handlers.

/// Article save and read endpoints.
pub mod article;
