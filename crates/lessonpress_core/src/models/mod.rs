//! Data models for API requests and stored article records.

/// Article fields, labels, and save payloads.
pub mod article;

#[cfg(test)]
mod tests;
