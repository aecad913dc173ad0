//! Core domain library for LessonPress (config, record store, models).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across LessonPress crates.
pub mod constants;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Lesson export parsing for bulk source-file generation.
pub mod import;
/// Data models for API requests and stored article records.
pub mod models;
/// Article record store backed by the plain source file.
pub mod store;
/// Save request orchestration and access gate.
pub mod save;
/// Shared text normalization helpers.
pub mod text;
/// Best-effort slug to topic sidecar updates.
pub mod topics;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, IdRange};
pub use constants::*;
pub use error::AppError;
pub use save::SaveOrchestrator;
pub use store::ArticleStore;
