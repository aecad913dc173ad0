//! Shared constants used across LessonPress crates.

/// Default API port for LessonPress.
pub const DEFAULT_PORT: u16 = 38480;

/// Default maximum request body accepted by the API layer.
pub const DEFAULT_MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default directory holding the article source and topic sidecar files.
pub const DEFAULT_CONTENT_ROOT: &str = "./src/data";
/// Default file name of the article source file inside the content root.
pub const DEFAULT_ARTICLES_FILE_NAME: &str = "newsData.js";
/// Default file name of the topic sidecar inside the content root.
pub const DEFAULT_TOPICS_FILE_NAME: &str = "articleTopics.js";

/// The only origin accepted by the authoring endpoints.
pub const DEFAULT_DEV_ORIGIN: &str = "http://localhost:3000";
/// Runtime environment name that disables the authoring endpoints.
pub const PRODUCTION_ENV: &str = "production";

/// Lower bound of the canonical id allocation pool.
pub const DEFAULT_CANONICAL_ID_MIN: u32 = 1;
/// Upper bound of the canonical id allocation pool.
pub const DEFAULT_CANONICAL_ID_MAX: u32 = 100;
/// Prefix shared by every record id.
pub const RECORD_ID_PREFIX: &str = "rec";

/// Attempts made for a topic sidecar write before downgrading to a warning.
pub const DEFAULT_TOPIC_SYNC_ATTEMPTS: u32 = 3;

/// Name of the exported array in a generated article source file.
pub const ARTICLES_EXPORT_NAME: &str = "newsData";

/// Suffix of the advisory lock file placed next to the article source file.
pub const STORE_LOCK_EXTENSION: &str = "lock";
