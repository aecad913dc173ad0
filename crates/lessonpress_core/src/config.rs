//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_ARTICLES_FILE_NAME, DEFAULT_CANONICAL_ID_MAX, DEFAULT_CANONICAL_ID_MIN,
    DEFAULT_CONTENT_ROOT, DEFAULT_DEV_ORIGIN, DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT,
    DEFAULT_TOPICS_FILE_NAME, DEFAULT_TOPIC_SYNC_ATTEMPTS, PRODUCTION_ENV,
};
use crate::error::AppError;
use std::env;
use std::path::{Component, Path, PathBuf};

/// Inclusive numeric window of record ids used as the sequential allocation
/// pool. Ids outside the window never influence allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    pub min: u32,
    pub max: u32,
}

impl Default for IdRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_CANONICAL_ID_MIN,
            max: DEFAULT_CANONICAL_ID_MAX,
        }
    }
}

impl IdRange {
    /// Build a range, rejecting inverted bounds.
    ///
    /// # Returns
    /// `None` when `min > max`.
    pub fn new(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Runtime configuration for LessonPress.
#[derive(Debug, Clone)]
pub struct Config {
    pub content_root: PathBuf,
    pub articles_path: PathBuf,
    pub topics_path: PathBuf,
    pub port: u16,
    pub environment: String,
    pub dev_origin: String,
    pub id_range: IdRange,
    pub max_body_size: usize,
    pub topic_sync_attempts: u32,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE (standard)
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    None
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}='{}'; using default", name, raw);
            None
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(expand_tilde)
}

fn id_range_from_env() -> IdRange {
    let min = env_parsed("CANONICAL_ID_MIN").unwrap_or(DEFAULT_CANONICAL_ID_MIN);
    let max = env_parsed("CANONICAL_ID_MAX").unwrap_or(DEFAULT_CANONICAL_ID_MAX);
    IdRange::new(min, max).unwrap_or_else(|| {
        tracing::warn!(
            "CANONICAL_ID_MIN {} exceeds CANONICAL_ID_MAX {}; using default range",
            min,
            max
        );
        IdRange::default()
    })
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let content_root =
            env_path("CONTENT_ROOT").unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_ROOT));
        let mut config = Self::for_content_root(&content_root);
        if let Some(path) = env_path("ARTICLES_FILE") {
            config.articles_path = path;
        }
        if let Some(path) = env_path("TOPICS_FILE") {
            config.topics_path = path;
        }
        config.port = env_parsed("PORT").unwrap_or(DEFAULT_PORT);
        config.environment = env::var("APP_ENV")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(config.environment);
        config.dev_origin = env::var("DEV_ORIGIN")
            .ok()
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(config.dev_origin);
        config.id_range = id_range_from_env();
        config.max_body_size = env_parsed("MAX_BODY_SIZE").unwrap_or(DEFAULT_MAX_BODY_SIZE);
        config.topic_sync_attempts = env_parsed::<u32>("TOPIC_SYNC_ATTEMPTS")
            .unwrap_or(DEFAULT_TOPIC_SYNC_ATTEMPTS)
            .max(1);
        config
    }

    /// Build a development configuration rooted at `content_root`, with the
    /// default file names inside it.
    pub fn for_content_root(content_root: &Path) -> Self {
        Self {
            content_root: content_root.to_path_buf(),
            articles_path: content_root.join(DEFAULT_ARTICLES_FILE_NAME),
            topics_path: content_root.join(DEFAULT_TOPICS_FILE_NAME),
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            dev_origin: DEFAULT_DEV_ORIGIN.to_string(),
            id_range: IdRange::default(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            topic_sync_attempts: DEFAULT_TOPIC_SYNC_ATTEMPTS,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case(PRODUCTION_ENV)
    }

    /// Resolve the article source file for one request.
    ///
    /// `file_location` must be relative and stay inside the content root.
    ///
    /// # Returns
    /// The configured articles path when `file_location` is absent or blank.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] for absolute paths or `..` segments.
    pub fn resolve_articles_path(&self, file_location: Option<&str>) -> Result<PathBuf, AppError> {
        let Some(location) = file_location.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(self.articles_path.clone());
        };
        let relative = Path::new(location);
        let escapes_root = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes_root {
            return Err(AppError::Validation(format!(
                "fileLocation '{}' must be a relative path inside the content root",
                location
            )));
        }
        Ok(self.content_root.join(relative))
    }
}
