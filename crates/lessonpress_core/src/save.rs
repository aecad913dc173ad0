//! Save flow: access gate, validation, record write, then topic sync.

use crate::config::Config;
use crate::error::AppError;
use crate::models::article::{ArticleFields, SaveMode, SaveRequest, SaveResponse};
use crate::store::{ArticleStore, WriterRegistry};
use crate::text::{is_blank, normalize_optional_nonempty};
use crate::topics::{TopicSidecar, TopicSync};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TOPIC_BACKOFF: Duration = Duration::from_millis(50);

/// Drives one save request from validation to the optional topic sync.
///
/// Cheap to share: per-file writer mutexes live in the registry, so every
/// request touching the same file is serialized no matter which handler
/// thread runs it.
pub struct SaveOrchestrator {
    config: Arc<Config>,
    writers: WriterRegistry,
    topic_backoff: Duration,
}

impl SaveOrchestrator {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            writers: WriterRegistry::default(),
            topic_backoff: DEFAULT_TOPIC_BACKOFF,
        }
    }

    /// Override the base delay between sidecar attempts.
    pub fn with_topic_backoff(mut self, backoff: Duration) -> Self {
        self.topic_backoff = backoff;
        self
    }

    /// Reject requests outside development or from a foreign origin.
    ///
    /// # Errors
    /// [`AppError::AccessDenied`] in production, without an `Origin`, or when
    /// the origin differs from the configured development origin.
    pub fn check_access(&self, origin: Option<&str>) -> Result<(), AppError> {
        if self.config.is_production() {
            return Err(AppError::AccessDenied(
                "Article editing is disabled in production".to_string(),
            ));
        }
        let origin = origin.map(|value| value.trim().trim_end_matches('/'));
        match origin {
            Some(origin) if origin == self.config.dev_origin => Ok(()),
            Some(origin) => {
                tracing::warn!(origin, "Rejected request from foreign origin");
                Err(AppError::AccessDenied(format!(
                    "Origin '{}' is not allowed",
                    origin
                )))
            }
            None => Err(AppError::AccessDenied(
                "Missing Origin header".to_string(),
            )),
        }
    }

    /// Store for the file selected by `file_location`, sharing the writer
    /// mutex of every other store on that file.
    ///
    /// # Errors
    /// [`AppError::Validation`] for a location outside the content root and
    /// [`AppError::NotFound`] when the file does not exist.
    pub fn store_for(&self, file_location: Option<&str>) -> Result<ArticleStore, AppError> {
        let path = self.config.resolve_articles_path(file_location)?;
        let writer = self.writers.writer_for(&path)?;
        Ok(ArticleStore::with_writer(path, self.config.id_range, writer))
    }

    /// Run a full save.
    ///
    /// # Arguments
    /// - `origin`: The request's `Origin` header, if any.
    /// - `request`: Deserialized request body.
    ///
    /// # Returns
    /// The success descriptor; sidecar failures appear in `warnings`.
    ///
    /// # Errors
    /// Access, validation, lookup, parse, conflict and I/O failures of the
    /// primary write. Nothing is written when an error is returned.
    pub fn save(&self, origin: Option<&str>, request: SaveRequest) -> Result<SaveResponse, AppError> {
        self.check_access(origin)?;
        let fields = request
            .article_data
            .ok_or_else(|| AppError::Validation("Missing articleData".to_string()))?;
        let mode = request.mode.ok_or_else(|| {
            AppError::Validation("Missing or invalid mode; expected 'create' or 'update'".to_string())
        })?;
        let store = self.store_for(request.file_location.as_deref())?;

        let (id, slug) = match mode {
            SaveMode::Create => {
                validate_create(&fields)?;
                let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
                let report = store.create(&fields, &today)?;
                (report.id, report.slug)
            }
            SaveMode::Update => {
                let id = normalize_optional_nonempty(fields.id.clone()).ok_or_else(|| {
                    AppError::Validation("Article id is required for update".to_string())
                })?;
                let report = store.update(&id, &fields)?;
                (report.id, report.slug)
            }
        };
        tracing::info!(id = %id, mode = mode.as_str(), "Saved article");

        let mut warnings = Vec::new();
        if let Some(topic) = normalize_optional_nonempty(fields.topic.clone()) {
            if let Err(warning) = self.sync_topic(&slug, &topic) {
                warnings.push(warning);
            }
        }

        let message = match mode {
            SaveMode::Create => format!("Article {} created", id),
            SaveMode::Update => format!("Article {} updated", id),
        };
        Ok(SaveResponse {
            success: true,
            message,
            id,
            mode,
            requires_reload: true,
            warnings,
        })
    }

    /// Upsert the topic mapping with retries; the final failure becomes a
    /// warning string.
    fn sync_topic(&self, slug: &str, topic: &str) -> Result<TopicSync, String> {
        if slug.trim().is_empty() {
            let warning = "Topic not recorded: article has no slug".to_string();
            tracing::warn!("{}", warning);
            return Err(warning);
        }
        let sidecar = TopicSidecar::new(&self.config.topics_path);
        let attempts = self.config.topic_sync_attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match sidecar.upsert(slug, topic) {
                Ok(sync) => return Ok(sync),
                Err(err) => {
                    tracing::debug!(attempt, "Topic sync attempt failed: {}", err);
                    last_error = Some(err);
                    if attempt < attempts {
                        std::thread::sleep(self.topic_backoff * attempt);
                    }
                }
            }
        }
        let warning = match last_error {
            Some(err) => format!("Topic not recorded after {} attempt(s): {}", attempts, err),
            None => "Topic not recorded".to_string(),
        };
        tracing::warn!(slug, "{}", warning);
        Err(warning)
    }
}

fn validate_create(fields: &ArticleFields) -> Result<(), AppError> {
    let mut missing = Vec::new();
    if is_blank(fields.headline.as_deref()) {
        missing.push("headline");
    }
    if is_blank(fields.slug.as_deref()) {
        missing.push("slug");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )))
    }
}
