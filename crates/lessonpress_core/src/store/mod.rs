//! Article record store backed by the plain source file.
//!
//! The file is the single source of truth. Every operation re-reads it; no
//! handle outlives a call. Mutations run a full read-modify-write cycle under
//! the per-path writer mutex and the `<file>.lock` OS lock, and refuse to
//! commit when the bytes on disk changed after they were read.

/// Record text construction.
pub mod builder;
/// Record parsing and boundary location.
pub mod document;
/// String literal escaping.
pub mod escape;
/// Record id allocation.
pub mod ids;
pub(crate) mod lexer;
/// Write serialization.
pub mod lock;
/// Field rewriting.
pub mod rewrite;
/// Splicing and persistence.
pub mod writer;


pub use document::SourceDocument;
pub use lock::WriterRegistry;

use crate::config::IdRange;
use crate::error::AppError;
use crate::models::article::{ArticleFields, ArticleRecord, ArticleSummary, FieldLabel};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Map a failed access to the source file at `path`.
pub(crate) fn source_error(path: &Path, err: std::io::Error) -> AppError {
    match err.kind() {
        std::io::ErrorKind::NotFound => AppError::NotFound(format!(
            "Article source file '{}' not found",
            path.display()
        )),
        _ => AppError::Io(err),
    }
}

/// Source text read at the start of one cycle.
pub struct LoadedSource {
    pub text: String,
    pub document: SourceDocument,
    pub hash: blake3::Hash,
}

/// Outcome of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub id: String,
    /// Slug stored in the record after the update.
    pub slug: String,
    pub rewritten: Vec<FieldLabel>,
    pub appended: Vec<FieldLabel>,
}

/// Outcome of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    pub id: String,
    pub slug: String,
}

/// Accessor for one article source file.
pub struct ArticleStore {
    path: PathBuf,
    id_range: IdRange,
    writer: Arc<Mutex<()>>,
}

impl ArticleStore {
    /// Store with its own writer mutex.
    pub fn new(path: impl Into<PathBuf>, id_range: IdRange) -> Self {
        Self::with_writer(path, id_range, Arc::default())
    }

    /// Store sharing `writer` with other handles to the same file.
    pub fn with_writer(path: impl Into<PathBuf>, id_range: IdRange, writer: Arc<Mutex<()>>) -> Self {
        Self {
            path: path.into(),
            id_range,
            writer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the source file.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the file is missing, [`AppError::Io`] on
    /// other read failures, [`AppError::BoundaryParse`] when malformed.
    pub fn load(&self) -> Result<LoadedSource, AppError> {
        let text = self.read_text()?;
        let document = SourceDocument::parse(&text)?;
        let hash = writer::content_hash(&text);
        Ok(LoadedSource {
            text,
            document,
            hash,
        })
    }

    fn read_text(&self) -> Result<String, AppError> {
        std::fs::read_to_string(&self.path).map_err(|err| source_error(&self.path, err))
    }

    /// List record summaries in file order.
    pub fn list(&self) -> Result<Vec<ArticleSummary>, AppError> {
        let loaded = self.load()?;
        Ok(loaded
            .document
            .records
            .iter()
            .map(|record| ArticleSummary::from(&record.to_record()))
            .collect())
    }

    /// Fetch one record by id.
    pub fn get(&self, id: &str) -> Result<ArticleRecord, AppError> {
        let loaded = self.load()?;
        let record = loaded.document.locate(id)?;
        Ok(record.to_record())
    }

    /// Append a new record built from `fields` and return its id.
    ///
    /// # Arguments
    /// - `fields`: Submitted article fields.
    /// - `today`: Fallback for a missing `dateWritten`.
    ///
    /// # Errors
    /// Propagates read, parse, conflict and write failures. Nothing is written
    /// on error.
    pub fn create(&self, fields: &ArticleFields, today: &str) -> Result<CreateReport, AppError> {
        self.mutate(|loaded| {
            let id = ids::next_id(loaded.document.ids(), self.id_range);
            let values = fields.create_values(today);
            let record_text = builder::build_record(&id, &values);
            let updated = writer::splice_append(&loaded.text, &loaded.document, &record_text);
            tracing::info!("Allocated article id {}", id);
            let slug = values
                .get(&FieldLabel::Slug)
                .cloned()
                .unwrap_or_default();
            Ok((updated, CreateReport { id, slug }))
        })
    }

    /// Rewrite the supplied fields of record `id`.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when `id` is absent; the file is left untouched.
    pub fn update(&self, id: &str, fields: &ArticleFields) -> Result<UpdateReport, AppError> {
        self.mutate(|loaded| {
            let record = loaded.document.locate(id)?;
            let updates = fields.update_values();
            let rewritten = rewrite::rewrite_record(&loaded.text, record, &updates);
            tracing::debug!(
                id,
                rewritten = rewritten.rewritten.len(),
                appended = rewritten.appended.len(),
                "Rewrote article fields"
            );
            let updated = writer::splice_record(&loaded.text, record.span.clone(), &rewritten.text);
            let slug = updates
                .get(&FieldLabel::Slug)
                .map(String::as_str)
                .or_else(|| record.value(FieldLabel::Slug))
                .unwrap_or_default()
                .to_string();
            Ok((
                updated,
                UpdateReport {
                    id: record.id.clone(),
                    slug,
                    rewritten: rewritten.rewritten,
                    appended: rewritten.appended,
                },
            ))
        })
    }

    /// Run one serialized read-modify-write cycle.
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&LoadedSource) -> Result<(String, T), AppError>,
    ) -> Result<T, AppError> {
        let _writer = self
            .writer
            .lock()
            .map_err(|_| AppError::Unexpected("article writer mutex is poisoned".to_string()))?;
        // The lock file sits next to the source; never create it for a missing one.
        std::fs::metadata(&self.path).map_err(|err| source_error(&self.path, err))?;
        let _file_lock = lock::acquire_store_lock(&self.path)?;

        let loaded = self.load()?;
        let (updated, outcome) = apply(&loaded)?;

        let on_disk = self.read_text()?;
        if writer::content_hash(&on_disk) != loaded.hash {
            return Err(AppError::Conflict(
                "Article source file changed on disk during save; reload and retry".to_string(),
            ));
        }
        writer::commit(&self.path, &updated)?;
        tracing::info!("Committed {} ({} bytes)", self.path.display(), updated.len());
        Ok(outcome)
    }
}
