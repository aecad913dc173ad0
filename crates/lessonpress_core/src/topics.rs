//! Slug to topic sidecar file (`articleTopics.js`).
//!
//! The sidecar is a flat object literal of `'slug': 'topic'` entries read by
//! the frontend's topic browser. It is written independently of the record
//! store; callers treat every error from here as a warning.

use crate::error::AppError;
use crate::store::escape::escape_single_quoted;
use crate::store::lexer::{Lexer, Token};
use crate::store::{lock, writer};
use std::path::{Path, PathBuf};

/// Outcome of one sidecar upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSync {
    Inserted,
    AlreadyPresent,
}

/// Handle to one sidecar file.
#[derive(Debug, Clone)]
pub struct TopicSidecar {
    path: PathBuf,
}

impl TopicSidecar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the sidecar holds `'slug': 'topic'`.
    ///
    /// The presence check is a plain substring match on the rendered entry,
    /// so a slug mapped to a different topic gets a second entry; the later
    /// key wins when the frontend evaluates the object.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the file is missing,
    /// [`AppError::BoundaryParse`] when it has no closing `}`, and
    /// [`AppError::Io`] on read or write failures.
    pub fn upsert(&self, slug: &str, topic: &str) -> Result<TopicSync, AppError> {
        std::fs::metadata(&self.path).map_err(|err| self.read_error(err))?;
        let _lock = lock::acquire_store_lock(&self.path)?;
        let text = std::fs::read_to_string(&self.path).map_err(|err| self.read_error(err))?;

        let entry = render_entry(slug, topic);
        if text.contains(&entry) {
            tracing::debug!(slug, "Topic mapping already present");
            return Ok(TopicSync::AlreadyPresent);
        }

        let updated = insert_entry(&text, &entry)?;
        writer::commit(&self.path, &updated)?;
        tracing::info!(slug, topic, "Recorded topic mapping");
        Ok(TopicSync::Inserted)
    }

    fn read_error(&self, err: std::io::Error) -> AppError {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(format!(
                "Topic sidecar '{}' not found",
                self.path.display()
            )),
            _ => AppError::Io(err),
        }
    }
}

fn render_entry(slug: &str, topic: &str) -> String {
    format!(
        "'{}': '{}'",
        escape_single_quoted(slug),
        escape_single_quoted(topic)
    )
}

/// Insert `entry` as the last member of the object closed by the final `}`.
///
/// Tokenized so braces inside strings and comments after the last entry are
/// never mistaken for structure; a missing separator goes right after the
/// last value token.
fn insert_entry(text: &str, entry: &str) -> Result<String, AppError> {
    let mut lexer = Lexer::new(text);
    let mut previous: Option<Token> = None;
    let mut closing: Option<(usize, Option<Token>)> = None;
    while let Some(token) = lexer.next_token()? {
        if token.is_punct('}') {
            closing = Some((token.span.start, previous.clone()));
        }
        previous = Some(token);
    }
    let (close, last) = closing
        .ok_or_else(|| AppError::BoundaryParse("topic sidecar has no closing '}'".to_string()))?;

    let split = last.as_ref().map_or(close, |token| token.span.end);
    let needs_comma = last
        .as_ref()
        .is_some_and(|token| !token.is_punct(',') && !token.is_punct('{'));

    let mut out = String::with_capacity(text.len() + entry.len() + 8);
    out.push_str(&text[..split]);
    if needs_comma {
        out.push(',');
    }
    out.push_str(text[split..close].trim_end());
    out.push_str("\n  ");
    out.push_str(entry);
    out.push_str(",\n");
    out.push_str(&text[close..]);
    Ok(out)
}
