//! Splicing records into the full file text and persisting it.

use super::document::SourceDocument;
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `span` of `source` with `record_text`.
pub fn splice_record(source: &str, span: Range<usize>, record_text: &str) -> String {
    let mut out = String::with_capacity(source.len() - span.len() + record_text.len());
    out.push_str(&source[..span.start]);
    out.push_str(record_text);
    out.push_str(&source[span.end..]);
    out
}

/// Insert `record_text` as the last element of the enclosing array.
///
/// Keeps the file's separator style: a trailing comma after the previous
/// last record stays a trailing comma after the new one.
pub fn splice_append(source: &str, document: &SourceDocument, record_text: &str) -> String {
    let (at, insertion) = match (document.trailing_comma, document.records.last()) {
        (Some(comma), _) => (comma + 1, format!("\n{},", record_text)),
        (None, Some(last)) => (last.span.end, format!(",\n{}", record_text)),
        // Empty array: whatever sits between the brackets stays ahead of the record.
        (None, None) => {
            let at = document.array_close;
            let lead = if source[..at].ends_with('\n') { "" } else { "\n" };
            (at, format!("{}{}\n", lead, record_text))
        }
    };
    splice_record(source, at..at, &insertion)
}

/// Persist `text` at `path` by writing a sibling temp file and renaming it
/// over the target.
///
/// # Errors
/// Returns [`AppError::Io`] when the temp file cannot be written or renamed.
pub fn commit(path: &Path, text: &str) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        if let Err(err) = fs::set_permissions(tmp.path(), metadata.permissions()) {
            tracing::debug!("Could not carry permissions over to {:?}: {}", path, err);
        }
    }
    tmp.persist(path)?;
    Ok(())
}

/// Hash used to detect concurrent on-disk modification.
pub fn content_hash(text: &str) -> blake3::Hash {
    blake3::hash(text.as_bytes())
}
