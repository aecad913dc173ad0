//! Shared test-only helpers for lessonpress_core.

use crate::config::IdRange;
use crate::models::article::{ArticleFields, FieldLabel, FieldValues};
use crate::store::builder::render_source;
use crate::store::ArticleStore;
use std::path::PathBuf;
use tempfile::TempDir;

/// Field values for a small record with headline and slug set.
pub(crate) fn sample_values(headline: &str, slug: &str) -> FieldValues {
    let mut values = FieldValues::new();
    values.insert(FieldLabel::Headline, headline.to_string());
    values.insert(FieldLabel::Slug, slug.to_string());
    values.insert(FieldLabel::Text(1), format!("{} level one.", headline));
    values
}

/// Source text holding one record per id, in order.
pub(crate) fn sample_source(ids: &[&str]) -> String {
    let records: Vec<(String, FieldValues)> = ids
        .iter()
        .map(|id| {
            (
                id.to_string(),
                sample_values(&format!("Headline {}", id), &format!("slug-{}", id)),
            )
        })
        .collect();
    render_source(&records)
}

/// Creates a temp dir holding `newsData.js` with `source` and a store on it.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing file.
///
/// # Panics
/// Panics if the temp dir or file cannot be created.
pub(crate) fn setup_temp_store(source: &str) -> (ArticleStore, PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("newsData.js");
    std::fs::write(&path, source).expect("write source");
    let store = ArticleStore::new(&path, IdRange::default());
    (store, path, temp_dir)
}

pub(crate) fn fields_with(headline: &str, slug: &str) -> ArticleFields {
    ArticleFields {
        headline: Some(headline.to_string()),
        slug: Some(slug.to_string()),
        ..ArticleFields::default()
    }
}

pub(crate) fn file_hash(path: &std::path::Path) -> blake3::Hash {
    blake3::hash(&std::fs::read(path).expect("read file"))
}
