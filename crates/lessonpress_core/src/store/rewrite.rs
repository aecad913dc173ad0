//! In-place rewriting of recognized fields inside one record.

use super::builder::{field_entry, FIELD_INDENT};
use super::document::RecordSpan;
use super::escape::quoted_literal;
use crate::models::article::{FieldLabel, FieldValues, CANONICAL_FIELD_ORDER};
use std::ops::Range;

/// Result of rewriting one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenRecord {
    /// Full replacement text for the record's span.
    pub text: String,
    /// Labels whose existing value literal was replaced.
    pub rewritten: Vec<FieldLabel>,
    /// Labels that did not exist in the record and were appended.
    pub appended: Vec<FieldLabel>,
}

/// Rewrite the fields of `record` named in `updates`.
///
/// Each existing entry whose key is a recognized label present in `updates`
/// gets its value literal replaced; keys, separators, whitespace and every
/// unrecognized entry stay byte-identical. Updated labels the record lacks
/// are appended after its last entry in canonical order.
pub fn rewrite_record(source: &str, record: &RecordSpan, updates: &FieldValues) -> RewrittenRecord {
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut rewritten = Vec::new();

    for entry in &record.fields.entries {
        let Some(label) = entry.label else {
            continue;
        };
        if let Some(value) = updates.get(&label) {
            edits.push((entry.value_span.clone(), quoted_literal(value)));
            if !rewritten.contains(&label) {
                rewritten.push(label);
            }
        }
    }

    let appended: Vec<FieldLabel> = CANONICAL_FIELD_ORDER
        .iter()
        .copied()
        .filter(|label| updates.contains_key(label) && !rewritten.contains(label))
        .collect();
    if !appended.is_empty() {
        edits.push(append_edit(source, record, updates, &appended));
    }

    edits.sort_by_key(|(range, _)| range.start);
    let mut text = String::with_capacity(record.span.len() + 256);
    let mut cursor = record.span.start;
    for (range, replacement) in edits {
        text.push_str(&source[cursor..range.start]);
        text.push_str(&replacement);
        cursor = range.end;
    }
    text.push_str(&source[cursor..record.span.end]);

    RewrittenRecord {
        text,
        rewritten,
        appended,
    }
}

fn append_edit(
    source: &str,
    record: &RecordSpan,
    updates: &FieldValues,
    appended: &[FieldLabel],
) -> (Range<usize>, String) {
    let fields = &record.fields;
    let last = fields.entries.last();
    let indent = last
        .map(|entry| line_indent(source, entry.key_span.start))
        .unwrap_or(FIELD_INDENT);

    let mut insertion = String::new();
    let at = match (fields.trailing_comma, last) {
        (Some(comma), _) => comma + 1,
        (None, Some(entry)) => {
            insertion.push(',');
            entry.value_span.end
        }
        (None, None) => fields.open + 1,
    };
    for label in appended {
        insertion.push('\n');
        insertion.push_str(indent);
        insertion.push_str(&field_entry(&label.label(), &updates[label]));
    }
    (at..at, insertion)
}

/// Leading whitespace of the line holding `offset`, when only whitespace
/// precedes `offset` on that line.
fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |newline| newline + 1);
    let prefix = &source[line_start..offset];
    if prefix.chars().all(|ch| ch == ' ' || ch == '\t') {
        prefix
    } else {
        FIELD_INDENT
    }
}
