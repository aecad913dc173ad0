//! Textual form of new records and whole source files.

use super::escape::{escape_single_quoted, quoted_literal};
use crate::constants::ARTICLES_EXPORT_NAME;
use crate::models::article::{FieldValues, CANONICAL_FIELD_ORDER};
use std::fmt::Write;

/// Indentation of field entries inside a record.
pub(crate) const FIELD_INDENT: &str = "      ";

/// Render one `"<Label>": "<value>",` entry without indentation.
pub(crate) fn field_entry(label: &str, value: &str) -> String {
    format!("{}: {},", quoted_literal(label), quoted_literal(value))
}

/// Build the literal text of a record in canonical field order.
///
/// Labels missing from `values` are written as empty strings. The text
/// starts with the record's indented `{` and ends with its `}`.
pub fn build_record(id: &str, values: &FieldValues) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("  {\n");
    let _ = writeln!(out, "    id: '{}',", escape_single_quoted(id));
    out.push_str("    fields: {\n");
    for label in CANONICAL_FIELD_ORDER {
        let value = values.get(&label).map(String::as_str).unwrap_or_default();
        let _ = writeln!(out, "{}{}", FIELD_INDENT, field_entry(&label.label(), value));
    }
    out.push_str("    }\n  }");
    out
}

/// Render a complete source file holding `records` in order.
pub fn render_source(records: &[(String, FieldValues)]) -> String {
    let body = records
        .iter()
        .map(|(id, values)| build_record(id, values))
        .collect::<Vec<_>>()
        .join(",\n");
    if body.is_empty() {
        format!("export const {} = [\n];\n", ARTICLES_EXPORT_NAME)
    } else {
        format!("export const {} = [\n{}\n];\n", ARTICLES_EXPORT_NAME, body)
    }
}

#[cfg(test)]
mod tests {
    use super::{build_record, render_source};
    use crate::models::article::{FieldLabel, FieldValues};

    #[test]
    fn build_record_uses_canonical_layout() {
        let mut values = FieldValues::new();
        values.insert(FieldLabel::Headline, "Say \"hi\"".to_string());
        values.insert(FieldLabel::DateWritten, "2026-10-19".to_string());
        let text = build_record("rec001", &values);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  {");
        assert_eq!(lines[1], "    id: 'rec001',");
        assert_eq!(lines[2], "    fields: {");
        assert_eq!(lines[3], r#"      "Headline": "Say \"hi\"","#);
        assert_eq!(lines[4], r#"      "Slug": "","#);
        assert_eq!(lines[24], r#"      "Date Written": "2026-10-19","#);
        assert_eq!(lines[25], "    }");
        assert_eq!(lines[26], "  }");
        assert_eq!(lines.len(), 27);
    }

    #[test]
    fn render_source_handles_empty_and_multiple_records() {
        assert_eq!(render_source(&[]), "export const newsData = [\n];\n");
        let two = render_source(&[
            ("rec001".to_string(), FieldValues::new()),
            ("rec002".to_string(), FieldValues::new()),
        ]);
        assert!(two.starts_with("export const newsData = [\n  {\n"));
        assert!(two.contains("  },\n  {\n    id: 'rec002',"));
        assert!(two.ends_with("    }\n  }\n];\n"));
    }
}
