//! Escaping for values embedded in quoted string literals.

/// Escape `value` for use between double quotes.
///
/// Backslashes are escaped first so the escapes added afterwards are not
/// doubled.
pub fn escape_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Render `value` as a complete double-quoted literal.
pub fn quoted_literal(value: &str) -> String {
    format!("\"{}\"", escape_literal(value))
}

/// Escape `value` for use between single quotes.
pub fn escape_single_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
