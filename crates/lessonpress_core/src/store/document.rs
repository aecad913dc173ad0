//! Parsed view of the article source file with byte spans for every record.
//!
//! Grammar: `<prelude> [ {record} (, {record})* ,? ] <rest>` where a record is
//! `{ id: '<id>', fields: { "<Label>": "<value>", ... } }`. The prelude and
//! everything after the closing `]` are never interpreted.

use super::lexer::{Lexer, Token, TokenKind};
use crate::error::AppError;
use crate::models::article::{ArticleRecord, FieldLabel};
use std::ops::Range;

/// One `"<Label>": "<value>"` entry of a record's `fields` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub key: String,
    pub label: Option<FieldLabel>,
    pub value: String,
    pub key_span: Range<usize>,
    pub value_span: Range<usize>,
}

/// The `fields: { ... }` object of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldsObject {
    pub open: usize,
    pub close: usize,
    pub entries: Vec<FieldEntry>,
    /// Offset of a comma that follows the last entry, if any.
    pub trailing_comma: Option<usize>,
}

/// Location and content of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpan {
    pub id: String,
    /// From the record's `{` through its matching `}`.
    pub span: Range<usize>,
    pub fields: FieldsObject,
}

impl RecordSpan {
    pub fn to_record(&self) -> ArticleRecord {
        ArticleRecord {
            id: self.id.clone(),
            fields: self
                .fields
                .entries
                .iter()
                .map(|entry| (entry.key.clone(), entry.value.clone()))
                .collect(),
        }
    }

    /// Decoded value of the first entry carrying `label`.
    pub fn value(&self, label: FieldLabel) -> Option<&str> {
        self.fields
            .entries
            .iter()
            .find(|entry| entry.label == Some(label))
            .map(|entry| entry.value.as_str())
    }
}

/// Structure of a whole source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub records: Vec<RecordSpan>,
    /// Offset of the enclosing array's `[`.
    pub array_open: usize,
    /// Offset of the enclosing array's `]`.
    pub array_close: usize,
    /// Offset of a comma that follows the last record, if any.
    pub trailing_comma: Option<usize>,
}

impl SourceDocument {
    /// Parse `text` into records.
    ///
    /// # Errors
    /// Returns [`AppError::BoundaryParse`] when the file deviates from the
    /// record grammar.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        Parser::new(text).parse_document()
    }

    /// Find the first record whose id equals `id`.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when no record carries `id`.
    pub fn locate(&self, id: &str) -> Result<&RecordSpan, AppError> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Article with id '{}' not found", id)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.id.as_str())
    }
}

/// Return the exact byte span of record `id` inside `text`.
///
/// # Errors
/// [`AppError::NotFound`] for unknown ids, [`AppError::BoundaryParse`] for
/// malformed files.
pub fn locate(text: &str, id: &str) -> Result<Range<usize>, AppError> {
    let document = SourceDocument::parse(text)?;
    Ok(document.locate(id)?.span.clone())
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    len: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lexer: Lexer::new(text),
            len: text.len(),
        }
    }

    fn next(&mut self, expected: &str) -> Result<Token, AppError> {
        self.lexer.next_token()?.ok_or_else(|| {
            AppError::boundary_at(self.len, format!("expected {} before end of file", expected))
        })
    }

    fn expect_punct(&mut self, expected: char) -> Result<Token, AppError> {
        let token = self.next(&format!("'{}'", expected))?;
        if token.is_punct(expected) {
            Ok(token)
        } else {
            Err(unexpected(&token, &format!("'{}'", expected)))
        }
    }

    fn expect_string(&mut self) -> Result<(String, Range<usize>), AppError> {
        let token = self.next("string literal")?;
        match token.kind {
            TokenKind::Str(value) => Ok((value, token.span)),
            _ => Err(unexpected(&token, "string literal")),
        }
    }

    fn parse_document(mut self) -> Result<SourceDocument, AppError> {
        let array_open = loop {
            match self.lexer.next_token()? {
                Some(token) if token.is_punct('[') => break token.span.start,
                Some(_) => continue,
                None => {
                    return Err(AppError::BoundaryParse(
                        "no enclosing array found".to_string(),
                    ))
                }
            }
        };

        let mut records = Vec::new();
        let mut trailing_comma = None;
        let array_close = loop {
            let token = self.next("record or ']'")?;
            match token.kind {
                TokenKind::Punct(']') => break token.span.start,
                TokenKind::Punct('{') => {
                    trailing_comma = None;
                    records.push(self.parse_record(token.span.start)?);
                    let separator = self.next("',' or ']'")?;
                    match separator.kind {
                        TokenKind::Punct(',') => trailing_comma = Some(separator.span.start),
                        TokenKind::Punct(']') => break separator.span.start,
                        _ => return Err(unexpected(&separator, "',' or ']'")),
                    }
                }
                _ => return Err(unexpected(&token, "record or ']'")),
            }
        };

        Ok(SourceDocument {
            records,
            array_open,
            array_close,
            trailing_comma,
        })
    }

    fn parse_record(&mut self, open: usize) -> Result<RecordSpan, AppError> {
        let mut id = None;
        let mut fields = None;
        let close = loop {
            let token = self.next("record key or '}'")?;
            let key = match token.kind {
                TokenKind::Punct('}') => break token.span.end,
                TokenKind::Word(ref key) | TokenKind::Str(ref key) => key.clone(),
                _ => return Err(unexpected(&token, "record key or '}'")),
            };
            self.expect_punct(':')?;
            match key.as_str() {
                "id" => id = Some(self.expect_string()?.0),
                "fields" => {
                    let brace = self.expect_punct('{')?;
                    fields = Some(self.parse_fields(brace.span.start)?);
                }
                other => {
                    return Err(AppError::boundary_at(
                        token.span.start,
                        format!("unexpected record key '{}'", other),
                    ))
                }
            }
            let separator = self.next("',' or '}'")?;
            match separator.kind {
                TokenKind::Punct(',') => continue,
                TokenKind::Punct('}') => break separator.span.end,
                _ => return Err(unexpected(&separator, "',' or '}'")),
            }
        };

        let id = id.ok_or_else(|| AppError::boundary_at(open, "record without an id"))?;
        let fields = fields.ok_or_else(|| {
            AppError::boundary_at(open, format!("record '{}' has no fields object", id))
        })?;
        Ok(RecordSpan {
            id,
            span: open..close,
            fields,
        })
    }

    fn parse_fields(&mut self, open: usize) -> Result<FieldsObject, AppError> {
        let mut entries = Vec::new();
        let mut trailing_comma = None;
        let close = loop {
            let token = self.next("field label or '}'")?;
            let key = match token.kind {
                TokenKind::Punct('}') => break token.span.start,
                TokenKind::Word(ref key) | TokenKind::Str(ref key) => key.clone(),
                _ => return Err(unexpected(&token, "field label or '}'")),
            };
            self.expect_punct(':')?;
            let (value, value_span) = self.expect_string()?;
            entries.push(FieldEntry {
                label: FieldLabel::parse(&key),
                key,
                value,
                key_span: token.span,
                value_span,
            });
            trailing_comma = None;

            let separator = self.next("',' or '}'")?;
            match separator.kind {
                TokenKind::Punct(',') => trailing_comma = Some(separator.span.start),
                TokenKind::Punct('}') => break separator.span.start,
                _ => return Err(unexpected(&separator, "',' or '}'")),
            }
        };
        Ok(FieldsObject {
            open,
            close,
            entries,
            trailing_comma,
        })
    }
}

fn unexpected(token: &Token, expected: &str) -> AppError {
    AppError::boundary_at(
        token.span.start,
        format!("expected {}, found {}", expected, token.describe()),
    )
}
