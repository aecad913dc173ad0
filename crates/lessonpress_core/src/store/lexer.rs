//! Tokenizer for the object-literal subset used by the article source file.

use crate::error::AppError;
use std::ops::Range;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Any single non-word, non-quote character such as `{`, `:` or `]`.
    Punct(char),
    /// Identifier or number.
    Word(String),
    /// Decoded string literal value.
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn is_punct(&self, expected: char) -> bool {
        self.kind == TokenKind::Punct(expected)
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Punct(ch) => format!("'{}'", ch),
            TokenKind::Word(word) => format!("'{}'", word),
            TokenKind::Str(_) => "string literal".to_string(),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Pull-based lexer; tokens after the region a caller cares about are never
/// scanned.
pub(crate) struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_trivia(&mut self) -> Result<(), AppError> {
        loop {
            let rest = &self.src[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with("//") {
                self.pos = match trimmed.find('\n') {
                    Some(newline) => self.pos + newline + 1,
                    None => self.src.len(),
                };
            } else if let Some(body) = trimmed.strip_prefix("/*") {
                let Some(end) = body.find("*/") else {
                    return Err(AppError::boundary_at(self.pos, "unterminated block comment"));
                };
                self.pos += end + 4;
            } else {
                return Ok(());
            }
        }
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, AppError> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(ch) = self.src[start..].chars().next() else {
            return Ok(None);
        };
        let token = match ch {
            '"' | '\'' => self.lex_string(ch)?,
            ch if is_word_char(ch) => {
                let len = self.src[start..]
                    .find(|c: char| !is_word_char(c))
                    .unwrap_or(self.src.len() - start);
                self.pos = start + len;
                Token {
                    kind: TokenKind::Word(self.src[start..self.pos].to_string()),
                    span: start..self.pos,
                }
            }
            other => {
                self.pos = start + other.len_utf8();
                Token {
                    kind: TokenKind::Punct(other),
                    span: start..self.pos,
                }
            }
        };
        Ok(Some(token))
    }

    fn lex_string(&mut self, quote: char) -> Result<Token, AppError> {
        let start = self.pos;
        let body_start = start + quote.len_utf8();
        let mut value = String::new();
        let mut chars = self.src[body_start..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            let absolute = body_start + offset;
            match ch {
                c if c == quote => {
                    self.pos = absolute + c.len_utf8();
                    return Ok(Token {
                        kind: TokenKind::Str(value),
                        span: start..self.pos,
                    });
                }
                '\\' => decode_escape(&mut chars, &mut value)
                    .map_err(|detail| AppError::boundary_at(absolute, detail))?,
                '\n' | '\r' => {
                    return Err(AppError::boundary_at(
                        absolute,
                        "line break inside string literal",
                    ))
                }
                other => value.push(other),
            }
        }
        Err(AppError::boundary_at(start, "unterminated string literal"))
    }
}

fn read_hex(chars: &mut CharIndices<'_>, digits: usize) -> Option<u32> {
    let mut code = 0u32;
    for _ in 0..digits {
        let (_, ch) = chars.next()?;
        code = code * 16 + ch.to_digit(16)?;
    }
    Some(code)
}

fn decode_escape(chars: &mut CharIndices<'_>, out: &mut String) -> Result<(), &'static str> {
    let Some((_, escaped)) = chars.next() else {
        return Err("dangling escape at end of input");
    };
    match escaped {
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'b' => out.push('\u{8}'),
        'f' => out.push('\u{c}'),
        'v' => out.push('\u{b}'),
        '0' => out.push('\0'),
        'x' => {
            let code = read_hex(chars, 2).ok_or("invalid \\x escape")?;
            out.push(char::from_u32(code).ok_or("invalid \\x escape")?);
        }
        'u' => {
            let code = read_hex(chars, 4).ok_or("invalid \\u escape")?;
            out.push(decode_utf16_escape(code, chars));
        }
        // Line continuation.
        '\n' => {}
        '\r' => {
            let mut lookahead = chars.clone();
            if matches!(lookahead.next(), Some((_, '\n'))) {
                *chars = lookahead;
            }
        }
        other => out.push(other),
    }
    Ok(())
}

/// Combine a `\uD8xx\uDCxx` surrogate pair; lone surrogates become U+FFFD.
fn decode_utf16_escape(code: u32, chars: &mut CharIndices<'_>) -> char {
    if !(0xD800..=0xDBFF).contains(&code) {
        return char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
    }
    let mut lookahead = chars.clone();
    let low = match (lookahead.next(), lookahead.next()) {
        (Some((_, '\\')), Some((_, 'u'))) => read_hex(&mut lookahead, 4),
        _ => None,
    };
    match low {
        Some(low) if (0xDC00..=0xDFFF).contains(&low) => {
            *chars = lookahead;
            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER)
        }
        _ => char::REPLACEMENT_CHARACTER,
    }
}
