//! Application error types for the record store and save flow.
use thiserror::Error;

/// Top-level application error type.
///
/// Each variant maps 1:1 to an HTTP status at the request boundary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unexpected source file structure: {0}")]
    BoundaryParse(String),

    #[error("{0}")]
    Conflict(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    /// Build a [`AppError::BoundaryParse`] that names the byte offset where
    /// the source file stopped matching the record grammar.
    pub fn boundary_at(offset: usize, detail: impl std::fmt::Display) -> Self {
        Self::BoundaryParse(format!("{} (at byte {})", detail, offset))
    }
}

impl From<tempfile::PersistError> for AppError {
    fn from(value: tempfile::PersistError) -> Self {
        Self::Io(value.error)
    }
}
