//! Error types for reference data loading.

use std::path::PathBuf;

use kanji_table::TableError;
use thiserror::Error;

/// Errors that can occur while loading or querying reference data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Failure reported by a table or list reader.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Data directory does not exist.
    #[error("data directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Kanji fields failed validation.
    #[error("invalid kanji '{name}': {reason}")]
    InvalidKanji { name: String, reason: String },

    /// The same kanji appears in more than one table.
    #[error("duplicate kanji '{name}' in {file} (already loaded from {first})")]
    DuplicateKanji {
        name: String,
        file: String,
        first: String,
    },

    /// Unrecognized value for an enumerated field.
    #[error("invalid {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

impl DataError {
    pub(crate) fn invalid_kanji(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKanji {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
