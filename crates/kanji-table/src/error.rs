//! Error types for table reading.
//!
//! Every failure raised by the crate is a [`TableError`]: a kind, a message
//! and whatever file/row/column/value context was known when it was raised.
//! The rendered form appends the context to the message:
//!
//! ```text
//! convert to UInt failed - file: radicals.txt, line: 7, column: 'Strokes', value: 'x'
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Broad category of a [`TableError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad construction arguments (empty or duplicate declared columns).
    Configuration,
    /// Open or read failure on the underlying file.
    Io,
    /// Header row does not match the declared columns.
    Schema,
    /// Call made in the wrong reader state.
    State,
    /// Field could not be converted to the requested type.
    Value,
    /// Data row has the wrong number of fields.
    Row,
    /// Problem with the data found by code consuming the reader.
    Data,
}

impl ErrorKind {
    /// Returns a short lowercase label for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Io => "io",
            ErrorKind::Schema => "schema",
            ErrorKind::State => "state",
            ErrorKind::Value => "value",
            ErrorKind::Row => "row",
            ErrorKind::Data => "data",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a reader instance.
///
/// Errors remember the reader that attached their context so that the
/// context is never appended twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReaderId(pub(crate) u64);

/// Location details attached to an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// File name (without directories).
    pub file: Option<String>,
    /// 1-based data row number.
    pub row: Option<u64>,
    /// Column name.
    pub column: Option<String>,
    /// Raw field text.
    pub value: Option<String>,
}

impl ErrorContext {
    /// Returns true if no context is present.
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.row.is_none() && self.column.is_none() && self.value.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = " - ";
        if let Some(file) = &self.file {
            write!(f, "{sep}file: {file}")?;
            sep = ", ";
        }
        if let Some(row) = self.row {
            write!(f, "{sep}line: {row}")?;
            sep = ", ";
        }
        if let Some(column) = &self.column {
            write!(f, "{sep}column: '{column}'")?;
            sep = ", ";
        }
        if let Some(value) = &self.value {
            write!(f, "{sep}value: '{value}'")?;
        }
        Ok(())
    }
}

/// Error raised while opening, validating or reading a table.
#[derive(Debug, Error)]
#[error("{message}{context}")]
pub struct TableError {
    kind: ErrorKind,
    message: String,
    context: ErrorContext,
    origin: Option<ReaderId>,
    #[source]
    source: Option<io::Error>,
}

impl TableError {
    /// Create an error of the given kind without context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::default(),
            origin: None,
            source: None,
        }
    }

    /// Create a Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an Io error wrapping `source`.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(ErrorKind::Io, message).with_source(source)
    }

    /// Create a Schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    /// Create a State error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::State, message)
    }

    /// Create a Value error.
    pub fn value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Value, message)
    }

    /// Create a Row error.
    pub fn row(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Row, message)
    }

    /// Create a Data error.
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.context.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_row(mut self, row: u64) -> Self {
        self.context.row = Some(row);
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.context.column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.context.value = Some(value.into());
        self
    }

    #[must_use]
    pub(crate) fn with_source(mut self, source: io::Error) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub(crate) fn with_origin(mut self, origin: ReaderId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Attach file and row context on behalf of `origin`.
    ///
    /// Errors already stamped by `origin` are returned untouched. Any other
    /// error keeps its rendered text as the message and gains the new
    /// context, so context from another reader is preserved.
    pub(crate) fn contextualize(self, file: &str, row: u64, origin: ReaderId) -> Self {
        if self.origin == Some(origin) {
            return self;
        }
        let message = if self.context.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.context)
        };
        Self {
            kind: self.kind,
            message,
            context: ErrorContext {
                file: Some(file.to_string()),
                row: Some(row),
                ..ErrorContext::default()
            },
            origin: Some(origin),
            source: self.source,
        }
    }

    /// Category of the failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message without context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location details attached to the error.
    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// Returns true if the reader identified by `id` attached this context.
    pub fn is_from(&self, id: ReaderId) -> bool {
        self.origin == Some(id)
    }
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
