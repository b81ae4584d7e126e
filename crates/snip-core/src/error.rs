use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors raised while validating core values.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// The column whose uniqueness constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    Original,
    Short,
}

impl Display for UniqueColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueColumn::Original => f.write_str("original url"),
            UniqueColumn::Short => f.write_str("short code"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("duplicate {column}: {value}")]
    Conflict { column: UniqueColumn, value: String },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Coarse classification callers use to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    StorageFailure,
    GenerationExhausted,
}

/// Errors returned by the code store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no free short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Storage(_) => ErrorKind::StorageFailure,
            StoreError::GenerationExhausted { .. } => ErrorKind::GenerationExhausted,
        }
    }
}

/// The shortener operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Shorten,
    Resolve,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Shorten => f.write_str("shorten url"),
            Operation::Resolve => f.write_str("resolve url"),
        }
    }
}

/// A [`StoreError`] annotated with the operation that produced it.
///
/// The underlying error stays reachable through [`ShortenerError::kind`]
/// and [`std::error::Error::source`].
#[derive(Debug, Clone, Error)]
#[error("{operation}: {source}")]
pub struct ShortenerError {
    operation: Operation,
    #[source]
    source: StoreError,
}

impl ShortenerError {
    pub fn new(operation: Operation, source: StoreError) -> Self {
        Self { operation, source }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn store_error(&self) -> &StoreError {
        &self.source
    }
}
