//! Error types for quiz store operations.
//!
//! Provides a unified error type covering lookups, input validation, and
//! storage failures, plus the coarse [`ErrorKind`] a request boundary needs
//! to pick a client or server error response.

use quiz_store_core::ValidationError;
use quiz_store_db::DatabaseError;
use thiserror::Error;

/// Errors that can occur during quiz store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// No question body row has the requested id.
    #[error("question not found: {0}")]
    QuestionNotFound(i64),

    /// No option row has the requested id.
    #[error("option not found: {0}")]
    OptionNotFound(i64),

    /// A link row points at an option row that does not exist.
    #[error("question {question_id} links to missing option {option_id}")]
    DanglingLink { question_id: i64, option_id: i64 },

    /// Caller-supplied input was rejected before any write.
    #[error("validation error: {0}")]
    ValidationError(#[from] ValidationError),

    /// Schema creation failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Error loading a question bank.
    #[error("loader error: {0}")]
    LoaderError(#[from] DatabaseError),
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A lookup by id matched zero rows.
    NotFound,
    /// The input was malformed.
    Validation,
    /// The underlying storage failed or is inconsistent.
    Persistence,
}

impl StoreError {
    /// Classifies the error.
    ///
    /// Bank files that cannot be parsed or do not validate count as
    /// validation errors; failing to read them is a persistence error.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiz_store_sqlite::{ErrorKind, StoreError};
    ///
    /// assert_eq!(StoreError::QuestionNotFound(3).kind(), ErrorKind::NotFound);
    /// assert_eq!(
    ///     StoreError::DanglingLink { question_id: 1, option_id: 2 }.kind(),
    ///     ErrorKind::Persistence
    /// );
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::QuestionNotFound(_) | Self::OptionNotFound(_) => ErrorKind::NotFound,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::LoaderError(err) => match err {
                DatabaseError::IoError(_) => ErrorKind::Persistence,
                DatabaseError::JsonError(_)
                | DatabaseError::YamlError(_)
                | DatabaseError::UnsupportedFormat(_)
                | DatabaseError::InvalidBank { .. }
                | DatabaseError::NoBanksFound(_) => ErrorKind::Validation,
            },
            Self::DatabaseError(_) | Self::DanglingLink { .. } | Self::MigrationError(_) => {
                ErrorKind::Persistence
            }
        }
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
