//! Error types for Dropslot.

use thiserror::Error;

/// Common error type for Dropslot.
#[derive(Error, Debug)]
pub enum DropslotError {
    /// Database error.
    ///
    /// Generic database error wrapping failures from sqlx.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Access code collision on insert.
    ///
    /// Recovered internally by regenerating the code; never surfaced
    /// to API callers.
    #[error("access code already exists")]
    DuplicateAccessCode,

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for DropslotError {
    fn from(e: sqlx::Error) -> Self {
        // Surface UNIQUE violations distinctly so access code generation
        // can retry instead of failing the upload.
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DropslotError::DuplicateAccessCode;
            }
        }
        DropslotError::Database(e.to_string())
    }
}

/// Result type alias for Dropslot operations.
pub type Result<T> = std::result::Result<T, DropslotError>;
