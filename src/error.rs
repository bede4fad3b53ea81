//! Error types for Treehole.

use thiserror::Error;

/// Common error type for Treehole.
#[derive(Error, Debug)]
pub enum TreeholeError {
    /// Database error.
    ///
    /// Transaction and connectivity faults from the storage backend. The driver
    /// message is carried through unmodified.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation on a protected or foreign resource.
    #[error("permission denied: {0}")]
    Permission(String),

    /// The record already exists (e.g. the post is already a favorite).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for TreeholeError {
    fn from(e: sqlx::Error) -> Self {
        TreeholeError::Database(e.to_string())
    }
}

/// Result type alias for Treehole operations.
pub type Result<T> = std::result::Result<T, TreeholeError>;
