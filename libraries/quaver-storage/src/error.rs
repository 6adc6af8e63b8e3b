/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// A directory with this path is already registered
    #[error("Directory path already exists: {0}")]
    PathAlreadyExists(String),

    /// A file row with this (dir_id, fulldir_path, filename) already exists
    #[error("File already exists: {0}")]
    FileAlreadyExists(String),

    /// A referenced directory row is absent
    #[error("Directory not found: {0}")]
    DirectoryNotFound(i64),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
