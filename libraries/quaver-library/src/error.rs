/// Library-layer errors
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Metadata store failed; fatal to the current operation
    #[error(transparent)]
    Storage(#[from] quaver_storage::StorageError),

    /// A registered root directory is missing on disk
    #[error("Scan root does not exist: {0}")]
    RootNotFound(String),

    /// Browser index past the end of the cached artist list
    #[error("Artist index out of range: {0}")]
    ArtistIndexOutOfRange(usize),

    /// I/O error while walking a directory tree
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
