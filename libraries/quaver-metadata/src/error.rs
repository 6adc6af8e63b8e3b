/// Metadata-specific errors
use quaver_core::TagReadError;
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Tag parsing failed
    #[error("Cannot read tags: {0}")]
    CannotReadTags(String),
}

impl From<MetadataError> for TagReadError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FileNotFound(path) => TagReadError::FileNotFound(path),
            MetadataError::CannotReadTags(msg) => TagReadError::CannotReadTags(msg),
        }
    }
}
