/// Decoder-specific errors
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types, one kind per decoder operation
#[derive(Error, Debug)]
pub enum AudioError {
    /// Failed to open or probe a file
    #[error("Open error: {0}")]
    Open(String),

    /// Decoding a packet failed; fatal to the current track
    #[error("Decode error: {0}")]
    Decode(String),

    /// Format negotiation failed
    #[error("Format error: {0}")]
    Format(String),

    /// Seek failed or target is unreachable
    #[error("Seek error: {0}")]
    Seek(String),

    /// No file is currently open
    #[error("No file open for streaming decode")]
    NoFileOpen,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
