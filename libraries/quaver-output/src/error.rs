/// Output-specific errors
use thiserror::Error;

/// Result type alias using `OutputError`
pub type Result<T> = std::result::Result<T, OutputError>;

/// Output error types
#[derive(Error, Debug)]
pub enum OutputError {
    /// No usable output device
    #[error("Audio device not found: {0}")]
    DeviceNotFound(String),

    /// Backend stream construction failed
    #[error("Failed to build audio stream: {0}")]
    StreamBuild(String),

    /// Operation requires `init` first
    #[error("Output backend not initialized")]
    NotInitialized,

    /// Operation requires an open sink
    #[error("Output sink not open")]
    NotOpen,

    /// Transport operation issued from the wrong state
    #[error("Invalid output state: {0}")]
    InvalidState(&'static str),

    /// The requested PCM format cannot be played
    #[error("Unsupported PCM format: {0}")]
    UnsupportedFormat(String),

    /// Backend stream operation failed
    #[error("Stream error: {0}")]
    Stream(String),

    /// The audio thread is gone
    #[error("Audio backend thread terminated")]
    BackendGone,
}
