/// Playback-specific errors
use quaver_core::FileType;
use thiserror::Error;

/// Result type alias using `PlaybackError`
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Playback error types
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Enqueue target does not exist in the store
    #[error("File not found: {0}")]
    FileNotFound(i64),

    /// Dequeue from an empty queue
    #[error("Queue is empty")]
    QueueIsEmpty,

    /// Queue index out of bounds
    #[error("Invalid queue index: {0}")]
    InvalidIndex(usize),

    /// No decoder backend for this file type
    #[error("No decoder for file type: {0:?}")]
    DecoderNotFound(FileType),

    /// Opening or configuring the decoder failed
    #[error("Failed to initialize decoder: {0}")]
    FailedToInitDecoder(String),

    /// Transport command requires an active playback
    #[error("Playback is not active")]
    NotActive,

    /// Playback is already running
    #[error("Playback is already active")]
    AlreadyActive,

    /// Playback is already paused
    #[error("Playback is already paused")]
    AlreadyPaused,

    /// Resume without a pause
    #[error("Playback is not paused")]
    NotPaused,

    /// `play` requires a loaded file
    #[error("No file loaded")]
    NoFileLoaded,

    /// Pause/resume toggled again inside the debounce window
    #[error("Pause toggle within cooldown window")]
    Cooldown,

    /// Seek target outside `[0, track length]`
    #[error("Seek target out of range: {0} s")]
    OffsetOutOfRange(i64),

    /// Metadata store failure
    #[error(transparent)]
    Storage(#[from] quaver_storage::StorageError),

    /// Decoder failure
    #[error(transparent)]
    Audio(#[from] quaver_audio::AudioError),

    /// Output sink failure
    #[error(transparent)]
    Output(#[from] quaver_output::OutputError),
}
