//! Traits for pluggable collaborators

use crate::types::TrackTags;
use std::path::Path;
use thiserror::Error;

/// Failure to extract tags from a file.
///
/// Tag errors are non-fatal to a library scan: the offending file is logged
/// and skipped.
#[derive(Debug, Error)]
pub enum TagReadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Cannot read tags: {0}")]
    CannotReadTags(String),
}

/// Extracts metadata from a single audio file.
///
/// The concrete parser lives behind this trait so the scanner can be
/// exercised without real audio fixtures.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<TrackTags, TagReadError>;
}
