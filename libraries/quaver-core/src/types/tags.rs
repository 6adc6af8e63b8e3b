/// Metadata extracted from an audio file's tags
use serde::{Deserialize, Serialize};

/// Tag values read from a single audio file.
///
/// Missing string tags are empty strings and missing numeric tags are zero,
/// matching the store's NOT NULL schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub albumartist: String,
    pub track_number: i64,
    pub disc_number: i64,
    pub year: i64,
    pub genre: String,
    /// Duration in whole seconds
    pub length: i64,
    /// Bitrate in kbps
    pub bitrate: i64,
}

impl TrackTags {
    pub fn new() -> Self {
        Self::default()
    }
}
