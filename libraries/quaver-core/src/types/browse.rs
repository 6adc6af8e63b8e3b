/// Browse-layer aggregates derived from the files table
use super::FileType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single playable track inside an album view.
///
/// Carries just enough of the underlying file row to enqueue and play it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub file_id: i64,
    pub dir_id: i64,
    pub filename: PathBuf,
    pub fulldir_path: PathBuf,
    pub title: String,
    pub track_number: i64,
    pub disc_number: i64,
    pub length: i64,
    pub bitrate: i64,
    pub filesize: i64,
    pub filetype: FileType,
}

/// An album under one artist, with its tracks loaded on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    pub genre: String,
    pub year: i64,
    pub track_count: i64,
    pub tracks: Vec<Track>,
}

impl Album {
    pub fn new(title: String, genre: String, year: i64, track_count: i64) -> Self {
        Self {
            title,
            genre,
            year,
            track_count,
            tracks: Vec::with_capacity(track_count.max(0) as usize),
        }
    }
}

/// An artist row in the browse hierarchy, with albums loaded on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub album_count: i64,
    pub albums: Vec<Album>,
}

impl Artist {
    pub fn new(name: String, album_count: i64) -> Self {
        Self {
            name,
            album_count,
            albums: Vec::new(),
        }
    }
}

/// Sort order for the artist list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortArtists {
    #[default]
    NameAsc,
    NameDesc,
}

/// Sort order for an artist's albums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortAlbums {
    NameAsc,
    NameDesc,
    #[default]
    YearAscNameAsc,
    YearDescNameAsc,
    YearAscNameDesc,
    YearDescNameDesc,
}

/// Options for the distinct-artists aggregation
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtistsOptions {
    pub sortby: SortArtists,
    pub use_albumartist: bool,
}

/// Options for the artist-albums aggregation
#[derive(Debug, Clone, Copy, Default)]
pub struct AlbumsOptions {
    pub sortby: SortAlbums,
    pub use_albumartist: bool,
}

/// Options for the album-tracks query. Tracks are always ordered by
/// `(disc_number, track_number)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackOptions {
    pub use_albumartist: bool,
}
