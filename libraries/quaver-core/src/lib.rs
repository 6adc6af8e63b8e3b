//! Quaver Core
//!
//! Shared types and traits for the Quaver music library engine.
//!
//! This crate defines the entities persisted by the metadata store
//! (`Directory`, `File`), the transient records used during library scans
//! (`FileMainProps`, `UnreadFile`), the browse-layer aggregates
//! (`Artist`, `Album`, `Track`), the PCM format description (`FormatInfo`),
//! and the `TagReader` trait behind which concrete tag parsers live.

#![forbid(unsafe_code)]

pub mod traits;
pub mod types;

pub use traits::{TagReadError, TagReader};
pub use types::{
    Album, AlbumsOptions, Artist, ArtistsOptions, DecoderKind, Directory, File, FileMainProps,
    FileType, FormatInfo, OutputDevice, SortAlbums, SortArtists, Track, TrackOptions, TrackTags,
    UnreadFile,
};
