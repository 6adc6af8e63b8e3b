//! Domain types shared across the workspace

mod audio;
mod browse;
mod file;
mod tags;

pub use audio::{DecoderKind, FormatInfo, OutputDevice};
pub use browse::{
    Album, AlbumsOptions, Artist, ArtistsOptions, SortAlbums, SortArtists, Track, TrackOptions,
};
pub use file::{Directory, File, FileMainProps, FileType, UnreadFile};
pub use tags::TrackTags;
