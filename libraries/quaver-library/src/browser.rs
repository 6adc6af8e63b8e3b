//! Browse view over the metadata store
//!
//! Builds and caches the artist → album → track hierarchy. Artist grouping
//! follows the albumartist policy configured at construction time.

use crate::error::{LibraryError, Result};
use quaver_core::{
    AlbumsOptions, Artist, ArtistsOptions, SortAlbums, SortArtists, TrackOptions,
};
use sqlx::SqlitePool;

/// Stateful browse layer with a cached artist list.
pub struct Browser {
    pool: SqlitePool,
    use_albumartist: bool,
    artists_sort: SortArtists,
    albums_sort: SortAlbums,
    artists: Vec<Artist>,
}

impl Browser {
    /// Create a browser with the default configuration: albumartist grouping
    /// on, artists by name ascending, albums by year then name ascending.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            use_albumartist: true,
            artists_sort: SortArtists::NameAsc,
            albums_sort: SortAlbums::YearAscNameAsc,
            artists: Vec::new(),
        }
    }

    /// The cached artist list. Empty until [`init_artists`](Self::init_artists) runs.
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn is_using_albumartist(&self) -> bool {
        self.use_albumartist
    }

    pub fn artists_sort(&self) -> SortArtists {
        self.artists_sort
    }

    pub fn albums_sort(&self) -> SortAlbums {
        self.albums_sort
    }

    /// Switch the albumartist grouping policy. Invalidates the cache.
    pub fn set_use_albumartist(&mut self, use_albumartist: bool) {
        self.use_albumartist = use_albumartist;
        self.artists.clear();
    }

    /// Change the artist sort order. Invalidates the cache.
    pub fn set_artists_sort(&mut self, sort: SortArtists) {
        self.artists_sort = sort;
        self.artists.clear();
    }

    pub fn set_albums_sort(&mut self, sort: SortAlbums) {
        self.albums_sort = sort;
    }

    /// Populate the cached artist list.
    pub async fn init_artists(&mut self) -> Result<()> {
        let opts = ArtistsOptions {
            sortby: self.artists_sort,
            use_albumartist: self.use_albumartist,
        };

        self.artists = quaver_storage::browse::distinct_artists(&self.pool, &opts).await?;

        Ok(())
    }

    /// Load an artist's albums and each album's tracks, in query order.
    pub async fn load_artist_albums(&self, artist: &mut Artist) -> Result<()> {
        let albums_opts = AlbumsOptions {
            sortby: self.albums_sort,
            use_albumartist: self.use_albumartist,
        };
        let track_opts = TrackOptions {
            use_albumartist: self.use_albumartist,
        };

        artist.albums =
            quaver_storage::browse::artist_albums(&self.pool, &artist.name, &albums_opts).await?;

        for album in &mut artist.albums {
            album.tracks = quaver_storage::browse::album_tracks(
                &self.pool,
                &artist.name,
                &album.title,
                &track_opts,
            )
            .await?;
        }

        Ok(())
    }

    /// Load albums for the artist at `index` in the cached list.
    pub async fn load_artist_albums_at(&mut self, index: usize) -> Result<&Artist> {
        if index >= self.artists.len() {
            return Err(LibraryError::ArtistIndexOutOfRange(index));
        }

        let mut artist = self.artists[index].clone();
        self.load_artist_albums(&mut artist).await?;
        self.artists[index] = artist;

        Ok(&self.artists[index])
    }
}
