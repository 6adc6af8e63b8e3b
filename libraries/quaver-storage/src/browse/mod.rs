//! Browse aggregations over the files table
//!
//! Artist and album rows are derived, never persisted. The grouping key is
//! the "albumartist policy" expression: albumartist when present, falling
//! back to artist, falling back to "Unknown Artist". The empty string counts
//! as absent. All three queries match on the same expression, so every
//! artist returned by [`distinct_artists`] can be drilled into, including
//! the "Unknown Artist" bucket.

use crate::error::Result;
use quaver_core::{
    Album, AlbumsOptions, Artist, ArtistsOptions, FileType, SortAlbums, SortArtists, Track,
    TrackOptions,
};
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;

/// Fallback name for files with neither artist nor albumartist tags
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

fn artist_expr(use_albumartist: bool) -> &'static str {
    if use_albumartist {
        "COALESCE(NULLIF(albumartist, ''), NULLIF(artist, ''), 'Unknown Artist')"
    } else {
        "COALESCE(NULLIF(artist, ''), 'Unknown Artist')"
    }
}

/// Distinct artists with their album counts.
pub async fn distinct_artists(pool: &SqlitePool, opts: &ArtistsOptions) -> Result<Vec<Artist>> {
    let expr = artist_expr(opts.use_albumartist);

    let orderby = match opts.sortby {
        SortArtists::NameAsc => "a ASC",
        SortArtists::NameDesc => "a DESC",
    };

    let rows = sqlx::query(&format!(
        "SELECT {expr} AS a, COUNT(DISTINCT album) AS c \
         FROM files GROUP BY a ORDER BY {orderby}"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Artist::new(row.get("a"), row.get("c")))
        .collect())
}

/// Albums grouped under one artist name.
pub async fn artist_albums(
    pool: &SqlitePool,
    artist_name: &str,
    opts: &AlbumsOptions,
) -> Result<Vec<Album>> {
    let expr = artist_expr(opts.use_albumartist);

    let orderby = match opts.sortby {
        SortAlbums::NameAsc => "album ASC",
        SortAlbums::NameDesc => "album DESC",
        SortAlbums::YearAscNameAsc => "year ASC, album ASC",
        SortAlbums::YearAscNameDesc => "year ASC, album DESC",
        SortAlbums::YearDescNameAsc => "year DESC, album ASC",
        SortAlbums::YearDescNameDesc => "year DESC, album DESC",
    };

    let rows = sqlx::query(&format!(
        "SELECT album, genre, year, COUNT(title) AS c \
         FROM files WHERE {expr} = ? GROUP BY album ORDER BY {orderby}"
    ))
    .bind(artist_name)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Album::new(row.get("album"), row.get("genre"), row.get("year"), row.get("c")))
        .collect())
}

/// Tracks of one album under one artist, ordered by disc then track number.
pub async fn album_tracks(
    pool: &SqlitePool,
    artist_name: &str,
    album_title: &str,
    opts: &TrackOptions,
) -> Result<Vec<Track>> {
    let expr = artist_expr(opts.use_albumartist);

    let rows = sqlx::query(&format!(
        "SELECT id, dir_id, filename, fulldir_path, title, track_number, \
         disc_number, length, bitrate, filesize, filetype \
         FROM files WHERE {expr} = ? AND album = ? \
         ORDER BY disc_number ASC, track_number ASC"
    ))
    .bind(artist_name)
    .bind(album_title)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Track {
            file_id: row.get("id"),
            dir_id: row.get("dir_id"),
            filename: PathBuf::from(row.get::<String, _>("filename")),
            fulldir_path: PathBuf::from(row.get::<String, _>("fulldir_path")),
            title: row.get("title"),
            track_number: row.get("track_number"),
            disc_number: row.get("disc_number"),
            length: row.get("length"),
            bitrate: row.get("bitrate"),
            filesize: row.get("filesize"),
            filetype: FileType::from_i64(row.get("filetype")),
        })
        .collect())
}
