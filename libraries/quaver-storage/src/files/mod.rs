//! Indexed audio files
//!
//! A file row is uniquely identified by `(dir_id, fulldir_path, filename)`.
//! Missing tag values are stored as empty strings, never NULL; readers get
//! back exactly what was written.

use crate::error::{Result, StorageError};
use quaver_core::{File, FileMainProps, FileType};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const FILE_COLUMNS: &str = "id, dir_id, filename, fulldir_path, created_time, modified_time, \
     title, album, artist, albumartist, track_number, disc_number, year, genre, \
     length, bitrate, filesize, filetype";

fn map_file(row: &SqliteRow) -> File {
    File {
        id: row.get("id"),
        dir_id: row.get("dir_id"),
        filename: PathBuf::from(row.get::<String, _>("filename")),
        fulldir_path: PathBuf::from(row.get::<String, _>("fulldir_path")),
        created_time: row.get("created_time"),
        modified_time: row.get("modified_time"),
        title: row.get("title"),
        album: row.get("album"),
        artist: row.get("artist"),
        albumartist: row.get("albumartist"),
        track_number: row.get("track_number"),
        disc_number: row.get("disc_number"),
        year: row.get("year"),
        genre: row.get("genre"),
        length: row.get("length"),
        bitrate: row.get("bitrate"),
        filesize: row.get("filesize"),
        filetype: FileType::from_i64(row.get("filetype")),
    }
}

/// Insert a new file row, returning its generated id.
///
/// # Errors
///
/// Returns `FileAlreadyExists` when a row with the same
/// `(dir_id, fulldir_path, filename)` is already present.
pub async fn add(pool: &SqlitePool, file: &File) -> Result<i64> {
    let filename = file.filename.to_string_lossy().to_string();
    let fulldir_path = file.fulldir_path.to_string_lossy().to_string();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM files WHERE dir_id = ? AND fulldir_path = ? AND filename = ?",
    )
    .bind(file.dir_id)
    .bind(&fulldir_path)
    .bind(&filename)
    .fetch_one(pool)
    .await?;

    if count > 0 {
        return Err(StorageError::FileAlreadyExists(
            file.fullpath().to_string_lossy().to_string(),
        ));
    }

    let result = sqlx::query(
        "INSERT INTO files (
            dir_id, fulldir_path, filename, title, album,
            artist, albumartist, track_number,
            disc_number, year, genre, length, bitrate,
            filesize, filetype, created_time, modified_time
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(file.dir_id)
    .bind(&fulldir_path)
    .bind(&filename)
    .bind(&file.title)
    .bind(&file.album)
    .bind(&file.artist)
    .bind(&file.albumartist)
    .bind(file.track_number)
    .bind(file.disc_number)
    .bind(file.year)
    .bind(&file.genre)
    .bind(file.length)
    .bind(file.bitrate)
    .bind(file.filesize)
    .bind(file.filetype.as_i64())
    .bind(file.created_time)
    .bind(file.modified_time)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get a file by id.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<File>> {
    let row = sqlx::query(&format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| map_file(&row)))
}

/// Get a file by its absolute containing directory and filename.
pub async fn get_by_path(
    pool: &SqlitePool,
    fulldir_path: impl AsRef<Path>,
    filename: impl AsRef<Path>,
) -> Result<Option<File>> {
    let row = sqlx::query(&format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE fulldir_path = ? AND filename = ?"
    ))
    .bind(fulldir_path.as_ref().to_string_lossy().to_string())
    .bind(filename.as_ref().to_string_lossy().to_string())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| map_file(&row)))
}

/// Get a file by registered directory, subpath relative to its root, and
/// filename.
///
/// # Errors
///
/// Returns `DirectoryNotFound` when `dir_id` does not resolve.
pub async fn get_by_dir_path(
    pool: &SqlitePool,
    dir_id: i64,
    subdir_path: impl AsRef<Path>,
    filename: impl AsRef<Path>,
) -> Result<Option<File>> {
    let dir = crate::directories::get(pool, dir_id)
        .await?
        .ok_or(StorageError::DirectoryNotFound(dir_id))?;

    let fulldir_path = dir.path.join(subdir_path.as_ref());
    get_by_path(pool, fulldir_path, filename).await
}

/// Fetch many files with a single `IN`-list query.
///
/// Rows come back in result-set order, not in the order of `ids`.
pub async fn get_batch(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<File>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(",");
    let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE id IN ({placeholders})");

    let mut query = sqlx::query(&sql);
    for &id in ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;

    Ok(rows.iter().map(map_file).collect())
}

/// All files under a registered directory.
pub async fn by_dir(pool: &SqlitePool, dir_id: i64) -> Result<Vec<File>> {
    let rows = sqlx::query(&format!("SELECT {FILE_COLUMNS} FROM files WHERE dir_id = ?"))
        .bind(dir_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(map_file).collect())
}

/// All files under a registered directory, keyed by id.
pub async fn by_dir_map(pool: &SqlitePool, dir_id: i64) -> Result<HashMap<i64, File>> {
    let files = by_dir(pool, dir_id).await?;
    Ok(files.into_iter().map(|f| (f.id, f)).collect())
}

/// The change-detection projection of every file under a directory, keyed by
/// full path. This is what the scanner diffs the filesystem against.
pub async fn main_props_by_dir(
    pool: &SqlitePool,
    dir_id: i64,
) -> Result<HashMap<PathBuf, FileMainProps>> {
    let rows = sqlx::query(
        "SELECT id, dir_id, filename, fulldir_path, created_time, modified_time, \
         filesize, filetype FROM files WHERE dir_id = ?",
    )
    .bind(dir_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let props = FileMainProps {
                id: row.get("id"),
                dir_id: row.get("dir_id"),
                filename: PathBuf::from(row.get::<String, _>("filename")),
                fulldir_path: PathBuf::from(row.get::<String, _>("fulldir_path")),
                created_time: row.get("created_time"),
                modified_time: row.get("modified_time"),
                filesize: row.get("filesize"),
                filetype: FileType::from_i64(row.get("filetype")),
            };
            (props.fullpath(), props)
        })
        .collect())
}

/// Update the mutable metadata of an existing row.
///
/// Only tag fields, mtime, and filesize change; dir_id, filename,
/// fulldir_path, created_time, and filetype are immutable once inserted.
/// Returns whether a row was actually touched, so a missing id is visible to
/// the caller.
pub async fn update(pool: &SqlitePool, id: i64, file: &File) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE files SET \
         modified_time = ?, title = ?, album = ?, \
         artist = ?, albumartist = ?, track_number = ?, disc_number = ?, \
         year = ?, genre = ?, length = ?, bitrate = ?, filesize = ? \
         WHERE id = ?",
    )
    .bind(file.modified_time)
    .bind(&file.title)
    .bind(&file.album)
    .bind(&file.artist)
    .bind(&file.albumartist)
    .bind(file.track_number)
    .bind(file.disc_number)
    .bind(file.year)
    .bind(&file.genre)
    .bind(file.length)
    .bind(file.bitrate)
    .bind(file.filesize)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a file row. Removing an absent id is a no-op.
pub async fn remove(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM files WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
