//! Test helpers and fixtures for storage integration tests
//!
//! Databases are real SQLite files in a temp dir (not in-memory) so
//! migrations, constraints, and indexes behave as they do in production.

use quaver_core::{File, FileType};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = quaver_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        quaver_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Fixture: a file row with sensible defaults; id 0 until inserted
pub fn make_file(dir_id: i64, fulldir_path: &str, filename: &str) -> File {
    File {
        id: 0,
        dir_id,
        filename: PathBuf::from(filename),
        fulldir_path: PathBuf::from(fulldir_path),
        created_time: 1000,
        modified_time: 1000,
        title: "Title".to_string(),
        album: "Album".to_string(),
        artist: "Artist".to_string(),
        albumartist: String::new(),
        track_number: 1,
        disc_number: 1,
        year: 2020,
        genre: "Rock".to_string(),
        length: 180,
        bitrate: 320,
        filesize: 1000,
        filetype: FileType::Mp3,
    }
}

/// Fixture: insert a file with the given tag fields, returning its id
pub async fn insert_tagged(
    pool: &SqlitePool,
    dir_id: i64,
    filename: &str,
    artist: &str,
    albumartist: &str,
    album: &str,
    year: i64,
    track: i64,
    disc: i64,
) -> i64 {
    let mut file = make_file(dir_id, "/music", filename);
    file.artist = artist.to_string();
    file.albumartist = albumartist.to_string();
    file.album = album.to_string();
    file.year = year;
    file.track_number = track;
    file.disc_number = disc;

    quaver_storage::files::add(pool, &file)
        .await
        .expect("Failed to insert file fixture")
}
