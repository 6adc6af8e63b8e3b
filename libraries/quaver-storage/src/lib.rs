//! Quaver Storage
//!
//! SQLite metadata store for the Quaver music library engine.
//!
//! Persists registered root directories and indexed audio files, and backs
//! the browse layer with its aggregation queries. Each feature owns its own
//! queries: `directories`, `files`, and `browse` are independent slices of
//! free functions over a shared [`sqlx::SqlitePool`].
//!
//! # Example
//!
//! ```rust,no_run
//! use quaver_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://quaver.db").await?;
//! run_migrations(&pool).await?;
//!
//! let dir = quaver_storage::directories::add(&pool, "/home/user/music").await?;
//! let files = quaver_storage::files::by_dir(&pool, dir.id).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod browse;
pub mod directories;
pub mod files;

mod error;

pub use error::{Result, StorageError};

use sqlx::sqlite::SqlitePool;

/// Create a new `SQLite` pool.
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    Ok(pool)
}

/// Run database migrations.
///
/// Should be called once when the application starts, before any other
/// storage call.
///
/// # Errors
///
/// Returns an error if a migration statement fails
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Embedded migrations for reliability across execution contexts
    const MIGRATIONS: &[&str] = &[
        include_str!("../migrations/0001_create_directories.sql"),
        include_str!("../migrations/0002_create_files.sql"),
    ];

    for migration in MIGRATIONS {
        for statement in migration.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|e| StorageError::Migration(e.to_string()))?;
        }
    }

    Ok(())
}
