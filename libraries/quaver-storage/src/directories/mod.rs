//! Registered root directories
//!
//! A directory row is created by user registration and destroyed by explicit
//! removal. Removal does not cascade to file rows; the scanner purges
//! orphaned files on its next pass.

use crate::error::{Result, StorageError};
use quaver_core::Directory;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Register a new root directory.
///
/// # Errors
///
/// Returns `PathAlreadyExists` if the path is already registered.
pub async fn add(pool: &SqlitePool, path: impl AsRef<Path>) -> Result<Directory> {
    let path_str = path.as_ref().to_string_lossy().to_string();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM directories WHERE path = ?")
        .bind(&path_str)
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Err(StorageError::PathAlreadyExists(path_str));
    }

    let result = sqlx::query("INSERT INTO directories (path) VALUES (?)")
        .bind(&path_str)
        .execute(pool)
        .await?;

    Ok(Directory {
        id: result.last_insert_rowid(),
        path: PathBuf::from(path_str),
    })
}

/// Get a directory by id.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Directory>> {
    let row = sqlx::query("SELECT id, path FROM directories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Directory {
        id: row.get("id"),
        path: PathBuf::from(row.get::<String, _>("path")),
    }))
}

/// List all registered directories.
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Directory>> {
    let rows = sqlx::query("SELECT id, path FROM directories")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| Directory {
            id: row.get("id"),
            path: PathBuf::from(row.get::<String, _>("path")),
        })
        .collect())
}

/// All registered directories keyed by id.
pub async fn get_map(pool: &SqlitePool) -> Result<HashMap<i64, Directory>> {
    let dirs = get_all(pool).await?;
    Ok(dirs.into_iter().map(|d| (d.id, d)).collect())
}

/// Remove a registered directory. Does not cascade to file rows.
pub async fn remove(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM directories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
