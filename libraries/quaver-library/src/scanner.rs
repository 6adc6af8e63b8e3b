//! Incremental library scanner
//!
//! Reconciles the filesystem under each registered root directory with the
//! metadata store. Change detection uses mtime + size; unchanged files are
//! never re-read. Tags are parsed only for new and changed files, after the
//! walk completes.

use crate::error::{LibraryError, Result};
use quaver_core::{Directory, File, FileMainProps, FileType, TagReader, UnreadFile};
use quaver_metadata::LoftyTagReader;
use quaver_storage::StorageError;
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

/// Statistics from a library scan
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    /// Recognized audio files seen on disk
    pub scanned: i64,
    /// New rows inserted
    pub added: i64,
    /// Existing rows refreshed
    pub updated: i64,
    /// Rows removed because their file vanished
    pub removed: i64,
    /// Unchanged files skipped without re-reading tags
    pub skipped: i64,
    /// Files whose tags could not be read (logged, not fatal)
    pub errors: i64,
}

impl ScanStats {
    fn merge(&mut self, other: &ScanStats) {
        self.scanned += other.scanned;
        self.added += other.added;
        self.updated += other.updated;
        self.removed += other.removed;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }
}

/// Changes found by walking one directory tree
#[derive(Default)]
struct DirChanges {
    unread: Vec<UnreadFile>,
    update_needed: Vec<File>,
    seen: HashSet<PathBuf>,
    scanned: i64,
    skipped: i64,
}

/// Library scanner over the registered root directories.
///
/// The tag parser is injected through the [`TagReader`] trait; production
/// code uses [`LoftyTagReader`].
pub struct Scanner {
    pool: SqlitePool,
    reader: Box<dyn TagReader + Send + Sync>,
}

impl Scanner {
    /// Create a scanner with the default lofty tag reader
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            reader: Box::new(LoftyTagReader::new()),
        }
    }

    /// Create a scanner with a custom tag reader
    pub fn with_reader(pool: SqlitePool, reader: Box<dyn TagReader + Send + Sync>) -> Self {
        Self { pool, reader }
    }

    /// Scan every registered directory.
    ///
    /// A missing root is logged and counted, not fatal; a storage error
    /// aborts the scan.
    pub async fn full_scan(&self) -> Result<ScanStats> {
        let directories = quaver_storage::directories::get_all(&self.pool).await?;

        let mut total = ScanStats::default();

        for dir in directories {
            match self.scan_directory(&dir).await {
                Ok(stats) => total.merge(&stats),
                Err(LibraryError::RootNotFound(path)) => {
                    tracing::error!("Scan root missing, skipping: {}", path);
                    total.errors += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "Full scan complete: {} added, {} updated, {} removed, {} unchanged",
            total.added,
            total.updated,
            total.removed,
            total.skipped
        );

        Ok(total)
    }

    /// Scan a single registered directory.
    pub async fn partial_scan(&self, dir_id: i64) -> Result<ScanStats> {
        let dir = quaver_storage::directories::get(&self.pool, dir_id)
            .await?
            .ok_or(StorageError::DirectoryNotFound(dir_id))?;

        self.scan_directory(&dir).await
    }

    async fn scan_directory(&self, dir: &Directory) -> Result<ScanStats> {
        if !dir.path.exists() {
            return Err(LibraryError::RootNotFound(
                dir.path.display().to_string(),
            ));
        }

        let saved_files = quaver_storage::files::main_props_by_dir(&self.pool, dir.id).await?;

        let changes = collect_changes(dir, &saved_files)?;

        tracing::info!(
            "{}: {} new, {} changed, {} unchanged",
            dir.path.display(),
            changes.unread.len(),
            changes.update_needed.len(),
            changes.skipped
        );

        let mut stats = ScanStats {
            scanned: changes.scanned,
            skipped: changes.skipped,
            ..Default::default()
        };

        self.remove_vanished(&saved_files, &changes.seen, &mut stats)
            .await?;
        self.populate(&changes, &mut stats).await?;

        Ok(stats)
    }

    /// Remove rows whose file no longer exists on disk. Idempotent: a retry
    /// after interruption re-deletes nothing.
    async fn remove_vanished(
        &self,
        saved_files: &HashMap<PathBuf, FileMainProps>,
        seen: &HashSet<PathBuf>,
        stats: &mut ScanStats,
    ) -> Result<()> {
        for (path, props) in saved_files {
            if !seen.contains(path) {
                quaver_storage::files::remove(&self.pool, props.id).await?;
                tracing::debug!("Removed vanished file: {}", path.display());
                stats.removed += 1;
            }
        }

        Ok(())
    }

    /// Read tags for new and changed files and write them to the store.
    ///
    /// A tag-read failure skips that file; a storage error is fatal.
    async fn populate(&self, changes: &DirChanges, stats: &mut ScanStats) -> Result<()> {
        for unread in &changes.unread {
            let tags = match self.reader.read_tags(&unread.fullpath) {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::warn!(
                        "Could not read metadata of {}: {}",
                        unread.fullpath.display(),
                        e
                    );
                    stats.errors += 1;
                    continue;
                }
            };

            let file = File {
                id: 0,
                dir_id: unread.dir_id,
                filename: unread.filename.clone(),
                fulldir_path: unread.fulldir_path.clone(),
                created_time: unread.created_time,
                modified_time: unread.modified_time,
                title: tags.title,
                album: tags.album,
                artist: tags.artist,
                albumartist: tags.albumartist,
                track_number: tags.track_number,
                disc_number: tags.disc_number,
                year: tags.year,
                genre: tags.genre,
                length: tags.length,
                bitrate: tags.bitrate,
                filesize: unread.filesize,
                filetype: unread.filetype,
            };

            match quaver_storage::files::add(&self.pool, &file).await {
                Ok(_) => stats.added += 1,
                Err(StorageError::FileAlreadyExists(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        for existing in &changes.update_needed {
            let fullpath = existing.fullpath();

            let tags = match self.reader.read_tags(&fullpath) {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::warn!("Could not read metadata of {}: {}", fullpath.display(), e);
                    stats.errors += 1;
                    continue;
                }
            };

            let file = File {
                title: tags.title,
                album: tags.album,
                artist: tags.artist,
                albumartist: tags.albumartist,
                track_number: tags.track_number,
                disc_number: tags.disc_number,
                year: tags.year,
                genre: tags.genre,
                length: tags.length,
                bitrate: tags.bitrate,
                ..existing.clone()
            };

            // A row removed between walk and populate is not an error
            if quaver_storage::files::update(&self.pool, existing.id, &file).await? {
                stats.updated += 1;
            }
        }

        Ok(())
    }
}

/// Walk one directory tree and split recognized files into new, changed, and
/// unchanged against the saved projection.
fn collect_changes(
    dir: &Directory,
    saved_files: &HashMap<PathBuf, FileMainProps>,
) -> Result<DirChanges> {
    let mut changes = DirChanges::default();

    for entry in walkdir::WalkDir::new(&dir.path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let fullpath = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }

        let filetype = FileType::from_path(fullpath);
        if filetype == FileType::Unknown {
            continue;
        }

        let metadata = entry.metadata().map_err(std::io::Error::from)?;
        let filesize = metadata.len() as i64;
        let mtime = file_mtime_epoch(&metadata);

        changes.scanned += 1;
        changes.seen.insert(fullpath.to_path_buf());

        let (Some(filename), Some(fulldir_path)) = (entry.file_name().to_str().map(PathBuf::from), fullpath.parent()) else {
            continue;
        };

        if let Some(existing) = saved_files.get(fullpath) {
            if existing.modified_time == mtime && existing.filesize == filesize {
                changes.skipped += 1;
                continue;
            }

            changes.update_needed.push(File {
                id: existing.id,
                dir_id: existing.dir_id,
                filename: existing.filename.clone(),
                fulldir_path: existing.fulldir_path.clone(),
                created_time: existing.created_time,
                modified_time: mtime,
                title: String::new(),
                album: String::new(),
                artist: String::new(),
                albumartist: String::new(),
                track_number: 0,
                disc_number: 0,
                year: 0,
                genre: String::new(),
                length: 0,
                bitrate: 0,
                filesize,
                filetype: existing.filetype,
            });
            continue;
        }

        changes.unread.push(UnreadFile {
            fullpath: fullpath.to_path_buf(),
            fulldir_path: fulldir_path.to_path_buf(),
            filename,
            dir_id: dir.id,
            // First sighting counts as creation time
            created_time: mtime,
            modified_time: mtime,
            filesize,
            filetype,
        });
    }

    Ok(changes)
}

fn file_mtime_epoch(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
