//! Ordered play queue
//!
//! File ids are resolved against the metadata store at enqueue time, so the
//! queue holds full file entities and playback never needs another lookup.

use crate::error::{PlaybackError, Result};
use quaver_core::File;
use sqlx::SqlitePool;

/// Random-access ordered queue of resolved files
pub struct PlayQueue {
    pool: SqlitePool,
    items: Vec<File>,
}

impl PlayQueue {
    /// Create an empty queue backed by the given store
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            items: Vec::new(),
        }
    }

    /// Resolve one file id and append it.
    pub async fn enqueue(&mut self, file_id: i64) -> Result<()> {
        let file = quaver_storage::files::get(&self.pool, file_id)
            .await?
            .ok_or(PlaybackError::FileNotFound(file_id))?;

        self.items.push(file);
        Ok(())
    }

    /// Resolve many ids with a single batch lookup and append them in
    /// lookup-result order. At least one id must resolve.
    pub async fn batch_enqueue(&mut self, ids: &[i64]) -> Result<usize> {
        let files = quaver_storage::files::get_batch(&self.pool, ids).await?;

        if files.is_empty() {
            return Err(PlaybackError::FileNotFound(
                ids.first().copied().unwrap_or(0),
            ));
        }

        let count = files.len();
        self.items.extend(files);
        Ok(count)
    }

    /// Remove and return the head of the queue.
    pub fn dequeue(&mut self) -> Result<File> {
        if self.items.is_empty() {
            return Err(PlaybackError::QueueIsEmpty);
        }

        Ok(self.items.remove(0))
    }

    /// Remove and return the element at `index`.
    pub fn dequeue_at(&mut self, index: usize) -> Result<File> {
        if index >= self.items.len() {
            return Err(PlaybackError::InvalidIndex(index));
        }

        Ok(self.items.remove(index))
    }

    /// Extract the element at `from` and insert it at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.items.len() {
            return Err(PlaybackError::InvalidIndex(from));
        }
        if to >= self.items.len() {
            return Err(PlaybackError::InvalidIndex(to));
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Extract all elements at `from_indices` and reinsert them as one
    /// contiguous block.
    ///
    /// The insertion point is `to` adjusted down by the number of moved
    /// elements that originally lay before it, so the block lands where `to`
    /// pointed in the pre-move ordering. All indices are validated before
    /// any mutation; an empty `from_indices` is a no-op.
    pub fn batch_move(&mut self, from_indices: &[usize], to: usize) -> Result<()> {
        if from_indices.is_empty() {
            return Ok(());
        }

        for &index in from_indices {
            if index >= self.items.len() {
                return Err(PlaybackError::InvalidIndex(index));
            }
        }
        if to >= self.items.len() {
            return Err(PlaybackError::InvalidIndex(to));
        }

        let mut sorted: Vec<usize> = from_indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let adjusted = to - sorted.iter().filter(|&&i| i < to).count();

        let mut moved = Vec::with_capacity(sorted.len());
        for &index in sorted.iter().rev() {
            moved.push(self.items.remove(index));
        }
        moved.reverse();

        for (offset, item) in moved.into_iter().enumerate() {
            self.items.insert(adjusted + offset, item);
        }

        Ok(())
    }

    /// Element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&File> {
        self.items.get(index)
    }

    /// The queued files in play order.
    pub fn items(&self) -> &[File] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every queued file.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
