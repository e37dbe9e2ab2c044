//! Queue Store
//!
//! Authoritative ordered storage for pending and processed entries. Owns
//! every structural mutation and knows nothing about admission policy.
//!
//! Every removal or promotion returns the affected entry, so no entry leaves
//! the pending sequence without the caller seeing it.

use super::error::{QueueError, Result};
use super::types::{ProcessedEntry, QueueEntry, QueueSnapshot};
use chrono::{DateTime, Utc};
use karaoke_common::SongRef;

#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    /// Pending requests, front = next to sing
    pending: Vec<QueueEntry>,

    /// Sung requests, in promotion order
    processed: Vec<ProcessedEntry>,
}

impl QueueStore {
    /// Create new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the tail of the pending sequence
    ///
    /// Always succeeds; open/closed checks belong to admission.
    pub fn append(&mut self, entry: QueueEntry) -> QueueEntry {
        self.pending.push(entry.clone());
        entry
    }

    /// Remove and return the entry at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<QueueEntry> {
        self.check_index(index)?;
        Ok(self.pending.remove(index))
    }

    /// Move the entry at `index` into the processed history
    ///
    /// Returns the removed pending entry. Fails with `QueueEmpty` when there
    /// is nothing pending, `IndexOutOfRange` when `index` is past the end.
    pub fn promote_at(&mut self, index: usize, now: DateTime<Utc>) -> Result<QueueEntry> {
        if self.pending.is_empty() {
            return Err(QueueError::QueueEmpty);
        }
        self.check_index(index)?;

        let entry = self.pending.remove(index);
        self.processed.push(ProcessedEntry::from_entry(&entry, now));
        Ok(entry)
    }

    /// Reorder: the entry at `from` ends up at position `to`
    ///
    /// `to` is clamped to the tail, so moving past the end appends. Only an
    /// out-of-range `from` is an error.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<QueueEntry> {
        self.check_index(from)?;

        let entry = self.pending.remove(from);
        let target = to.min(self.pending.len());
        self.pending.insert(target, entry.clone());
        Ok(entry)
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn clear_processed(&mut self) {
        self.processed.clear();
    }

    /// Clear both sequences
    pub fn clear_all(&mut self) {
        self.clear_pending();
        self.clear_processed();
    }

    /// Independent copies of both sequences
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            pending: self.pending.clone(),
            processed: self.processed.clone(),
        }
    }

    /// Pending entries (borrowed; only reachable under the engine lock)
    pub fn pending(&self) -> &[QueueEntry] {
        &self.pending
    }

    /// Processed entries (borrowed; only reachable under the engine lock)
    pub fn processed(&self) -> &[ProcessedEntry] {
        &self.processed
    }

    /// Pending length
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the song is currently pending
    pub fn contains(&self, song: &SongRef) -> bool {
        self.pending.iter().any(|entry| entry.song.same_song(song))
    }

    /// How many times the song has been sung this session
    pub fn count_processed(&self, song: &SongRef) -> usize {
        self.processed
            .iter()
            .filter(|entry| entry.song.same_song(song))
            .count()
    }

    /// Latest `processed_at` for the song, if it was ever sung
    ///
    /// History order is not trusted: matches are sorted by `processed_at`
    /// before taking the last one.
    pub fn last_processed_at(&self, song: &SongRef) -> Option<DateTime<Utc>> {
        let mut times: Vec<DateTime<Utc>> = self
            .processed
            .iter()
            .filter(|entry| entry.song.same_song(song))
            .map(|entry| entry.processed_at)
            .collect();
        times.sort();
        times.last().copied()
    }

    #[cfg(test)]
    pub(crate) fn push_processed(&mut self, entry: ProcessedEntry) {
        self.processed.push(entry);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.pending.len() {
            return Err(QueueError::IndexOutOfRange {
                index,
                len: self.pending.len(),
            });
        }
        Ok(())
    }
}
