//! Queue entry types

use chrono::{DateTime, Utc};
use karaoke_common::SongRef;
use serde::{Deserialize, Serialize};

/// A pending request: who sings what
///
/// Position in the pending sequence is the queue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub song: SongRef,
    pub singer: String,
}

impl QueueEntry {
    pub fn new(song: SongRef, singer: impl Into<String>) -> Self {
        Self {
            song,
            singer: singer.into(),
        }
    }
}

/// A request that has been sung ("checked" by the moderator)
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    pub song: SongRef,
    pub singer: String,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedEntry {
    pub(crate) fn from_entry(entry: &QueueEntry, processed_at: DateTime<Utc>) -> Self {
        Self {
            song: entry.song.clone(),
            singer: entry.singer.clone(),
            processed_at,
        }
    }
}

/// Independent copy of both sequences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub pending: Vec<QueueEntry>,
    pub processed: Vec<ProcessedEntry>,
}

/// Successful submission
///
/// `submitted_at` is the new cooldown anchor the caller should persist
/// (the HTTP layer stores it in the `last_added` cookie).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub entry: QueueEntry,
    pub submitted_at: DateTime<Utc>,
}
