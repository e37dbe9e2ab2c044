//! Queue engine error taxonomy
//!
//! A closed set of kinds with structured fields. The engine never maps these
//! to transport status codes; that is the API layer's job.

use chrono::Duration;
use karaoke_common::human_time::format_human_duration;
use karaoke_common::{SongId, SongRef};
use thiserror::Error;

/// Result type for queue engine operations
pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    // === Structural ===
    /// Index outside `[0, len)`
    #[error("Requested index {index} is out of bounds (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Queue is empty")]
    QueueEmpty,

    // === Validation ===
    #[error("Invalid duration for {setting}: {reason}")]
    InvalidDuration {
        setting: &'static str,
        reason: String,
    },

    #[error("Invalid count for {setting}: {reason}")]
    InvalidCount {
        setting: &'static str,
        reason: String,
    },

    // === Admission rejections ===
    #[error("Queue is closed. Can't add any more songs.")]
    QueueClosed,

    #[error("Please wait {} before submitting a new song", format_human_duration(*.retry_after))]
    SubmissionTooSoon { retry_after: Duration },

    #[error("Song {song_id} not in database")]
    SongNotFound { song_id: SongId },

    #[error("Song {song} is already in queue")]
    SongAlreadyQueued { song: SongRef },

    #[error(
        "Song {song} has already been sung {times_sung} times today. Please choose another one."
    )]
    SongExhausted { song: SongRef, times_sung: usize },

    #[error("Song {song} has been sung recently. Please choose another one.")]
    SongTooRecent { song: SongRef },
}

impl QueueError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            QueueError::IndexOutOfRange { .. } => "index_out_of_range",
            QueueError::QueueEmpty => "queue_empty",
            QueueError::InvalidDuration { .. } => "invalid_duration",
            QueueError::InvalidCount { .. } => "invalid_count",
            QueueError::QueueClosed => "queue_closed",
            QueueError::SubmissionTooSoon { .. } => "submission_too_soon",
            QueueError::SongNotFound { .. } => "song_not_found",
            QueueError::SongAlreadyQueued { .. } => "song_already_queued",
            QueueError::SongExhausted { .. } => "song_exhausted",
            QueueError::SongTooRecent { .. } => "song_too_recent",
        }
    }

}
