//! Admission Controller
//!
//! Decides whether a submitter's request enters the queue. Checks run in a
//! fixed order and the first failure wins:
//!
//! 1. queue open
//! 2. submission cooldown
//! 3. catalog resolution
//! 4. not already queued
//! 5. play count below the per-session maximum
//! 6. recurrence window forecast
//!
//! All checks are read-only; the store is touched only after every check has
//! passed, so a rejection never leaves partial state behind.

use super::error::{QueueError, Result};
use super::estimation;
use super::policy::PolicyConfig;
use super::store::QueueStore;
use super::types::{Admission, QueueEntry};
use chrono::{DateTime, Utc};
use karaoke_common::{SongId, SongRef, SongRepository};
use tracing::debug;

/// A submitter's request as it arrives from the transport layer
#[derive(Debug, Clone)]
pub struct Submission {
    pub song_id: SongId,
    pub singer: String,

    /// Cooldown anchor from the caller's session, if any
    pub last_submitted_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn new(song_id: SongId, singer: impl Into<String>) -> Self {
        Self {
            song_id,
            singer: singer.into(),
            last_submitted_at: None,
        }
    }

    pub fn last_submitted_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_submitted_at = at;
        self
    }
}

/// Borrowed view of engine state for one admission decision
///
/// Constructed under the engine's write lock and dropped before it is
/// released, so check and append form one critical section.
pub struct AdmissionController<'a> {
    policy: &'a PolicyConfig,
    store: &'a mut QueueStore,
}

impl<'a> AdmissionController<'a> {
    pub fn new(policy: &'a PolicyConfig, store: &'a mut QueueStore) -> Self {
        Self { policy, store }
    }

    /// Run every admission check; returns the resolved song on success
    pub fn check(
        &self,
        submission: &Submission,
        catalog: &dyn SongRepository,
        now: DateTime<Utc>,
    ) -> Result<SongRef> {
        if !self.policy.queue_is_open() {
            return Err(QueueError::QueueClosed);
        }

        let cooldown = self.policy.time_between_submissions();
        if let Some(last) = submission.last_submitted_at {
            if now - last < cooldown {
                return Err(QueueError::SubmissionTooSoon {
                    retry_after: cooldown,
                });
            }
        }

        let song = catalog
            .song_by_id(submission.song_id)
            .ok_or(QueueError::SongNotFound {
                song_id: submission.song_id,
            })?;

        if self.store.contains(&song) {
            return Err(QueueError::SongAlreadyQueued { song });
        }

        let times_sung = self.store.count_processed(&song);
        if times_sung as i64 >= self.policy.max_times_song_can_be_sung() {
            return Err(QueueError::SongExhausted { song, times_sung });
        }

        let recurrence_ok = estimation::will_recurrence_window_have_elapsed(
            self.store.pending(),
            self.store.last_processed_at(&song),
            self.policy.time_between_same_song(),
            now,
        );
        if !recurrence_ok {
            return Err(QueueError::SongTooRecent { song });
        }

        Ok(song)
    }

    /// Check, then append on success
    pub fn submit(
        self,
        submission: Submission,
        catalog: &dyn SongRepository,
        now: DateTime<Utc>,
    ) -> Result<Admission> {
        let song = match self.check(&submission, catalog, now) {
            Ok(song) => song,
            Err(e) => {
                debug!(
                    "Rejected submission of song {} by {}: {}",
                    submission.song_id, submission.singer, e
                );
                return Err(e);
            }
        };

        let entry = self.store.append(QueueEntry::new(song, submission.singer));
        Ok(Admission {
            entry,
            submitted_at: now,
        })
    }
}
