//! Queue engine
//!
//! Combines [`PolicyConfig`] and [`QueueStore`] behind a single lock so that
//! every admission decision and every moderator mutation is atomic with
//! respect to the others.
//!
//! **Locking:**
//! - `submit` and all mutations take the write lock for the whole operation
//! - `snapshot`, getters and `time_until_end_of_queue` take the read lock
//! - Nothing inside the lock does I/O; callers resolve catalog lookups first

pub mod admission;
pub mod error;
pub mod estimation;
pub mod policy;
pub mod store;
pub mod types;

pub use admission::{AdmissionController, Submission};
pub use error::{QueueError, Result};
pub use policy::PolicyConfig;
pub use store::QueueStore;
pub use types::{Admission, ProcessedEntry, QueueEntry, QueueSnapshot};

use chrono::{DateTime, Duration, Utc};
use karaoke_common::{Clock, SongId, SongRepository, SystemClock};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
struct EngineState {
    policy: PolicyConfig,
    store: QueueStore,
}

/// The admission and ordering engine for one karaoke session
pub struct QueueEngine {
    state: RwLock<EngineState>,
    clock: Arc<dyn Clock>,
}

impl Default for QueueEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueEngine {
    /// Engine with default policy and the system clock
    pub fn new() -> Self {
        Self::with_policy(PolicyConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_policy(policy: PolicyConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(EngineState {
                policy,
                store: QueueStore::new(),
            }),
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ========================================================================
    // Submitter operations
    // ========================================================================

    /// Run admission and append on success
    ///
    /// `last_submitted_at` is the caller's cooldown anchor (from a previous
    /// [`Admission::submitted_at`]), or `None` on a first submission.
    pub fn submit(
        &self,
        song_id: SongId,
        singer: impl Into<String>,
        last_submitted_at: Option<DateTime<Utc>>,
        catalog: &dyn SongRepository,
    ) -> Result<Admission> {
        let submission = Submission::new(song_id, singer).last_submitted_at(last_submitted_at);

        let mut state = self.state.write();
        let now = self.now();
        let EngineState { policy, store } = &mut *state;
        let admission = AdmissionController::new(policy, store).submit(submission, catalog, now)?;

        info!(
            "Queued {} for {} (position {})",
            admission.entry.song,
            admission.entry.singer,
            store.len()
        );
        Ok(admission)
    }

    // ========================================================================
    // Moderator operations
    // ========================================================================

    /// Append without policy checks; only the catalog lookup can fail
    pub fn moderator_append(
        &self,
        song_id: SongId,
        singer: impl Into<String>,
        catalog: &dyn SongRepository,
    ) -> Result<QueueEntry> {
        let song = catalog
            .song_by_id(song_id)
            .ok_or(QueueError::SongNotFound { song_id })?;

        let entry = self.state.write().store.append(QueueEntry::new(song, singer));
        info!("Moderator queued {} for {}", entry.song, entry.singer);
        Ok(entry)
    }

    /// Mark the head of the queue as sung
    pub fn dequeue_first(&self) -> Result<QueueEntry> {
        self.dequeue_at(0)
    }

    /// Mark the entry at `index` as sung
    pub fn dequeue_at(&self, index: usize) -> Result<QueueEntry> {
        let mut state = self.state.write();
        let now = self.now();
        let entry = state.store.promote_at(index, now)?;
        info!("Sung: {} by {} (index {})", entry.song, entry.singer, index);
        Ok(entry)
    }

    /// Drop the entry at `index` without recording it as sung
    pub fn remove_at(&self, index: usize) -> Result<QueueEntry> {
        let entry = self.state.write().store.remove_at(index)?;
        info!("Removed {} by {} (index {})", entry.song, entry.singer, index);
        Ok(entry)
    }

    /// Reorder so the entry at `from` ends up at `to` (clamped to the tail)
    pub fn move_to(&self, from: usize, to: usize) -> Result<QueueEntry> {
        let entry = self.state.write().store.move_to(from, to)?;
        info!("Moved {} from {} to {}", entry.song, from, to);
        Ok(entry)
    }

    pub fn clear_pending(&self) {
        self.state.write().store.clear_pending();
        info!("Cleared pending queue");
    }

    pub fn clear_processed(&self) {
        self.state.write().store.clear_processed();
        info!("Cleared processed history");
    }

    /// Reset the session: both sequences emptied and the queue reopened
    pub fn clear_all(&self) {
        let mut state = self.state.write();
        state.store.clear_all();
        state.policy.set_queue_is_open(true);
        info!("Cleared queue and history, queue reopened");
    }

    // ========================================================================
    // Policy
    // ========================================================================

    pub fn set_queue_open(&self, open: bool) {
        self.state.write().policy.set_queue_is_open(open);
        info!("Queue {}", if open { "opened" } else { "closed" });
    }

    pub fn queue_is_open(&self) -> bool {
        self.state.read().policy.queue_is_open()
    }

    pub fn set_time_between_same_song(&self, interval: Duration) -> Result<()> {
        self.state.write().policy.set_time_between_same_song(interval)?;
        info!("time_between_same_song set to {}s", interval.num_seconds());
        Ok(())
    }

    pub fn time_between_same_song(&self) -> Duration {
        self.state.read().policy.time_between_same_song()
    }

    pub fn set_max_times_song_can_be_sung(&self, value: i64) -> Result<()> {
        self.state.write().policy.set_max_times_song_can_be_sung(value)?;
        info!("max_times_song_can_be_sung set to {}", value);
        Ok(())
    }

    pub fn max_times_song_can_be_sung(&self) -> i64 {
        self.state.read().policy.max_times_song_can_be_sung()
    }

    pub fn set_time_between_submissions(&self, interval: Duration) -> Result<()> {
        self.state.write().policy.set_time_between_submissions(interval)?;
        info!("time_between_submissions set to {}s", interval.num_seconds());
        Ok(())
    }

    pub fn time_between_submissions(&self) -> Duration {
        self.state.read().policy.time_between_submissions()
    }

    /// Copy of the current policy values
    pub fn policy(&self) -> PolicyConfig {
        self.state.read().policy.clone()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn snapshot(&self) -> QueueSnapshot {
        self.state.read().store.snapshot()
    }

    pub fn time_until_end_of_queue(&self) -> Duration {
        estimation::time_until_end_of_queue(self.state.read().store.pending())
    }
}
