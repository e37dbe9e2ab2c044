//! Queue time forecasting
//!
//! Pure functions over the pending sequence; callers pass in the state they
//! read under the engine lock.

use super::types::QueueEntry;
use chrono::{DateTime, Duration, Utc};

/// Projected remaining play time of the pending queue
///
/// Songs with unknown duration contribute zero, so this may under-estimate.
/// Saturates at `Duration::MAX`.
pub fn time_until_end_of_queue(pending: &[QueueEntry]) -> Duration {
    pending
        .iter()
        .filter_map(|entry| entry.song.duration())
        .fold(Duration::zero(), |total, duration| {
            total.checked_add(&duration).unwrap_or(Duration::MAX)
        })
}

/// Would a song appended now start at least `threshold` after it last played?
///
/// Forward-looking: the song will not play until the current queue has been
/// sung, so the forecast start is `now + time_until_end_of_queue(pending)`.
/// A song that was never processed is always eligible.
///
/// Out-of-range timestamps are decided by direction: a forecast start past
/// the representable future is eligible, a window reaching before the
/// representable past is not.
pub fn will_recurrence_window_have_elapsed(
    pending: &[QueueEntry],
    last_processed_at: Option<DateTime<Utc>>,
    threshold: Duration,
    now: DateTime<Utc>,
) -> bool {
    let Some(last_processed_at) = last_processed_at else {
        return true;
    };
    let Some(forecast_start) = now.checked_add_signed(time_until_end_of_queue(pending)) else {
        return true;
    };
    let Some(window_start) = forecast_start.checked_sub_signed(threshold) else {
        return false;
    };
    window_start > last_processed_at
}
