//! Timestamp utilities and the injectable clock

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Source of the current time
///
/// Injected into the queue engine so that policy decisions (cooldowns,
/// recurrence windows, processed timestamps) are deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        now()
    }
}

/// Manually driven clock for tests and simulations
///
/// Starts at a fixed instant and only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }

    /// Move forward (or backward, for a negative delta) by `delta`
    pub fn advance(&self, delta: Duration) {
        let mut current = self.current.lock();
        *current += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let before = now();
        let observed = SystemClock.now();
        let after = now();
        assert!(observed >= before && observed <= after);
    }

    #[test]
    fn test_manual_clock_is_frozen_until_moved() {
        let start = Utc.with_ymd_and_hms(2024, 5, 4, 20, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let start = Utc.with_ymd_and_hms(2024, 5, 4, 20, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));

        clock.advance(Duration::seconds(-30));
        assert_eq!(clock.now(), start + Duration::seconds(60));

        let later = Utc.with_ymd_and_hms(2024, 5, 5, 1, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }
}
