//! Queue policy thresholds
//!
//! Setters validate before writing: a rejected value leaves the previous
//! value in place.

use super::error::{QueueError, Result};
use chrono::Duration;
use karaoke_common::config::PolicySettings;
use serde::Serialize;

/// Serializes a chrono duration as whole seconds
fn serialize_secs<S>(duration: &Duration, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_i64(duration.num_seconds())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyConfig {
    /// Minimum interval before the same song may play again
    #[serde(
        rename = "time_between_same_song_secs",
        serialize_with = "serialize_secs"
    )]
    time_between_same_song: Duration,

    /// Maximum times one song may be sung per session (>= 1)
    max_times_song_can_be_sung: i64,

    /// Minimum interval between two submissions from the same client
    #[serde(
        rename = "time_between_submissions_secs",
        serialize_with = "serialize_secs"
    )]
    time_between_submissions: Duration,

    queue_is_open: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            time_between_same_song: Duration::minutes(60),
            max_times_song_can_be_sung: 2,
            time_between_submissions: Duration::minutes(60),
            queue_is_open: true,
        }
    }
}

impl PolicyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured values, validating each one
    pub fn from_settings(settings: &PolicySettings) -> Result<Self> {
        let mut policy = Self::default();
        policy.set_time_between_same_song(interval_from_secs(
            "time_between_same_song",
            settings.time_between_same_song_secs,
        )?)?;
        policy.set_max_times_song_can_be_sung(settings.max_times_song_can_be_sung)?;
        policy.set_time_between_submissions(interval_from_secs(
            "time_between_submissions",
            settings.time_between_submissions_secs,
        )?)?;
        policy.set_queue_is_open(settings.queue_is_open);
        Ok(policy)
    }

    pub fn time_between_same_song(&self) -> Duration {
        self.time_between_same_song
    }

    pub fn set_time_between_same_song(&mut self, interval: Duration) -> Result<()> {
        validate_interval("time_between_same_song", interval)?;
        self.time_between_same_song = interval;
        Ok(())
    }

    pub fn max_times_song_can_be_sung(&self) -> i64 {
        self.max_times_song_can_be_sung
    }

    pub fn set_max_times_song_can_be_sung(&mut self, value: i64) -> Result<()> {
        let reason = match value {
            0 => Some("cannot be zero"),
            v if v < 0 => Some("cannot be negative"),
            _ => None,
        };
        if let Some(reason) = reason {
            return Err(QueueError::InvalidCount {
                setting: "max_times_song_can_be_sung",
                reason: reason.to_string(),
            });
        }
        self.max_times_song_can_be_sung = value;
        Ok(())
    }

    pub fn time_between_submissions(&self) -> Duration {
        self.time_between_submissions
    }

    pub fn set_time_between_submissions(&mut self, interval: Duration) -> Result<()> {
        validate_interval("time_between_submissions", interval)?;
        self.time_between_submissions = interval;
        Ok(())
    }

    pub fn queue_is_open(&self) -> bool {
        self.queue_is_open
    }

    /// Open or close the queue; any value is accepted
    pub fn set_queue_is_open(&mut self, open: bool) {
        self.queue_is_open = open;
    }
}

fn interval_from_secs(setting: &'static str, secs: i64) -> Result<Duration> {
    Duration::try_seconds(secs).ok_or_else(|| QueueError::InvalidDuration {
        setting,
        reason: "out of range".to_string(),
    })
}

fn validate_interval(setting: &'static str, interval: Duration) -> Result<()> {
    if interval < Duration::zero() {
        return Err(QueueError::InvalidDuration {
            setting,
            reason: "cannot be negative".to_string(),
        });
    }
    Ok(())
}
