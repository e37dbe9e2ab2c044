//! Human-readable duration formatting
//!
//! Used for user-facing messages such as "please wait 60:00 before
//! submitting a new song".

use chrono::Duration;

/// Format selection thresholds (seconds)
const SHORT_FORMAT_MAX: i64 = 100; // < 100s → Xs
const MEDIUM_FORMAT_MAX: i64 = 6000; // < 100m → M:SS
                                     // >= 100m → H:MM:SS

/// Format a number of seconds for display.
///
/// - Short format (`Xs`): below 100 seconds
/// - Medium format (`M:SS`): 100 seconds to 100 minutes
/// - Long format (`H:MM:SS`): 100 minutes and above
///
/// Negative values keep their sign.
///
/// # Examples
///
/// ```
/// use karaoke_common::human_time::format_human_seconds;
///
/// assert_eq!(format_human_seconds(45), "45s");
/// assert_eq!(format_human_seconds(330), "5:30");
/// assert_eq!(format_human_seconds(7261), "2:01:01");
/// assert_eq!(format_human_seconds(-45), "-45s");
/// ```
pub fn format_human_seconds(seconds: i64) -> String {
    let is_negative = seconds < 0;
    let abs_seconds = seconds.abs();

    let formatted = if abs_seconds < SHORT_FORMAT_MAX {
        format!("{}s", abs_seconds)
    } else if abs_seconds < MEDIUM_FORMAT_MAX {
        let minutes = abs_seconds / 60;
        let secs = abs_seconds % 60;
        format!("{}:{:02}", minutes, secs)
    } else {
        let hours = abs_seconds / 3600;
        let mins = (abs_seconds % 3600) / 60;
        let secs = abs_seconds % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format a chrono duration, truncated to whole seconds
pub fn format_human_duration(duration: Duration) -> String {
    format_human_seconds(duration.num_seconds())
}
