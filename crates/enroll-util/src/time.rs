//! Time utilities for enrolld
//!
//! All expiration arithmetic uses the server's wall clock in the host's
//! configured local timezone.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `ENROLLD_MOCK_TIME` environment variable can be set
//! to override the system time for all time-sensitive operations. This is
//! useful for exercising the expiration sweep without waiting days.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2026-12-25 14:30:00`)
//!
//! Example:
//! ```bash
//! ENROLLD_MOCK_TIME="2026-12-25 14:30:00" enrolld sweep
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "ENROLLD_MOCK_TIME";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

/// Initialize the mock time offset based on the environment variable.
/// Returns the offset between mock time and real time at process start.
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                if let Ok(naive_dt) =
                    NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S")
                {
                    if let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() {
                        let real_now = chrono::Local::now();
                        let offset = mock_dt.signed_duration_since(real_now);
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    } else {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            "Failed to convert mock time to local timezone"
                        );
                    }
                } else {
                    tracing::warn!(
                        mock_time = %mock_time_str,
                        expected_format = "%Y-%m-%d %H:%M:%S",
                        "Invalid mock time format"
                    );
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
///
/// In release builds, this always returns the real system time.
/// In debug builds, if `ENROLLD_MOCK_TIME` is set, this returns a time
/// that advances from the mock time at the same rate as real time.
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// Format a DateTime for display with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render a remaining-time delta in seconds for display.
///
/// Non-positive deltas render as "expired". Otherwise the largest nonzero
/// units are shown: days plus hours when at least a day remains, hours plus
/// minutes below a day, bare minutes below an hour, and "under a minute"
/// when everything rounds to zero.
pub fn format_time_remaining(seconds: i64) -> String {
    if seconds <= 0 {
        return "expired".to_string();
    }

    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    let mut parts = Vec::new();

    if days > 0 {
        parts.push(unit(days, "day"));
    }
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 && days == 0 {
        parts.push(unit(minutes, "minute"));
    }

    if parts.is_empty() {
        "under a minute".to_string()
    } else {
        parts.join(", ")
    }
}

fn unit(count: i64, name: &str) -> String {
    if count == 1 {
        format!("1 {}", name)
    } else {
        format!("{} {}s", count, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_remaining() {
        // 1 day 1 hour
        assert_eq!(format_time_remaining(90_000), "1 day, 1 hour");
        // exactly 2 days
        assert_eq!(format_time_remaining(172_800), "2 days");
        // 3 hours 5 minutes
        assert_eq!(format_time_remaining(11_100), "3 hours, 5 minutes");
        // 45 minutes
        assert_eq!(format_time_remaining(2_700), "45 minutes");
        // under a minute
        assert_eq!(format_time_remaining(59), "under a minute");
    }

    #[test]
    fn test_expired_rendering() {
        assert_eq!(format_time_remaining(0), "expired");
        assert_eq!(format_time_remaining(-5), "expired");
    }

    #[test]
    fn minutes_hidden_once_days_shown() {
        // 1 day, 0 hours, 30 minutes: minutes are suppressed beyond a day
        assert_eq!(format_time_remaining(86_400 + 1_800), "1 day");
    }

    #[test]
    fn now_returns_a_time() {
        let a = now();
        let b = now();
        assert!(b >= a);
    }
}
