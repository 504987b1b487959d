// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable time formatting for logs and alert text

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Format a duration as a compact string: `45s`, `12m`, `3h 5m`, `2d 4h`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    let hours = mins / 60;
    if hours < 24 {
        return match mins % 60 {
            0 => format!("{}h", hours),
            m => format!("{}h {}m", hours, m),
        };
    }
    let days = hours / 24;
    match hours % 24 {
        0 => format!("{}d", days),
        h => format!("{}d {}h", days, h),
    }
}

/// Format a timestamp to minute precision (`2026-03-01 08:00`), or `N/A`.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
