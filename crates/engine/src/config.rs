// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitor configuration.
//!
//! Parsed from TOML text. Where the text comes from is up to the host.

use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default time between repeat alerts for a task that stays failing.
pub const DEFAULT_REMINDER_INTERVAL: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },
}

/// Settings for one monitor run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Minimum time between alerts for a task that stays failing.
    /// Zero re-alerts on every run.
    #[serde(deserialize_with = "de_duration")]
    pub reminder_interval: Duration,
    /// Log the notification instead of sending it
    pub dry_run: bool,
    /// Send a notification when the only news is recovered tasks
    pub notify_on_recovery: bool,
    /// Lock file guarding against overlapping runs
    pub lock_path: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            reminder_interval: DEFAULT_REMINDER_INTERVAL,
            dry_run: false,
            notify_on_recovery: false,
            lock_path: None,
        }
    }
}

impl MonitorConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse and set the reminder interval from a duration string.
    pub fn reminder_every(mut self, input: &str) -> Result<Self, ConfigError> {
        self.reminder_interval = parse_duration(input).map_err(|reason| {
            ConfigError::InvalidDuration { input: input.to_string(), reason }
        })?;
        Ok(self)
    }

    tw_core::setters! {
        set {
            reminder_interval: Duration,
            dry_run: bool,
            notify_on_recovery: bool,
        }
        option {
            lock_path: PathBuf,
        }
    }
}

/// Parse a duration string like "30s", "5m", "24h", "1d", or "200ms".
///
/// A bare number is seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str.parse().map_err(|_| format!("invalid number in duration: {}", s))?;

    let multiplier: u64 = match suffix.trim() {
        "ms" | "millis" | "millisecond" | "milliseconds" => {
            return Ok(Duration::from_millis(num));
        }
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86400,
        other => return Err(format!("unknown duration suffix: {}", other)),
    };

    num.checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration out of range: {}", s))
}

/// Accepts a duration string or a plain number of seconds.
fn de_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Secs(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Secs(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
