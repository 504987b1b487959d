// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured alert payload handed to a notification sink.

use crate::time_fmt::{format_elapsed, format_timestamp};
use crate::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Why a task is part of the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// First failure of a new episode
    New,
    /// Still failing after the reminder interval elapsed
    Reminder,
}

crate::simple_display! {
    AlertKind {
        New => "new",
        Reminder => "reminder",
    }
}

/// A currently-failing task included in the alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertedTask {
    pub task_id: TaskId,
    pub task_name: String,
    pub kind: AlertKind,
    pub status: TaskStatus,
    pub failure_reason: Option<String>,
    pub last_execution_time: Option<DateTime<Utc>>,
    pub first_failed_at: DateTime<Utc>,
    pub app_name: Option<String>,
    pub stream: Option<String>,
    pub log_url: Option<String>,
}

/// A task that was failing last run and is no longer failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveredTask {
    pub task_id: TaskId,
    pub task_name: String,
    pub first_failed_at: DateTime<Utc>,
    pub last_seen_failed_at: DateTime<Utc>,
}

/// One consolidated alert for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub generated_at: DateTime<Utc>,
    /// New and reminder failures, ordered by `task_id`
    pub alerting: Vec<AlertedTask>,
    /// Still-failing tasks left out because they were alerted recently
    pub suppressed_count: usize,
    /// Recovered tasks, ordered by `task_id`
    pub recovered: Vec<RecoveredTask>,
}

impl Notification {
    pub fn title(&self) -> String {
        let n = self.alerting.len();
        if n == 0 {
            let r = self.recovered.len();
            return format!("Task Recovery Notice ({} Task{})", r, plural(r));
        }
        format!("Task Failure Alert ({} Task{})", n, plural(n))
    }

    /// Plain-text body listing alerting tasks, then recoveries.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if !self.alerting.is_empty() {
            out.push_str("Failed tasks:\n");
            for task in &self.alerting {
                let _ = writeln!(
                    out,
                    "- [{}] {} ({}): {} at {}, failing since {} ({})",
                    task.kind,
                    task.task_name,
                    task.task_id,
                    task.status,
                    format_timestamp(task.last_execution_time),
                    format_timestamp(Some(task.first_failed_at)),
                    format_elapsed(
                        (self.generated_at - task.first_failed_at).to_std().unwrap_or_default()
                    ),
                );
                if task.app_name.is_some() || task.stream.is_some() {
                    let _ = writeln!(
                        out,
                        "    app: {}, stream: {}",
                        task.app_name.as_deref().unwrap_or("N/A"),
                        task.stream.as_deref().unwrap_or("N/A"),
                    );
                }
                if let Some(reason) = &task.failure_reason {
                    let _ = writeln!(out, "    {}", reason);
                }
                if let Some(url) = &task.log_url {
                    let _ = writeln!(out, "    log: {}", url);
                }
            }
        }
        if self.suppressed_count > 0 {
            let _ = writeln!(
                out,
                "{} other task{} still failing (already alerted)",
                self.suppressed_count,
                plural(self.suppressed_count)
            );
        }
        if !self.recovered.is_empty() {
            out.push_str("Recovered tasks:\n");
            for task in &self.recovered {
                let _ = writeln!(
                    out,
                    "- {} ({}): failing since {}, last seen failing {}",
                    task.task_name,
                    task.task_id,
                    format_timestamp(Some(task.first_failed_at)),
                    format_timestamp(Some(task.last_seen_failed_at)),
                );
            }
        }
        out
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
