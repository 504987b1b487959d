// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure-state reconciliation.
//!
//! Diffs the current failure snapshot against the persisted history and
//! classifies every task involved as new, reminder, suppressed, or
//! recovered. The computation is pure: it performs no I/O, never fails,
//! and returns the history to persist instead of mutating the input.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tw_core::{
    AlertKind, AlertedTask, History, HistoryEntry, Notification, RecoveredTask, Snapshot,
    TaskSnapshot,
};

/// Class a task falls into for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    New,
    Reminder,
    Suppressed,
    Recovered,
}

tw_core::simple_display! {
    Classification {
        New => "new",
        Reminder => "reminder",
        Suppressed => "suppressed",
        Recovered => "recovered",
    }
}

/// Outcome of reconciling one snapshot against the history.
///
/// Every list is ordered by `task_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Tasks failing for the first time in this episode
    pub new_failures: Vec<TaskSnapshot>,
    /// Still failing, last alerted at least one reminder interval ago
    pub reminder_failures: Vec<TaskSnapshot>,
    /// Still failing, alerted too recently to repeat
    pub suppressed_failures: Vec<TaskSnapshot>,
    /// History entries of tasks no longer failing, as they were before this run
    pub recovered_tasks: Vec<HistoryEntry>,
    /// History to persist after this run
    pub updated_history: History,
}

impl Reconciliation {
    /// Whether this run has anything to alert on.
    ///
    /// Recoveries alone never warrant an alert; they ride along with one.
    pub fn notification_warranted(&self) -> bool {
        !self.new_failures.is_empty() || !self.reminder_failures.is_empty()
    }

    pub fn classification_of(&self, task_id: &str) -> Option<Classification> {
        let in_list = |list: &[TaskSnapshot]| list.iter().any(|t| t.task_id == task_id);
        if in_list(&self.new_failures) {
            Some(Classification::New)
        } else if in_list(&self.reminder_failures) {
            Some(Classification::Reminder)
        } else if in_list(&self.suppressed_failures) {
            Some(Classification::Suppressed)
        } else if self.recovered_tasks.iter().any(|e| e.task_id == task_id) {
            Some(Classification::Recovered)
        } else {
            None
        }
    }

    /// Build the alert for this run, if one should be sent.
    ///
    /// With `notify_on_recovery`, a run whose only news is recoveries also
    /// produces a notification.
    pub fn notification(
        &self,
        now: DateTime<Utc>,
        notify_on_recovery: bool,
    ) -> Option<Notification> {
        let recovery_only = notify_on_recovery && !self.recovered_tasks.is_empty();
        if !self.notification_warranted() && !recovery_only {
            return None;
        }

        let mut alerting: Vec<AlertedTask> = self
            .new_failures
            .iter()
            .map(|t| self.alerted(t, AlertKind::New, now))
            .chain(self.reminder_failures.iter().map(|t| self.alerted(t, AlertKind::Reminder, now)))
            .collect();
        alerting.sort_by(|a, b| a.task_id.cmp(&b.task_id));

        let recovered = self
            .recovered_tasks
            .iter()
            .map(|e| RecoveredTask {
                task_id: e.task_id.clone(),
                task_name: e.task_name.clone(),
                first_failed_at: e.first_failed_at,
                last_seen_failed_at: e.last_seen_failed_at,
            })
            .collect();

        Some(Notification {
            generated_at: now,
            alerting,
            suppressed_count: self.suppressed_failures.len(),
            recovered,
        })
    }

    fn alerted(&self, task: &TaskSnapshot, kind: AlertKind, now: DateTime<Utc>) -> AlertedTask {
        let first_failed_at = self
            .updated_history
            .get(task.task_id.as_str())
            .map(|e| e.first_failed_at)
            .unwrap_or(now);
        AlertedTask {
            task_id: task.task_id.clone(),
            task_name: task.task_name.clone(),
            kind,
            status: task.status,
            failure_reason: task.failure_reason.clone(),
            last_execution_time: task.last_execution_time,
            first_failed_at,
            app_name: task.app_name.clone(),
            stream: task.stream.clone(),
            log_url: task.log_url.clone(),
        }
    }
}

/// Time from `then` to `now`, clamped to zero if `then` is in the future.
pub fn elapsed_since(then: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - then).to_std().unwrap_or(Duration::ZERO)
}

/// A task never alerted is always due.
fn reminder_due(
    last_notified_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    reminder_interval: Duration,
) -> bool {
    match last_notified_at {
        None => true,
        Some(at) => elapsed_since(at, now) >= reminder_interval,
    }
}

/// Reconcile the current failure snapshot against the stored history.
pub fn reconcile(
    current: &Snapshot,
    history: &History,
    now: DateTime<Utc>,
    reminder_interval: Duration,
) -> Reconciliation {
    let mut new_failures = Vec::new();
    let mut reminder_failures = Vec::new();
    let mut suppressed_failures = Vec::new();
    let mut updated_history = History::new();

    for task in current.iter() {
        let Some(previous) = history.get(task.task_id.as_str()) else {
            updated_history.insert(HistoryEntry::opened(
                task.task_id.clone(),
                task.task_name.clone(),
                now,
            ));
            new_failures.push(task.clone());
            continue;
        };

        let mut entry = previous.clone();
        entry.task_name = task.task_name.clone();
        entry.last_seen_failed_at = now;
        if reminder_due(previous.last_notified_at, now, reminder_interval) {
            entry.last_notified_at = Some(now);
            reminder_failures.push(task.clone());
        } else {
            suppressed_failures.push(task.clone());
        }
        updated_history.insert(entry);
    }

    let recovered_tasks =
        history.entries().filter(|e| !current.contains(e.task_id.as_str())).cloned().collect();

    Reconciliation {
        new_failures,
        reminder_failures,
        suppressed_failures,
        recovered_tasks,
        updated_history,
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
