// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted failure history.
//!
//! A [`History`] holds one [`HistoryEntry`] per task in an open failure
//! episode. It is loaded whole at the start of a run, replaced whole by the
//! reconciliation result, and written back whole at the end.

use crate::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Failure/notification state of one task across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub task_id: TaskId,
    /// Last name the source reported, kept so recoveries can be reported by name
    pub task_name: String,
    /// Start of the current failure episode
    pub first_failed_at: DateTime<Utc>,
    /// Last time this task was included in a sent alert
    pub last_notified_at: Option<DateTime<Utc>>,
    /// Most recent run that still saw the task failing
    pub last_seen_failed_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry for a task seen failing for the first time in this episode.
    pub fn opened(task_id: TaskId, task_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            task_id,
            task_name: task_name.into(),
            first_failed_at: now,
            last_notified_at: Some(now),
            last_seen_failed_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: BTreeMap<TaskId, HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for its task.
    pub fn insert(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.insert(entry.task_id.clone(), entry)
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries in `task_id` order.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.values()
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<HistoryEntry> for History {
    fn from_iter<I: IntoIterator<Item = HistoryEntry>>(iter: I) -> Self {
        let mut history = Self::new();
        for entry in iter {
            history.insert(entry);
        }
        history
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
