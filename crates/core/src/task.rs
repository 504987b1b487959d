// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failed-task observations and the per-run snapshot.

use crate::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Execution status of a failed task run.
///
/// Only the platform's failure statuses are represented; every other status
/// code means the task is healthy and never becomes a [`TaskSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    AbortInitiated,
    Aborting,
    FinishedFail,
    Error,
}

impl TaskStatus {
    /// Map a platform status code to a failure status.
    ///
    /// Returns `None` for codes that do not indicate a failure.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            4 => Some(Self::AbortInitiated),
            5 => Some(Self::Aborting),
            8 => Some(Self::FinishedFail),
            11 => Some(Self::Error),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::AbortInitiated => 4,
            Self::Aborting => 5,
            Self::FinishedFail => 8,
            Self::Error => 11,
        }
    }
}

crate::simple_display! {
    TaskStatus {
        AbortInitiated => "AbortInitiated",
        Aborting => "Aborting",
        FinishedFail => "FinishedFail",
        Error => "Error",
    }
}

/// One currently-failed task as observed in a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task_id: TaskId,
    pub task_name: String,
    pub status: TaskStatus,
    /// When the failing execution stopped, if the platform reported it
    pub last_execution_time: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    /// App the task reloads
    pub app_name: Option<String>,
    /// Stream the app is published to
    pub stream: Option<String>,
    /// Where the execution log of the failing run can be read
    pub log_url: Option<String>,
}

crate::builder! {
    pub struct TaskSnapshotBuilder => TaskSnapshot {
        into {
            task_id: TaskId = "task-1",
            task_name: String = "Reload Sales",
        }
        set {
            status: TaskStatus = TaskStatus::FinishedFail,
        }
        option {
            last_execution_time: DateTime<Utc> = None,
            failure_reason: String = None,
            app_name: String = None,
            stream: String = None,
            log_url: String = None,
        }
    }
}

/// The complete set of currently-failing tasks for one run.
///
/// Unique by `task_id` and iterated in `task_id` order, so nothing
/// downstream depends on the order the source delivered records in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    tasks: BTreeMap<TaskId, TaskSnapshot>,
}

impl Snapshot {
    /// Build a snapshot from raw source records.
    ///
    /// Duplicate `task_id`s collapse to the last record seen.
    pub fn from_records(records: impl IntoIterator<Item = TaskSnapshot>) -> Self {
        let mut tasks = BTreeMap::new();
        for record in records {
            tasks.insert(record.task_id.clone(), record);
        }
        Self { tasks }
    }

    pub fn get(&self, id: &str) -> Option<&TaskSnapshot> {
        self.tasks.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskSnapshot> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<TaskSnapshot> for Snapshot {
    fn from_iter<I: IntoIterator<Item = TaskSnapshot>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
