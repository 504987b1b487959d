// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot sources: the collaborators that report currently-failing tasks.
//!
//! A source must deliver the complete failure set or fail the whole fetch.
//! A truncated list would be indistinguishable from a mass recovery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tw_core::{TaskId, TaskSnapshot, TaskStatus};

/// Name reported for a task the platform returned without one
pub const UNKNOWN_TASK_NAME: &str = "Unknown Task";

/// Errors from snapshot sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
    #[error("invalid snapshot data: {0}")]
    Invalid(String),
}

/// Adapter producing the current failure snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch every task that is currently failing.
    async fn fetch(&self) -> Result<Vec<TaskSnapshot>, SourceError>;
}

/// Task record as exported by the task platform, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTaskRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Platform status code of the last execution
    pub status: i64,
    /// RFC 3339 stop time of the last execution
    #[serde(default)]
    pub stop_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    /// Link to the execution log of the last run
    #[serde(default)]
    pub log_url: Option<String>,
}

impl RawTaskRecord {
    /// Validate the record into a snapshot.
    ///
    /// Returns `Ok(None)` for tasks whose last execution did not fail.
    pub fn into_snapshot(self) -> Result<Option<TaskSnapshot>, String> {
        let Some(status) = TaskStatus::from_code(self.status) else {
            return Ok(None);
        };

        let task_id = match self.id {
            Some(id) if !id.trim().is_empty() => TaskId::from(id.trim()),
            _ => return Err("missing task id".to_string()),
        };

        let last_execution_time = match self.stop_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| format!("task {}: bad stop time '{}': {}", task_id, raw, e))?
                    .with_timezone(&Utc),
            ),
        };

        let task_name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TASK_NAME.to_string());

        Ok(Some(TaskSnapshot {
            task_id,
            task_name,
            status,
            last_execution_time,
            failure_reason: non_blank(self.reason),
            app_name: non_blank(self.app_name),
            stream: non_blank(self.stream),
            log_url: non_blank(self.log_url),
        }))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate a full export, all or nothing.
pub fn validate_records(records: Vec<RawTaskRecord>) -> Result<Vec<TaskSnapshot>, SourceError> {
    let total = records.len();
    let mut failed = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        match record.into_snapshot() {
            Ok(Some(task)) => failed.push(task),
            Ok(None) => {}
            Err(reason) => {
                return Err(SourceError::Invalid(format!("record {}: {}", index, reason)));
            }
        }
    }
    tracing::debug!(total, failed = failed.len(), "validated task records");
    Ok(failed)
}

/// Reads a JSON array of [`RawTaskRecord`]s exported from the task platform.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch(&self) -> Result<Vec<TaskSnapshot>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SourceError::Unavailable(format!("reading {}: {}", self.path.display(), e))
        })?;
        let records: Vec<RawTaskRecord> = serde_json::from_str(&text)
            .map_err(|e| SourceError::Invalid(format!("{}: {}", self.path.display(), e)))?;
        validate_records(records)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{SnapshotSource, SourceError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tw_core::TaskSnapshot;

    #[derive(Default)]
    struct FakeSourceState {
        tasks: Vec<TaskSnapshot>,
        failure: Option<String>,
        fetches: usize,
    }

    /// Fake snapshot source for testing
    #[derive(Clone, Default)]
    pub struct FakeSnapshotSource {
        inner: Arc<Mutex<FakeSourceState>>,
    }

    impl FakeSnapshotSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_tasks(tasks: Vec<TaskSnapshot>) -> Self {
            let source = Self::new();
            source.set_tasks(tasks);
            source
        }

        /// Replace the failure set returned by subsequent fetches
        pub fn set_tasks(&self, tasks: Vec<TaskSnapshot>) {
            self.inner.lock().tasks = tasks;
        }

        /// Make subsequent fetches fail as unavailable
        pub fn fail_with(&self, message: impl Into<String>) {
            self.inner.lock().failure = Some(message.into());
        }

        pub fn recover(&self) {
            self.inner.lock().failure = None;
        }

        pub fn fetch_count(&self) -> usize {
            self.inner.lock().fetches
        }
    }

    #[async_trait]
    impl SnapshotSource for FakeSnapshotSource {
        async fn fetch(&self) -> Result<Vec<TaskSnapshot>, SourceError> {
            let mut state = self.inner.lock();
            state.fetches += 1;
            match &state.failure {
                Some(message) => Err(SourceError::Unavailable(message.clone())),
                None => Ok(state.tasks.clone()),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSnapshotSource;

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
