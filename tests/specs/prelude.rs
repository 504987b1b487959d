// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixture for specs: a monitor wired to an export file and a CSV
//! history in a temporary directory.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tw_adapters::{FakeNotifyAdapter, FileSnapshotSource};
use tw_core::{FakeClock, Notification};
use tw_engine::{MonitorConfig, RunError, RunReport, Runner};
use tw_storage::CsvHistoryStore;

pub use tw_core::test_support::{epoch, hours};

pub const HOUR: Duration = Duration::from_secs(3600);

/// Task status codes as the platform reports them
pub const SUCCESS: i64 = 7;
pub const FAILED: i64 = 8;
pub const ERROR: i64 = 11;

pub struct Monitor {
    dir: TempDir,
    pub clock: FakeClock,
    pub notifier: FakeNotifyAdapter,
    runner: Runner<FileSnapshotSource, FakeNotifyAdapter, CsvHistoryStore, FakeClock>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let clock = FakeClock::new(epoch());
        let notifier = FakeNotifyAdapter::new();
        let source = FileSnapshotSource::new(dir.path().join("tasks.json"));
        let store = CsvHistoryStore::new(dir.path().join("state").join("history.csv"));
        let runner = Runner::new(source, notifier.clone(), store, clock.clone(), config);
        Self { dir, clock, notifier, runner }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir().join("state").join("history.csv")
    }

    pub fn history_text(&self) -> String {
        std::fs::read_to_string(self.history_path()).unwrap()
    }

    /// Write the platform export the next run will read.
    pub fn export(&self, tasks: &[(&str, &str, i64)]) {
        let records: Vec<serde_json::Value> = tasks
            .iter()
            .map(|(id, name, status)| {
                serde_json::json!({
                    "id": id,
                    "name": name,
                    "status": status,
                    "stopTime": "2026-02-28T23:30:00Z",
                    "reason": "Connection refused",
                    "appName": format!("{name} App"),
                    "stream": "Operations",
                    "logUrl": format!("file:///logs/{id}.log"),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&records).unwrap();
        std::fs::write(self.dir().join("tasks.json"), text).unwrap();
    }

    pub fn remove_export(&self) {
        std::fs::remove_file(self.dir().join("tasks.json")).unwrap();
    }

    pub async fn run(&self) -> Result<RunReport, RunError> {
        self.runner.run_once().await
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.notifier.calls()
    }

    pub fn now(&self) -> DateTime<Utc> {
        use tw_core::Clock;
        self.clock.now()
    }
}
