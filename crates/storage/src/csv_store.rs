// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flat-file history store.
//!
//! The history is a CSV file with a fixed header row followed by one row per
//! open failure episode. Timestamps are RFC 3339; an empty
//! `last_notified_at` cell means the task has never been alerted. The file
//! stays readable and hand-editable for operational debugging.

use crate::backup::backup_existing;
use crate::{HistoryStore, StoreError};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tw_core::{History, HistoryEntry};

/// Header row every history file starts with
pub const HISTORY_HEADER: [&str; 5] =
    ["task_id", "task_name", "first_failed_at", "last_notified_at", "last_seen_failed_at"];

#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
    backups: bool,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), backups: true }
    }

    /// Disable the rotated `.bak` copies taken before each save.
    pub fn without_backups(mut self) -> Self {
        self.backups = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn corrupt(&self, line: Option<u64>, reason: impl Into<String>) -> StoreError {
        StoreError::Corrupt { path: self.path.clone(), line, reason: reason.into() }
    }

    fn from_csv_error(&self, err: csv::Error) -> StoreError {
        let line = err.position().map(|p| p.line());
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => StoreError::Io(e),
            _ => self.corrupt(line, reason),
        }
    }

    fn write_rows(&self, file: File, history: &History) -> Result<File, StoreError> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(HISTORY_HEADER).map_err(|e| self.from_csv_error(e))?;
        for entry in history.entries() {
            writer.serialize(entry).map_err(|e| self.from_csv_error(e))?;
        }
        writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))
    }
}

impl HistoryStore for CsvHistoryStore {
    fn load(&self) -> Result<History, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        if file.metadata()?.len() == 0 {
            return Ok(History::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = reader.headers().map_err(|e| self.from_csv_error(e))?.clone();
        if headers.iter().ne(HISTORY_HEADER) {
            return Err(self.corrupt(
                Some(1),
                format!("unexpected header {:?}", headers.iter().collect::<Vec<_>>()),
            ));
        }

        let mut history = History::new();
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record).map_err(|e| self.from_csv_error(e))? {
            let line = record.position().map(|p| p.line());
            let entry: HistoryEntry = record.deserialize(Some(&headers)).map_err(|e| {
                let reason = e.to_string();
                self.corrupt(line, reason)
            })?;
            if entry.task_id.is_empty() {
                return Err(self.corrupt(line, "empty task_id"));
            }
            let task_id = entry.task_id.clone();
            if history.insert(entry).is_some() {
                return Err(self.corrupt(line, format!("duplicate task_id '{}'", task_id)));
            }
        }

        tracing::debug!(path = %self.path.display(), entries = history.len(), "loaded history");
        Ok(history)
    }

    fn save(&self, history: &History) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        let written = File::create(&tmp_path)
            .map_err(StoreError::from)
            .and_then(|file| self.write_rows(file, history))
            .and_then(|file| file.sync_all().map_err(StoreError::from));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if self.backups {
            if let Err(e) = backup_existing(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to back up history");
            }
        }

        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), entries = history.len(), "saved history");
        Ok(())
    }
}

#[cfg(test)]
#[path = "csv_store_tests.rs"]
mod tests;
