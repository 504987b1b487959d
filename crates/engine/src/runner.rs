// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestrator
//!
//! One run: fetch the failure snapshot, load the history, reconcile, alert,
//! then persist. Any failure before the final save leaves the stored history
//! untouched, so the next run sees the same state and retries the alert.

use crate::config::MonitorConfig;
use crate::error::RunError;
use crate::reconcile::{reconcile, Reconciliation};
use chrono::{DateTime, Utc};
use tw_adapters::{NotifyAdapter, SnapshotSource};
use tw_core::{Clock, History, Snapshot};
use tw_storage::{HistoryStore, RunLock, StoreError};

/// What a completed run did about alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A notification was delivered
    Notified,
    /// A notification was due but only logged
    DryRun,
    /// Nothing to alert on
    Quiet,
}

tw_core::simple_display! {
    RunOutcome {
        Notified => "notified",
        DryRun => "dry-run",
        Quiet => "quiet",
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub new: usize,
    pub reminders: usize,
    pub suppressed: usize,
    pub recovered: usize,
    /// Entries in the history after the run
    pub tracked: usize,
}

/// Runs the monitor against its collaborators
pub struct Runner<S, N, H, C: Clock> {
    source: S,
    notifier: N,
    store: H,
    clock: C,
    config: MonitorConfig,
}

impl<S, N, H, C> Runner<S, N, H, C>
where
    S: SnapshotSource,
    N: NotifyAdapter,
    H: HistoryStore,
    C: Clock,
{
    pub fn new(source: S, notifier: N, store: H, clock: C, config: MonitorConfig) -> Self {
        Self { source, notifier, store, clock, config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Execute one monitoring run.
    ///
    /// The history is saved only after the alert (if any) has been accepted
    /// by the notifier, or logged in dry-run mode.
    pub async fn run_once(&self) -> Result<RunReport, RunError> {
        let _lock = match &self.config.lock_path {
            Some(path) => Some(RunLock::acquire(path).map_err(|e| abort(RunError::Locked(e)))?),
            None => None,
        };

        let records = self.source.fetch().await.map_err(|e| abort(RunError::from(e)))?;
        let current = Snapshot::from_records(records);

        let history = self.load_history().map_err(abort)?;

        let now = self.clock.now();
        let result = reconcile(&current, &history, now, self.config.reminder_interval);
        log_classifications(&result);

        let outcome = match result.notification(now, self.config.notify_on_recovery) {
            None => RunOutcome::Quiet,
            Some(notification) if self.config.dry_run => {
                tracing::info!(
                    title = %notification.title(),
                    "dry run, not sending notification:\n{}",
                    notification.render_text()
                );
                RunOutcome::DryRun
            }
            Some(notification) => {
                self.notifier
                    .notify(&notification)
                    .await
                    .map_err(|e| abort(RunError::from(e)))?;
                RunOutcome::Notified
            }
        };

        self.store
            .save(&result.updated_history)
            .map_err(|e| abort(RunError::StoreWriteFailed(e)))?;

        let report = RunReport {
            started_at: now,
            outcome,
            new: result.new_failures.len(),
            reminders: result.reminder_failures.len(),
            suppressed: result.suppressed_failures.len(),
            recovered: result.recovered_tasks.len(),
            tracked: result.updated_history.len(),
        };
        tracing::info!(
            outcome = %report.outcome,
            new = report.new,
            reminders = report.reminders,
            suppressed = report.suppressed,
            recovered = report.recovered,
            tracked = report.tracked,
            "run complete"
        );
        Ok(report)
    }

    fn load_history(&self) -> Result<History, RunError> {
        match self.store.load() {
            Ok(history) => Ok(history),
            Err(StoreError::NotFound(path)) => {
                tracing::info!(path = %path.display(), "no failure history yet, starting empty");
                Ok(History::new())
            }
            Err(e) => Err(RunError::from_load(e)),
        }
    }
}

fn abort(err: RunError) -> RunError {
    match std::error::Error::source(&err) {
        Some(cause) => tracing::error!(error = %cause, "run aborted: {}", err),
        None => tracing::error!("run aborted: {}", err),
    }
    err
}

fn log_classifications(result: &Reconciliation) {
    for task in &result.new_failures {
        tracing::info!(task_id = %task.task_id, task = %task.task_name, status = %task.status, "new failure");
    }
    for task in &result.reminder_failures {
        tracing::info!(task_id = %task.task_id, task = %task.task_name, "reminder due");
    }
    for task in &result.suppressed_failures {
        tracing::debug!(task_id = %task.task_id, task = %task.task_name, "still failing, reminder not due");
    }
    for entry in &result.recovered_tasks {
        tracing::info!(
            task_id = %entry.task_id,
            task = %entry.task_name,
            since = %entry.first_failed_at,
            "recovered"
        );
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
