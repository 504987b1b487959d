// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-run monitoring specs
//!
//! Drive the monitor through a failure episode day by day and check what
//! gets sent and what the history file records.

use crate::prelude::*;
use similar_asserts::assert_eq;
use tw_core::AlertKind;
use tw_engine::{MonitorConfig, RunError, RunOutcome};

#[tokio::test]
async fn failure_episode_from_first_alert_to_recovery() {
    let m = Monitor::new();

    // Day 0: first failure alerts immediately.
    m.export(&[("T1", "Reload Sales", FAILED), ("T2", "Reload HR", SUCCESS)]);
    let report = m.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Notified);
    assert_eq!(report.new, 1);
    let sent = m.sent();
    assert_eq!(sent[0].title(), "Task Failure Alert (1 Task)");
    assert_eq!(sent[0].alerting[0].task_name, "Reload Sales");
    assert_eq!(sent[0].alerting[0].failure_reason.as_deref(), Some("Connection refused"));
    let body = sent[0].render_text();
    assert!(body.contains("    app: Reload Sales App, stream: Operations\n"), "body:\n{body}");
    assert!(body.contains("    log: file:///logs/T1.log\n"), "body:\n{body}");

    // Hourly runs stay quiet inside the reminder interval.
    for _ in 0..23 {
        m.advance(HOUR);
        let report = m.run().await.unwrap();
        assert_eq!(report.outcome, RunOutcome::Quiet);
        assert_eq!(report.suppressed, 1);
    }
    assert_eq!(m.sent().len(), 1);

    // Day 1: a second task fails and the first is due a reminder.
    m.advance(HOUR);
    m.export(&[("T1", "Reload Sales", FAILED), ("T3", "Reload Finance", ERROR)]);
    let report = m.run().await.unwrap();
    assert_eq!((report.new, report.reminders), (1, 1));
    let sent = m.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].title(), "Task Failure Alert (2 Tasks)");
    let kinds: Vec<(&str, AlertKind)> =
        sent[1].alerting.iter().map(|t| (t.task_id.as_str(), t.kind)).collect();
    assert_eq!(kinds, vec![("T1", AlertKind::Reminder), ("T3", AlertKind::New)]);
    assert_eq!(sent[1].alerting[0].first_failed_at, epoch());

    // Day 1, later: T1 recovers. Only T3 remains tracked.
    m.advance(HOUR);
    m.export(&[("T3", "Reload Finance", ERROR)]);
    let report = m.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Quiet);
    assert_eq!((report.recovered, report.suppressed, report.tracked), (1, 1, 1));

    let text = m.history_text();
    assert!(!text.contains("T1,"), "recovered task still tracked:\n{text}");
    assert!(text.contains("T3,Reload Finance,2026-03-02T00:00:00Z,2026-03-02T00:00:00Z,2026-03-02T01:00:00Z"));
}

#[tokio::test]
async fn refailure_after_recovery_alerts_as_new() {
    let m = Monitor::new();
    m.export(&[("T1", "Reload Sales", FAILED)]);
    m.run().await.unwrap();

    m.advance(HOUR);
    m.export(&[]);
    m.run().await.unwrap();

    m.advance(HOUR);
    m.export(&[("T1", "Reload Sales", FAILED)]);
    let report = m.run().await.unwrap();

    assert_eq!(report.new, 1);
    let sent = m.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].alerting[0].kind, AlertKind::New);
    assert_eq!(sent[1].alerting[0].first_failed_at, hours(2));
}

#[tokio::test]
async fn unreachable_source_keeps_history_file() {
    let m = Monitor::new();
    m.export(&[("T1", "Reload Sales", FAILED)]);
    m.run().await.unwrap();
    let before = m.history_text();

    m.advance(HOUR);
    m.remove_export();
    let err = m.run().await.unwrap_err();

    assert!(matches!(err, RunError::SourceUnavailable(_)), "got {err:?}");
    assert_eq!(m.history_text(), before);
}

#[tokio::test]
async fn failed_dispatch_is_retried_next_run() {
    let m = Monitor::new();
    m.export(&[("T1", "Reload Sales", FAILED)]);
    m.notifier.fail_with("mail relay down");

    let err = m.run().await.unwrap_err();
    assert!(matches!(err, RunError::SinkDispatchFailed(_)), "got {err:?}");
    assert!(!m.history_path().exists());

    m.notifier.recover();
    m.advance(HOUR);
    let report = m.run().await.unwrap();
    assert_eq!(report.new, 1);
    assert_eq!(m.sent().len(), 1);
    assert!(m.history_path().exists());
}

#[tokio::test]
async fn corrupt_history_file_is_not_overwritten() {
    let m = Monitor::new();
    std::fs::create_dir_all(m.history_path().parent().unwrap()).unwrap();
    std::fs::write(m.history_path(), "not,a,history\n").unwrap();
    m.export(&[("T1", "Reload Sales", FAILED)]);

    let err = m.run().await.unwrap_err();

    assert!(matches!(err, RunError::StoreCorrupt(_)), "got {err:?}");
    assert!(m.sent().is_empty());
    assert_eq!(m.history_text(), "not,a,history\n");
}

#[tokio::test]
async fn dry_run_advances_reminder_timer_without_sending() {
    let m = Monitor::with_config(MonitorConfig::default().dry_run(true));
    m.export(&[("T1", "Reload Sales", FAILED)]);

    let report = m.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::DryRun);
    assert!(m.sent().is_empty());
    let notified = m.now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    assert!(m.history_text().contains(&format!("T1,Reload Sales,{notified},{notified},{notified}")));
}

#[tokio::test]
async fn overlapping_runs_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join("taskwatch.lock");
    let m = Monitor::with_config(MonitorConfig::default().lock_path(&lock_path));
    m.export(&[("T1", "Reload Sales", FAILED)]);

    let held = tw_storage::RunLock::acquire(&lock_path).unwrap();
    let err = m.run().await.unwrap_err();
    assert!(matches!(err, RunError::Locked(_)), "got {err:?}");
    assert!(m.sent().is_empty());
    drop(held);

    assert_eq!(m.run().await.unwrap().outcome, RunOutcome::Notified);
}
