// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History file specs
//!
//! The CSV history is an operator-facing artifact: check its exact layout
//! and that hand edits are picked up.

use crate::prelude::*;
use similar_asserts::assert_eq;
use tw_core::AlertKind;
use tw_engine::{MonitorConfig, RunOutcome};

#[tokio::test]
async fn history_file_layout() {
    let m = Monitor::new();
    m.export(&[("T2", "Reload HR", FAILED), ("T1", "Reload Sales", ERROR)]);
    m.run().await.unwrap();

    assert_eq!(
        m.history_text(),
        "task_id,task_name,first_failed_at,last_notified_at,last_seen_failed_at\n\
         T1,Reload Sales,2026-03-01T00:00:00Z,2026-03-01T00:00:00Z,2026-03-01T00:00:00Z\n\
         T2,Reload HR,2026-03-01T00:00:00Z,2026-03-01T00:00:00Z,2026-03-01T00:00:00Z\n"
    );
}

#[tokio::test]
async fn empty_run_writes_header_only() {
    let m = Monitor::new();
    m.export(&[]);
    let report = m.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Quiet);
    assert_eq!(
        m.history_text(),
        "task_id,task_name,first_failed_at,last_notified_at,last_seen_failed_at\n"
    );
}

#[tokio::test]
async fn hand_cleared_notification_time_triggers_reminder() {
    let m = Monitor::new();
    m.export(&[("T1", "Reload Sales", FAILED)]);
    m.run().await.unwrap();

    let edited = m.history_text().replace(
        "T1,Reload Sales,2026-03-01T00:00:00Z,2026-03-01T00:00:00Z,",
        "T1,Reload Sales,2026-03-01T00:00:00Z,,",
    );
    std::fs::write(m.history_path(), edited).unwrap();

    m.advance(HOUR);
    m.run().await.unwrap();

    let sent = m.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].alerting[0].kind, AlertKind::Reminder);
}

#[tokio::test]
async fn previous_history_is_backed_up() {
    let m = Monitor::new();
    m.export(&[("T1", "Reload Sales", FAILED)]);
    m.run().await.unwrap();
    let first = m.history_text();

    m.advance(HOUR);
    m.run().await.unwrap();

    let backup = m.dir().join("state").join("history.csv.bak");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), first);
    assert!(!m.dir().join("state").join("history.csv.tmp").exists());
}

#[tokio::test]
async fn zero_interval_reminds_every_run() {
    let config = MonitorConfig::from_toml(r#"reminder_interval = "0""#).unwrap();
    let m = Monitor::with_config(config);
    m.export(&[("T1", "Reload Sales", FAILED)]);

    for _ in 0..3 {
        m.run().await.unwrap();
        m.advance(HOUR);
    }

    assert_eq!(m.sent().len(), 3);
    let last_notified = hours(2).to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    assert!(m.history_text().contains(&format!(",{last_notified},{last_notified}\n")));
}
