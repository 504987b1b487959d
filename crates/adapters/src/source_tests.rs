// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use tempfile::tempdir;

fn raw(id: Option<&str>, status: i64) -> RawTaskRecord {
    RawTaskRecord {
        id: id.map(String::from),
        name: Some("Reload Sales".to_string()),
        status,
        stop_time: Some("2026-03-01T08:15:00.000Z".to_string()),
        reason: Some("Script error".to_string()),
        app_name: Some("Sales Dashboard".to_string()),
        stream: Some("Finance".to_string()),
        log_url: Some("file:///logs/t1.log".to_string()),
    }
}

#[test]
fn failed_record_becomes_snapshot() {
    let task = raw(Some("t1"), 8).into_snapshot().unwrap().unwrap();

    assert_eq!(task.task_id, "t1");
    assert_eq!(task.task_name, "Reload Sales");
    assert_eq!(task.status, TaskStatus::FinishedFail);
    assert_eq!(
        task.last_execution_time,
        Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 15, 0).unwrap())
    );
    assert_eq!(task.failure_reason.as_deref(), Some("Script error"));
    assert_eq!(task.app_name.as_deref(), Some("Sales Dashboard"));
    assert_eq!(task.stream.as_deref(), Some("Finance"));
    assert_eq!(task.log_url.as_deref(), Some("file:///logs/t1.log"));
}

#[yare::parameterized(
    success     = { 7 },
    running     = { 2 },
    never_run   = { 0 },
)]
fn healthy_record_is_skipped(status: i64) {
    assert_eq!(raw(Some("t1"), status).into_snapshot().unwrap(), None);
}

#[test]
fn healthy_record_without_id_is_still_skipped() {
    assert_eq!(raw(None, 7).into_snapshot().unwrap(), None);
}

#[yare::parameterized(
    missing = { None },
    blank   = { Some("  ") },
)]
fn failed_record_without_id_is_invalid(id: Option<&str>) {
    let err = raw(id, 11).into_snapshot().unwrap_err();
    assert!(err.contains("missing task id"), "got {err}");
}

#[test]
fn missing_name_and_time_are_defaulted() {
    let record = RawTaskRecord {
        id: Some("t1".to_string()),
        status: 4,
        stop_time: Some(String::new()),
        ..Default::default()
    };
    let task = record.into_snapshot().unwrap().unwrap();

    assert_eq!(task.task_name, UNKNOWN_TASK_NAME);
    assert_eq!(task.last_execution_time, None);
    assert_eq!(task.failure_reason, None);
    assert_eq!((task.app_name, task.stream, task.log_url), (None, None, None));
    assert_eq!(task.status, TaskStatus::AbortInitiated);
}

#[test]
fn unparsable_stop_time_is_invalid() {
    let mut record = raw(Some("t1"), 8);
    record.stop_time = Some("yesterday".to_string());
    let err = record.into_snapshot().unwrap_err();
    assert!(err.contains("bad stop time"), "got {err}");
}

#[test]
fn validate_records_is_all_or_nothing() {
    let records = vec![raw(Some("t1"), 8), raw(None, 8), raw(Some("t3"), 8)];
    match validate_records(records) {
        Err(SourceError::Invalid(msg)) => assert!(msg.starts_with("record 1:"), "got {msg}"),
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[tokio::test]
async fn file_source_reads_failed_tasks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "t1", "name": "Reload Sales", "status": 8, "stopTime": "2026-03-01T08:15:00Z",
             "appName": "Sales Dashboard", "stream": "Finance", "logUrl": "file:///logs/t1.log"},
            {"id": "t2", "name": "Reload Stock", "status": 7},
            {"id": "t3", "status": 11, "reason": "Engine timeout"}
        ]"#,
    )
    .unwrap();

    let tasks = FileSnapshotSource::new(&path).fetch().await.unwrap();

    let ids: Vec<&str> = tasks.iter().map(|t| t.task_id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t3"]);
    assert_eq!(tasks[0].app_name.as_deref(), Some("Sales Dashboard"));
    assert_eq!(tasks[0].stream.as_deref(), Some("Finance"));
    assert_eq!(tasks[0].log_url.as_deref(), Some("file:///logs/t1.log"));
    assert_eq!(tasks[1].task_name, UNKNOWN_TASK_NAME);
    assert_eq!(tasks[1].app_name, None);
    assert_eq!(tasks[1].failure_reason.as_deref(), Some("Engine timeout"));
}

#[tokio::test]
async fn file_source_missing_file_is_unavailable() {
    let dir = tempdir().unwrap();
    let source = FileSnapshotSource::new(dir.path().join("absent.json"));
    assert!(matches!(source.fetch().await, Err(SourceError::Unavailable(_))));
}

#[tokio::test]
async fn file_source_malformed_json_is_invalid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, r#"[{"id": "t1", "status": 8}"#).unwrap();

    let source = FileSnapshotSource::new(&path);
    assert!(matches!(source.fetch().await, Err(SourceError::Invalid(_))));
}

#[tokio::test]
async fn fake_source_counts_fetches_and_injects_failure() {
    let source = FakeSnapshotSource::with_tasks(vec![raw(Some("t1"), 8)
        .into_snapshot()
        .unwrap()
        .unwrap()]);

    assert_eq!(source.fetch().await.unwrap().len(), 1);
    source.fail_with("connection refused");
    assert!(matches!(source.fetch().await, Err(SourceError::Unavailable(_))));
    source.recover();
    assert!(source.fetch().await.is_ok());
    assert_eq!(source.fetch_count(), 3);
}
