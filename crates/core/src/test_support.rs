// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{HistoryEntry, TaskId, TaskSnapshot};
use chrono::{DateTime, TimeDelta, Utc};

/// Fixed reference time all test timestamps are offset from (2026-03-01T00:00:00Z).
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_772_323_200, 0).unwrap_or_default()
}

/// `epoch() + hours`
pub fn hours(h: i64) -> DateTime<Utc> {
    epoch() + TimeDelta::hours(h)
}

pub fn failed(id: &str) -> TaskSnapshot {
    TaskSnapshot::builder().task_id(id).task_name(format!("Task {}", id)).build()
}

/// History entry opened at `first` and last notified at `notified`.
pub fn entry(id: &str, first: DateTime<Utc>, notified: Option<DateTime<Utc>>) -> HistoryEntry {
    HistoryEntry {
        task_id: TaskId::from(id),
        task_name: format!("Task {}", id),
        first_failed_at: first,
        last_notified_at: notified,
        last_seen_failed_at: notified.unwrap_or(first),
    }
}

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for snapshots and histories.
///
/// IDs are drawn from a small pool so generated snapshots and histories
/// overlap often enough to exercise every classification.
pub mod strategies {
    use super::{entry, failed, hours};
    use crate::{History, Snapshot, TaskId, TaskStatus};
    use proptest::prelude::*;

    pub fn arb_task_id() -> impl Strategy<Value = TaskId> {
        (0u8..12).prop_map(|n| TaskId::from(format!("t{:02}", n)))
    }

    pub fn arb_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::AbortInitiated),
            Just(TaskStatus::Aborting),
            Just(TaskStatus::FinishedFail),
            Just(TaskStatus::Error),
        ]
    }

    pub fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
        prop::collection::vec((arb_task_id(), arb_status()), 0..10).prop_map(|records| {
            records
                .into_iter()
                .map(|(id, status)| {
                    let mut task = failed(id.as_str());
                    task.status = status;
                    task
                })
                .collect()
        })
    }

    /// Histories whose timestamps fall within the first 96 hours after `epoch()`.
    pub fn arb_history() -> impl Strategy<Value = History> {
        prop::collection::vec((arb_task_id(), 0i64..48, proptest::option::of(0i64..48)), 0..10)
            .prop_map(|rows| {
                rows.into_iter()
                    .map(|(id, first, notified)| {
                        entry(id.as_str(), hours(first), notified.map(|n| hours(first + n)))
                    })
                    .collect()
            })
    }
}
