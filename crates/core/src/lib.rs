// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-core: Data model shared by the taskwatch crates

pub mod macros;

pub mod clock;
pub mod history;
pub mod id;
pub mod notification;
pub mod task;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use history::{History, HistoryEntry};
pub use id::TaskId;
pub use notification::{AlertKind, AlertedTask, Notification, RecoveredTask};
#[cfg(any(test, feature = "test-support"))]
pub use task::TaskSnapshotBuilder;
pub use task::{Snapshot, TaskSnapshot, TaskStatus};
pub use time_fmt::{format_elapsed, format_timestamp};
