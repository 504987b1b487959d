// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the collaborators around a run: where failed tasks come
//! from and where alerts go.

pub mod notify;
pub mod source;

pub use notify::{DesktopNotifyAdapter, NotifyAdapter, NotifyError};
pub use source::{FileSnapshotSource, RawTaskRecord, SnapshotSource, SourceError};

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use source::FakeSnapshotSource;
