// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for taskwatch: the durable failure history

mod backup;
mod csv_store;
mod error;
mod lock;
#[cfg(any(test, feature = "test-support"))]
mod memory;

pub use csv_store::{CsvHistoryStore, HISTORY_HEADER};
pub use error::StoreError;
pub use lock::RunLock;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryHistoryStore;

use tw_core::History;

/// Durable owner of the failure history.
///
/// Implementations load and replace the history as a whole; a failed `save`
/// must leave the previously stored history intact.
pub trait HistoryStore: Send + Sync {
    /// Load the stored history.
    ///
    /// Returns [`StoreError::NotFound`] if nothing has been stored yet and
    /// [`StoreError::Corrupt`] if the stored data cannot be parsed.
    fn load(&self) -> Result<History, StoreError>;

    /// Atomically replace the stored history.
    fn save(&self, history: &History) -> Result<(), StoreError>;
}
