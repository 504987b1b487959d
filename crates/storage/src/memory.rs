// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory history store with failure injection, for tests.

use crate::{HistoryStore, StoreError};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tw_core::History;

const MEMORY_PATH: &str = "<memory>";

#[derive(Default)]
struct MemoryState {
    history: Option<History>,
    corrupt: bool,
    fail_saves: bool,
    saves: usize,
}

/// Clones share state, so a test can keep a handle while the runner owns one.
#[derive(Clone, Default)]
pub struct MemoryHistoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryHistoryStore {
    /// A store with nothing saved yet (loads as `NotFound`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: History) -> Self {
        let store = Self::new();
        store.inner.lock().history = Some(history);
        store
    }

    /// Make every subsequent `load` fail as corrupt.
    pub fn set_corrupt(&self, corrupt: bool) {
        self.inner.lock().corrupt = corrupt;
    }

    /// Make every subsequent `save` fail with an I/O error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.inner.lock().fail_saves = fail;
    }

    /// Currently stored history, `None` if never saved.
    pub fn history(&self) -> Option<History> {
        self.inner.lock().history.clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<History, StoreError> {
        let state = self.inner.lock();
        if state.corrupt {
            return Err(StoreError::Corrupt {
                path: PathBuf::from(MEMORY_PATH),
                line: None,
                reason: "injected corruption".to_string(),
            });
        }
        state.history.clone().ok_or_else(|| StoreError::NotFound(PathBuf::from(MEMORY_PATH)))
    }

    fn save(&self, history: &History) -> Result<(), StoreError> {
        let mut state = self.inner.lock();
        if state.fail_saves {
            return Err(StoreError::Io(std::io::Error::other("injected save failure")));
        }
        state.history = Some(history.clone());
        state.saves += 1;
        Ok(())
    }
}
