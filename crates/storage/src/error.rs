// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Errors from history store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no history stored at {}", .0.display())]
    NotFound(PathBuf),

    /// `line` is the 1-based line of the offending record, when known
    #[error("history at {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, line: Option<u64>, reason: String },

    #[error("failed to acquire run lock {}: another run is active?", .0.display())]
    Locked(PathBuf, #[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
