// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use tw_adapters::{NotifyError, SourceError};
use tw_storage::StoreError;

/// Why a run was aborted.
///
/// Whatever the variant, the stored history is left as it was before the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("another run holds the lock")]
    Locked(#[source] StoreError),
    #[error("snapshot source unavailable")]
    SourceUnavailable(#[from] SourceError),
    #[error("failure history is corrupt")]
    StoreCorrupt(#[source] StoreError),
    #[error("failure history could not be read")]
    StoreUnavailable(#[source] StoreError),
    #[error("notification dispatch failed")]
    SinkDispatchFailed(#[from] NotifyError),
    #[error("failure history could not be written")]
    StoreWriteFailed(#[source] StoreError),
}

impl RunError {
    /// Classify a load failure. A missing store is not an error and is
    /// handled by the caller before this is reached.
    pub(crate) fn from_load(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt { .. } => RunError::StoreCorrupt(err),
            _ => RunError::StoreUnavailable(err),
        }
    }
}
