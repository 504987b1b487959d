// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-level lock enforcing at most one active run per history store.

use crate::StoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exclusive advisory lock held for the duration of a run.
///
/// The lock file records the holder's PID. The lock is released when the
/// value is dropped; the file itself is left in place.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    file: File,
}

impl RunLock {
    /// Acquire the lock without waiting.
    ///
    /// Fails with [`StoreError::Locked`] if another run holds it.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Don't truncate before holding the lock: that would wipe the
        // running holder's PID.
        let mut file =
            OpenOptions::new().read(true).write(true).create(true).truncate(false).open(&path)?;
        file.try_lock_exclusive().map_err(|e| StoreError::Locked(path.clone(), e))?;

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;

        tracing::debug!(path = %path.display(), "acquired run lock");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
