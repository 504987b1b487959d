// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotated backups of the history file taken before each replace.

use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const MAX_BAK_FILES: u32 = 3;

/// Path of the `n`th backup: `<file>.bak`, `<file>.bak.2`, ...
pub(crate) fn bak_path(path: &Path, n: u32) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    if n == 1 {
        name.push(".bak");
    } else {
        name.push(format!(".bak.{n}"));
    }
    path.with_file_name(name)
}

/// Pick the next backup path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups. The oldest backup is removed when
/// the limit is reached.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let oldest = bak_path(path, MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak_path(path, n);
        if src.exists() {
            let _ = fs::rename(&src, bak_path(path, n + 1));
        }
    }

    bak_path(path, 1)
}

/// Copy the current history file to a fresh backup slot.
///
/// A missing source is not an error: there is nothing to back up yet.
pub(crate) fn backup_existing(path: &Path) -> std::io::Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let bak = rotate_bak_path(path);
    fs::copy(path, &bak)?;
    Ok(Some(bak))
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
