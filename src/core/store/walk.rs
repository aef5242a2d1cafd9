//! Store traversal.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use crate::core::constants::{GIT_DIR, SECRET_EXTENSION};
use crate::error::{Result, StoreError};

/// Every `*.gpg` file at least one directory below `root`, skipping `.git`.
pub(super) fn secret_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_git_dir(e)) {
        let entry = entry.map_err(StoreError::Walk)?;

        if entry.file_type().is_dir() {
            continue;
        }
        // depth 1 is the store root itself; secrets need a domain directory
        if entry.depth() <= 1 {
            continue;
        }
        if !is_secret_name(entry.file_name()) {
            continue;
        }

        trace!(path = %entry.path().display(), "found secret");
        files.push(entry.into_path());
    }

    Ok(files)
}

fn is_git_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == GIT_DIR
}

/// `name.gpg` with a non-empty `name`.
fn is_secret_name(name: &OsStr) -> bool {
    let path = Path::new(name);
    path.extension() == Some(OsStr::new(SECRET_EXTENSION)) && path.file_stem().is_some()
}
