//! Secret path decomposition.
//!
//! Turns `<root>/work/example.com/alice.gpg` into
//! `domain = "example.com"`, `path = "work/example.com"`, `username = "alice"`.

use std::path::{Component, Path};

use crate::core::constants::SECRET_EXTENSION;
use crate::core::domain::IndexItem;
use crate::error::{Result, StoreError};

/// Decompose a secret file path into its index record.
///
/// # Errors
///
/// Returns `StoreError::OutsideStore` if `file` is not a `.gpg` file at least
/// one directory below `root`, and `StoreError::NonUtf8Path` if a component
/// cannot be represented as UTF-8.
pub fn decompose(root: &Path, file: &Path) -> Result<IndexItem> {
    let outside = || StoreError::OutsideStore {
        path: file.to_path_buf(),
        root: root.to_path_buf(),
    };

    let relative = file.strip_prefix(root).map_err(|_| outside())?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(
                part.to_str()
                    .ok_or_else(|| StoreError::NonUtf8Path(file.to_path_buf()))?,
            ),
            Component::CurDir => {}
            _ => return Err(outside().into()),
        }
    }

    let file_name = parts.pop().ok_or_else(outside)?;
    let username = file_name
        .strip_suffix(SECRET_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .ok_or_else(outside)?;
    let domain = *parts.last().ok_or_else(outside)?;

    Ok(IndexItem::new(domain, parts.join("/"), username))
}
