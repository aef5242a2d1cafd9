//! Password store access.
//!
//! A store is a directory tree in the `pass` layout:
//!
//! ```text
//! <root>/
//! ├── .gpg-id                  # recipients, one per line
//! ├── .git/                    # ignored
//! ├── example.com/
//! │   └── alice.gpg            # path "example.com", username "alice"
//! └── work/
//!     └── example.com/
//!         └── bob.gpg          # path "work/example.com", username "bob"
//! ```
//!
//! Everything here is read-only. Secret files are never decrypted.

mod path;
mod recipients;
mod walk;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::domain::IndexItem;
use crate::error::{Error, Result, StoreError};

pub use path::decompose;
pub use recipients::RecipientList;

/// A password store rooted at a directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

/// A secret file found on disk, with its index record.
#[derive(Debug, Clone)]
pub struct SecretFile {
    pub file: PathBuf,
    pub item: IndexItem,
}

impl SecretFile {
    /// Raw ciphertext bytes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadSecret` if the file cannot be read.
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.file).map_err(|source| {
            StoreError::ReadSecret {
                path: self.file.clone(),
                source,
            }
            .into()
        })
    }
}

impl Store {
    /// Open a store at `root`. Nothing is read until asked.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the store and decompose every secret file.
    ///
    /// Order follows the directory traversal and is not sorted.
    ///
    /// # Errors
    ///
    /// Any traversal error aborts the whole walk. Files whose path is not
    /// valid UTF-8 cannot be addressed by clients and are skipped.
    pub fn discover(&self) -> Result<Vec<SecretFile>> {
        let files = walk::secret_files(&self.root)?;
        let mut secrets = Vec::with_capacity(files.len());
        for file in files {
            match decompose(&self.root, &file) {
                Ok(item) => secrets.push(SecretFile { file, item }),
                Err(Error::Store(StoreError::NonUtf8Path(path))) => {
                    warn!(path = %path.display(), "skipping secret with non UTF-8 path");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(root = %self.root.display(), secrets = secrets.len(), "store walked");
        Ok(secrets)
    }

    /// Load the recipients from `.gpg-id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Recipients` if the file cannot be read and
    /// `StoreError::NoRecipients` if it lists nobody.
    pub fn recipients(&self) -> Result<RecipientList> {
        RecipientList::load(&self.root)
    }
}
