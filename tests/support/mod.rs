//! Test support utilities for pass-server integration tests.
//!
//! Provides a throwaway password store and a fake cipher so the cache and
//! HTTP layer can be exercised without gpg.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pass_server::core::cache::SecretCache;
use pass_server::core::cipher::Cipher;
use pass_server::core::store::Store;
use tempfile::TempDir;

/// Test environment with an isolated store and home directory.
///
/// No process-global state is mutated; child processes get the store via
/// `PASSWORD_STORE` so tests can safely run in parallel.
pub struct Test {
    /// Password store root
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a store with no `.gpg-id` and no secrets.
    pub fn bare() -> Self {
        let dir = TempDir::new().expect("failed to create temp store");
        let home = TempDir::new().expect("failed to create temp home");
        Self { dir, home }
    }

    /// Create a store with the standard recipients and no secrets.
    pub fn new() -> Self {
        let t = Self::bare();
        t.gpg_id(RECIPIENTS);
        t
    }

    /// Create a store holding `secrets` (path relative to the root, contents).
    pub fn with_secrets(secrets: &[(&str, &[u8])]) -> Self {
        let t = Self::new();
        for (rel, contents) in secrets {
            t.secret(rel, contents);
        }
        t
    }

    /// Store root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `.gpg-id`.
    pub fn gpg_id(&self, contents: &str) {
        fs::write(self.root().join(".gpg-id"), contents).expect("failed to write .gpg-id");
    }

    /// Write a file below the store root, creating parent directories.
    pub fn secret(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create secret dir");
        }
        fs::write(&path, contents).expect("failed to write secret");
        path
    }

    /// Store handle for the root.
    pub fn store(&self) -> Store {
        Store::new(self.root())
    }

    /// Cache over this store using `cipher`.
    pub fn cache(&self, cipher: Arc<dyn Cipher>) -> SecretCache {
        SecretCache::new(self.store(), cipher)
    }
}
