//! Snapshot type.
//!
//! The result of one complete rebuild: the encrypted index plus every armored
//! secret it lists. Built off to the side and installed whole.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::SecretId;
use crate::core::types::Armored;

/// An immutable, internally consistent view of the store.
#[derive(Debug, Clone)]
pub struct Snapshot {
    index: Armored,
    secrets: HashMap<SecretId, Armored>,
    built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Assemble a snapshot from a finished rebuild.
    pub fn new(index: Armored, secrets: HashMap<SecretId, Armored>) -> Self {
        Self {
            index,
            secrets,
            built_at: Utc::now(),
        }
    }

    /// Armored, encrypted index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Armored ciphertext for one secret.
    pub fn get(&self, id: &SecretId) -> Option<&str> {
        self.secrets.get(id).map(String::as_str)
    }

    /// Whether the snapshot holds `id`.
    pub fn contains(&self, id: &SecretId) -> bool {
        self.secrets.contains_key(id)
    }

    /// Identifiers held by this snapshot, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &SecretId> {
        self.secrets.keys()
    }

    /// Number of secrets.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// True if the store held no secrets.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// When this snapshot was assembled.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}
