//! Index record.
//!
//! One entry per discovered secret. The list of these is serialized to JSON
//! and encrypted; it is the only way a client learns what exists.

use serde::{Deserialize, Serialize};

use super::SecretId;
use crate::core::normalize::normalize;

/// Metadata for one secret, as it appears in the encrypted index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexItem {
    pub domain: String,
    pub path: String,
    pub username: String,
    pub username_normalized: String,
}

impl IndexItem {
    /// Build a record, deriving `username_normalized`.
    pub fn new(
        domain: impl Into<String>,
        path: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            domain: domain.into(),
            path: path.into(),
            username_normalized: normalize(&username),
            username,
        }
    }

    /// Identifier used to look this secret up.
    pub fn id(&self) -> SecretId {
        SecretId::new(self.path.clone(), self.username.clone())
    }
}
