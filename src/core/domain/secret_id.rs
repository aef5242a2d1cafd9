//! Secret identifier.
//!
//! The key clients use to ask for one secret: the directory path below the
//! store root plus the file stem.

use serde::{Deserialize, Serialize};

/// Unique key into a snapshot's secret table.
///
/// `path` is slash-joined with no leading or trailing slash; `username` is the
/// file name without `.gpg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecretId {
    pub path: String,
    pub username: String,
}

impl SecretId {
    /// Create an identifier from its two parts.
    pub fn new(path: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            username: username.into(),
        }
    }
}

impl std::fmt::Display for SecretId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.path, self.username)
    }
}
