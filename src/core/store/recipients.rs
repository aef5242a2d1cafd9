//! `.gpg-id` loading.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::constants::GPG_ID_FILE;
use crate::core::types::RecipientId;
use crate::error::{Result, StoreError};

/// Ordered recipients from `.gpg-id`.
///
/// Order is preserved exactly as written and duplicates are kept; gpg may
/// treat the first recipient differently from the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientList(Vec<RecipientId>);

impl RecipientList {
    /// Parse file contents: one recipient per line, blank lines skipped.
    pub fn parse(contents: &str) -> Self {
        Self(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Read `<root>/.gpg-id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Recipients` on any read failure and
    /// `StoreError::NoRecipients` if the file holds no recipients.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(GPG_ID_FILE);
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Recipients {
            path: path.clone(),
            source,
        })?;

        let recipients = Self::parse(&contents);
        if recipients.is_empty() {
            return Err(StoreError::NoRecipients(path).into());
        }

        debug!(recipients = recipients.len(), "recipients loaded");
        Ok(recipients)
    }

    /// Recipients in file order.
    pub fn as_slice(&self) -> &[RecipientId] {
        &self.0
    }

    /// Number of recipients.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no recipients are listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RecipientId>> for RecipientList {
    fn from(recipients: Vec<RecipientId>) -> Self {
        Self(recipients)
    }
}
