//! Index serialization and encryption.

use tracing::debug;
use zeroize::Zeroizing;

use super::Cipher;
use crate::core::domain::IndexItem;
use crate::core::store::RecipientList;
use crate::core::types::Armored;
use crate::error::{CipherError, Result};

/// Serialize index records as a JSON array.
///
/// The buffer is wiped when dropped; it lists every secret name in the store.
pub fn serialize_index(items: &[IndexItem]) -> Result<Zeroizing<Vec<u8>>> {
    let json = serde_json::to_vec(items).map_err(CipherError::Serialize)?;
    Ok(Zeroizing::new(json))
}

/// Serialize `items` and encrypt them for `recipients`.
///
/// # Errors
///
/// Returns `CipherError` if serialization or encryption fails.
pub fn encrypt_index(
    cipher: &dyn Cipher,
    items: &[IndexItem],
    recipients: &RecipientList,
) -> Result<Armored> {
    let plaintext = serialize_index(items)?;

    debug!(
        cipher = cipher.name(),
        items = items.len(),
        recipients = recipients.len(),
        plaintext_len = plaintext.len(),
        "encrypting index"
    );

    cipher.encrypt(&plaintext, recipients)
}
