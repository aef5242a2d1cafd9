//! Encryption of the index.
//!
//! Secret files are already ciphertext and are only re-armored. The index is
//! the one thing this server encrypts, and it does so through the [`Cipher`]
//! trait so the cache can run against a fake in tests.
//!
//! ## Backends
//!
//! - **gpg**: Shells out to the `gpg` CLI with the store's `.gpg-id`
//!   recipients.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

mod gpg;
mod index;

pub use gpg::Gpg;
pub use index::{encrypt_index, serialize_index};

use crate::core::store::RecipientList;
use crate::core::types::Armored;
use crate::error::Result;

/// Public-key encryption to a list of recipients.
///
/// Implementations must be safe to share between threads; the cache calls
/// `encrypt` from whichever request thread wins the rebuild.
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext` for every recipient and return ASCII armor.
    ///
    /// Recipient order is passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails or does not finish in time.
    fn encrypt(&self, plaintext: &[u8], recipients: &RecipientList) -> Result<Armored>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
