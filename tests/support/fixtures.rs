//! Test fixtures and a fake cipher.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use pass_server::core::armor;
use pass_server::core::cipher::Cipher;
use pass_server::core::domain::IndexItem;
use pass_server::core::store::RecipientList;
use pass_server::core::types::Armored;
use pass_server::error::{CipherError, Result};

/// Recipients written to every standard test store.
pub const RECIPIENTS: &str = "alice@example.com\nbob@example.com\n";

/// Secret files used across multiple tests. Contents stand in for binary
/// OpenPGP packets.
pub const STANDARD_SECRETS: &[(&str, &[u8])] = &[
    ("example.com/alice.gpg", b"\x85\x01\x0calice-ciphertext"),
    ("example.com/bob.gpg", b"\x85\x01\x0cbob-ciphertext"),
    ("work/github.com/carol.gpg", b"\x85\x01\x0ccarol-ciphertext"),
    ("mail/Ångström.gpg", b"\x85\x01\x0cangstrom-ciphertext"),
];

/// A cipher that armors the plaintext instead of encrypting it.
///
/// Counts calls, and can be told to fail or to stall so concurrent callers
/// pile up behind one rebuild.
#[derive(Debug, Default)]
pub struct FakeCipher {
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl FakeCipher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every `encrypt` call.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make subsequent calls fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `encrypt` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Cipher for FakeCipher {
    fn encrypt(&self, plaintext: &[u8], recipients: &RecipientList) -> Result<Armored> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CipherError::Failed {
                status: "exit status: 2".to_string(),
                stderr: "gpg: public key not found".to_string(),
            }
            .into());
        }
        if recipients.is_empty() {
            return Err(CipherError::NoRecipients.into());
        }
        Ok(armor::encode(plaintext))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Recover the index records from what [`FakeCipher`] produced.
pub fn decode_index(armored: &str) -> Vec<IndexItem> {
    let json = armor::decode(armored).expect("index is not valid armor");
    serde_json::from_slice(&json).expect("index is not a JSON array of records")
}
