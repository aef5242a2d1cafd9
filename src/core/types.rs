//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// ASCII-armored ciphertext, ready to put in a JSON response.
pub type Armored = String;

/// A gpg recipient as written in `.gpg-id` (key id, fingerprint or email).
pub type RecipientId = String;
