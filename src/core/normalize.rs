//! Username folding for loose matching.
//!
//! Clients search the index by `username_normalized`, so "Ångström" and
//! "Angstrom" land on the same key.

use unicode_normalization::UnicodeNormalization;

/// Fold a username to its ASCII skeleton.
///
/// Applies NFKD and keeps only the code points below 0x80, so a letter with a
/// diacritic decomposes into the base letter plus a combining mark and the
/// mark is dropped. Characters with no ASCII decomposition vanish entirely.
pub fn normalize(username: &str) -> String {
    username.nfkd().filter(char::is_ascii).collect()
}
