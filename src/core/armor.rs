//! OpenPGP ASCII armor (RFC 4880 §6).
//!
//! Secret files hold binary ciphertext. They are wrapped in a
//! `PGP MESSAGE` armor block so they can travel inside JSON; nothing here ever
//! looks inside the ciphertext.
//!
//! The layout matches what Go's `openpgp/armor` writer emits, which existing
//! clients already parse:
//!
//! ```text
//! -----BEGIN PGP MESSAGE-----
//!
//! <base64, 64 columns>
//! =<crc24>
//! -----END PGP MESSAGE-----
//! ```
//!
//! There is no newline after the footer.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::core::constants::ARMOR_LABEL;
use crate::core::types::Armored;
use crate::error::{CipherError, Result};

const LINE_WIDTH: usize = 64;
const CRC24_INIT: u32 = 0x00B7_04CE;
const CRC24_POLY: u32 = 0x0186_4CFB;

/// Wrap raw ciphertext in a `PGP MESSAGE` armor block.
pub fn encode(raw: &[u8]) -> Armored {
    let body = STANDARD.encode(raw);
    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 64);

    out.push_str("-----BEGIN ");
    out.push_str(ARMOR_LABEL);
    out.push_str("-----\n\n");

    // base64 output is pure ASCII, so byte offsets are char boundaries
    let mut start = 0;
    while start < body.len() {
        let end = (start + LINE_WIDTH).min(body.len());
        if start > 0 {
            out.push('\n');
        }
        out.push_str(&body[start..end]);
        start = end;
    }

    out.push_str("\n=");
    out.push_str(&STANDARD.encode(&crc24(raw).to_be_bytes()[1..]));
    out.push_str("\n-----END ");
    out.push_str(ARMOR_LABEL);
    out.push_str("-----");
    out
}

/// Unwrap an armor block and verify its checksum.
///
/// Accepts any block label and optional `Key: value` headers. The checksum
/// line is optional, but when present it must match.
///
/// # Errors
///
/// Returns `CipherError::Armor` if the framing, base64 or checksum is wrong.
pub fn decode(armored: &str) -> Result<Vec<u8>> {
    let mut lines = armored.lines().map(str::trim_end);

    let label = lines
        .by_ref()
        .find_map(|line| {
            line.strip_prefix("-----BEGIN ")
                .and_then(|rest| rest.strip_suffix("-----"))
        })
        .ok_or_else(|| armor_error("missing BEGIN line"))?;

    let mut body = String::new();
    let mut checksum = None;
    let mut in_headers = true;
    let mut ended = false;

    for line in lines {
        if let Some(end) = line
            .strip_prefix("-----END ")
            .and_then(|rest| rest.strip_suffix("-----"))
        {
            if end != label {
                return Err(armor_error(&format!(
                    "END label {:?} does not match BEGIN label {:?}",
                    end, label
                )));
            }
            ended = true;
            break;
        }
        if in_headers {
            if line.is_empty() {
                in_headers = false;
                continue;
            }
            if line.contains(": ") {
                continue;
            }
            in_headers = false;
        }
        if let Some(crc) = line.strip_prefix('=') {
            checksum = Some(crc.to_string());
            continue;
        }
        body.push_str(line.trim());
    }

    if !ended {
        return Err(armor_error("missing END line"));
    }

    let data = STANDARD
        .decode(body.as_bytes())
        .map_err(|e| armor_error(&format!("bad base64: {}", e)))?;

    if let Some(crc) = checksum {
        let expected = STANDARD
            .decode(crc.as_bytes())
            .map_err(|e| armor_error(&format!("bad checksum encoding: {}", e)))?;
        if expected.as_slice() != &crc24(&data).to_be_bytes()[1..] {
            return Err(armor_error("checksum mismatch"));
        }
    }

    Ok(data)
}

/// CRC-24 as defined for OpenPGP armor.
fn crc24(data: &[u8]) -> u32 {
    let mut crc = CRC24_INIT;
    for &byte in data {
        crc ^= u32::from(byte) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}

fn armor_error(msg: &str) -> crate::error::Error {
    CipherError::Armor(msg.to_string()).into()
}
