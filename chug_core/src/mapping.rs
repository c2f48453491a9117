//! The Mapper and Demapper transforms.
//!
//! `map` derives a key from a plaintext and a cover ciphertext; `morph`
//! reverses the per-byte transform using the start index embedded in the
//! key. Both are pure, single-pass, stateless transforms over caller-owned
//! buffers: all validation happens before any output allocation, and every
//! failure surfaces as a typed [`ChugError`] with no partial result.
//!
//! The per-byte arithmetic is modulo 256 with floor semantics. On `u8`
//! values wrapping subtraction and addition give exactly that: the
//! difference always lands in `[0, 255]` even when the plaintext byte is
//! smaller than the cover byte, so the additive inverse in `morph` holds
//! for every byte pair.

use log::debug;
use thiserror::Error;

use crate::key::{KEY_HEADER_BYTES, Key};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChugError {
    #[error("ciphertext ({ciphertext} bytes) is smaller than the plaintext ({plaintext} bytes)")]
    CiphertextTooSmall { plaintext: usize, ciphertext: usize },

    #[error(
        "start index {start_index} puts the {plaintext}-byte window outside the {ciphertext}-byte ciphertext"
    )]
    StartIndexInvalid {
        start_index: usize,
        plaintext: usize,
        ciphertext: usize,
    },

    #[error("invalid key: {reason}")]
    InvalidKey { reason: &'static str },
}

/// Derives the key that reconstructs `plaintext` from `ciphertext`.
///
/// The returned key is `plaintext.len() + 4` bytes: the start index as a
/// signed little-endian int32 followed by one difference byte per plaintext
/// byte, each `(plaintext[i] - ciphertext[start_index + i]) mod 256`.
///
/// # Errors
///
/// - [`ChugError::CiphertextTooSmall`] if the ciphertext is shorter than
///   the plaintext.
/// - [`ChugError::StartIndexInvalid`] if the mapped window does not fit in
///   the ciphertext, or the start index cannot round-trip through the
///   signed 32-bit key header.
pub fn map(plaintext: &[u8], ciphertext: &[u8], start_index: usize) -> Result<Key, ChugError> {
    let mut out = Vec::new();
    map_into(plaintext, ciphertext, start_index, &mut out)?;
    Ok(Key::from_raw(out))
}

/// Allocation-reusing variant of [`map`]: writes the raw key layout into `out`.
pub fn map_into(
    plaintext: &[u8],
    ciphertext: &[u8],
    start_index: usize,
    out: &mut Vec<u8>,
) -> Result<(), ChugError> {
    check_map_window(plaintext, ciphertext, start_index)?;
    debug!(
        "map plaintext_len={} ciphertext_len={} start_index={}",
        plaintext.len(),
        ciphertext.len(),
        start_index
    );
    out.clear();
    out.reserve(KEY_HEADER_BYTES + plaintext.len());
    out.extend_from_slice(&(start_index as i32).to_le_bytes());
    let window = &ciphertext[start_index..start_index + plaintext.len()];
    for (plain, cover) in plaintext.iter().zip(window) {
        out.push(plain.wrapping_sub(*cover));
    }
    Ok(())
}

/// Recovers the plaintext hidden in `ciphertext` using `key`.
///
/// Each output byte is `(ciphertext[start_index + i] + payload[i]) mod 256`,
/// the exact additive inverse of [`map`], so
/// `morph(c, &map(p, c, s)?)? == p` for all valid inputs.
///
/// # Errors
///
/// [`ChugError::InvalidKey`] if the embedded start index is negative or not
/// below the ciphertext length, the payload is longer than the ciphertext,
/// or the window the key describes overruns the ciphertext end.
pub fn morph(ciphertext: &[u8], key: &Key) -> Result<Vec<u8>, ChugError> {
    let mut out = Vec::new();
    morph_into(ciphertext, key, &mut out)?;
    Ok(out)
}

/// Allocation-reusing variant of [`morph`].
pub fn morph_into(ciphertext: &[u8], key: &Key, out: &mut Vec<u8>) -> Result<(), ChugError> {
    let start_index = check_key_window(ciphertext, key)?;
    debug!(
        "morph ciphertext_len={} payload_len={} start_index={}",
        ciphertext.len(),
        key.payload_len(),
        start_index
    );
    out.clear();
    out.reserve(key.payload_len());
    let window = &ciphertext[start_index..start_index + key.payload_len()];
    for (cover, diff) in window.iter().zip(key.payload()) {
        out.push(cover.wrapping_add(*diff));
    }
    Ok(())
}

/// [`morph`] over the raw key wire layout, for callers holding plain bytes.
pub fn morph_bytes(ciphertext: &[u8], key_bytes: &[u8]) -> Result<Vec<u8>, ChugError> {
    let key = Key::from_bytes(key_bytes.to_vec())?;
    morph(ciphertext, &key)
}

fn check_map_window(
    plaintext: &[u8],
    ciphertext: &[u8],
    start_index: usize,
) -> Result<(), ChugError> {
    if plaintext.len() > ciphertext.len() {
        return Err(ChugError::CiphertextTooSmall {
            plaintext: plaintext.len(),
            ciphertext: ciphertext.len(),
        });
    }
    // The start index must survive the signed 32-bit header round-trip and
    // leave room for the whole plaintext window.
    if start_index > i32::MAX as usize || ciphertext.len() - plaintext.len() < start_index {
        return Err(ChugError::StartIndexInvalid {
            start_index,
            plaintext: plaintext.len(),
            ciphertext: ciphertext.len(),
        });
    }
    Ok(())
}

fn check_key_window(ciphertext: &[u8], key: &Key) -> Result<usize, ChugError> {
    let raw = key.start_index();
    if raw < 0 {
        return Err(ChugError::InvalidKey {
            reason: "embedded start index is negative",
        });
    }
    let start_index = raw as usize;
    if start_index >= ciphertext.len() {
        return Err(ChugError::InvalidKey {
            reason: "embedded start index is outside the ciphertext",
        });
    }
    if key.payload_len() > ciphertext.len() {
        return Err(ChugError::InvalidKey {
            reason: "key payload is longer than the ciphertext",
        });
    }
    if ciphertext.len() - key.payload_len() < start_index {
        return Err(ChugError::InvalidKey {
            reason: "key window overruns the ciphertext end",
        });
    }
    Ok(start_index)
}
