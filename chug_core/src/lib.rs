//! Core types and primitives for the Chug reversible byte-mapping scheme.
//!
//! Chug derives a per-message key from a plaintext and a cover ciphertext
//! such that the key plus the ciphertext reconstruct the plaintext. The only
//! requirement is that the ciphertext be at least as long as the plaintext.
//! The scheme superficially resembles a one-time pad but differs in the
//! arithmetic and in how the key is used; it is **not** a secure cipher and
//! should not be relied on for confidentiality.

pub mod key;
pub mod mapping;

pub use crate::key::{KEY_HEADER_BYTES, Key};
pub use crate::mapping::{ChugError, map, map_into, morph, morph_bytes, morph_into};
