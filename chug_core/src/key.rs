//! The serialized key artifact and its bit-exact layout.
//!
//! A key is `[4 bytes: start index as signed little-endian int32]` followed
//! by one difference byte per plaintext byte. Any implementation must
//! reproduce this layout byte-for-byte to interoperate with keys produced
//! elsewhere.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::mapping::ChugError;

/// Number of bytes reserved at the front of every key for the start index.
pub const KEY_HEADER_BYTES: usize = 4;

/// A Chug key: the start index header plus the per-byte difference payload.
///
/// Construction through [`Key::from_bytes`] guarantees the buffer is long
/// enough to contain the header, so accessors never fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    bytes: Vec<u8>,
}

impl Key {
    /// Wraps raw key bytes, rejecting buffers too short to hold the header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ChugError> {
        if bytes.len() < KEY_HEADER_BYTES {
            return Err(ChugError::InvalidKey {
                reason: "key is shorter than the 4-byte start index header",
            });
        }
        Ok(Self { bytes })
    }

    /// Wraps bytes produced internally by `map`, which always include the header.
    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.len() >= KEY_HEADER_BYTES);
        Self { bytes }
    }

    /// Raw key bytes in the interoperable wire layout.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the key, returning the raw wire layout.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Start index decoded from the header as a signed little-endian int32.
    pub fn start_index(&self) -> i32 {
        let mut header = [0u8; KEY_HEADER_BYTES];
        header.copy_from_slice(&self.bytes[..KEY_HEADER_BYTES]);
        i32::from_le_bytes(header)
    }

    /// The difference bytes, one per plaintext byte.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[KEY_HEADER_BYTES..]
    }

    /// Number of plaintext bytes this key reconstructs.
    pub fn payload_len(&self) -> usize {
        self.bytes.len() - KEY_HEADER_BYTES
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.bytes)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Key::from_bytes(bytes).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_rejects_short_buffers() {
        for len in 0..KEY_HEADER_BYTES {
            let err = Key::from_bytes(vec![0u8; len]).unwrap_err();
            assert!(matches!(err, ChugError::InvalidKey { .. }));
        }
        assert!(Key::from_bytes(vec![0u8; KEY_HEADER_BYTES]).is_ok());
    }

    #[test]
    fn start_index_decodes_little_endian() {
        let key = Key::from_bytes(vec![0x07, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(key.start_index(), 7);

        let key = Key::from_bytes(vec![0x00, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(key.start_index(), 256);

        let key = Key::from_bytes(vec![0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(key.start_index(), -1);
    }

    #[test]
    fn payload_exposes_difference_bytes() {
        let key = Key::from_bytes(vec![0, 0, 0, 0, 10, 20, 30]).unwrap();
        assert_eq!(key.payload(), &[10, 20, 30]);
        assert_eq!(key.payload_len(), 3);
        assert_eq!(key.as_bytes().len(), 7);
    }

    #[test]
    fn serde_roundtrip_preserves_layout() {
        let key = Key::from_bytes(vec![2, 0, 0, 0, 0xAB, 0xCD]).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert_eq!(back.as_bytes(), key.as_bytes());
    }

    #[test]
    fn serde_rejects_short_key() {
        let err = serde_json::from_str::<Key>("[0,0,0]").unwrap_err();
        assert!(err.to_string().contains("invalid key"));
    }
}
