//! # Multicodec Prefixes
//!
//! A multicodec-prefixed key is `varint(codec) || key bytes`. The varint is
//! unsigned LEB128: little-endian groups of 7 bits, high bit set on every
//! byte except the last. The prefix length is read from the terminator,
//! never assumed (Ed25519 happens to use two bytes, `0xed 0x01`).

use crate::error::DecodeError;
use crate::multibase;

/// Multicodec code for an Ed25519 public key.
pub const ED25519_PUB: u64 = 0xed;

/// Multicodec code for an Ed448 public key.
pub const ED448_PUB: u64 = 0x1203;

/// Raw Ed25519 public key length.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

/// Raw Ed448 public key length.
pub const ED448_PUBLIC_KEY_LENGTH: usize = 57;

/// Maximum varint length permitted by the multiformats unsigned-varint spec.
pub const MAX_VARINT_BYTES: usize = 9;

/// Read an unsigned varint from the front of `bytes`.
///
/// Returns the decoded value and the number of bytes consumed.
///
/// # Errors
///
/// - [`DecodeError::TruncatedVarint`] if no terminating byte is found.
/// - [`DecodeError::VarintOverflow`] if the varint is longer than 9 bytes.
pub fn read_varint(bytes: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        if i >= MAX_VARINT_BYTES {
            return Err(DecodeError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(DecodeError::TruncatedVarint {
        consumed: bytes.len(),
    })
}

/// Encode `value` as an unsigned varint.
pub fn encode_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(2);
    loop {
        let group = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(group);
            return out;
        }
        out.push(group | 0x80);
    }
}

/// Prepend the varint for `codec` to `bytes`.
pub fn prefix(codec: u64, bytes: &[u8]) -> Vec<u8> {
    let mut out = encode_varint(codec);
    out.extend_from_slice(bytes);
    out
}

/// Split a multicodec-prefixed byte sequence into its codec tag and payload.
///
/// # Errors
///
/// Propagates [`read_varint`] errors. An empty payload after a valid prefix
/// is returned as-is.
pub fn strip_multicodec_prefix(bytes: &[u8]) -> Result<(u64, &[u8]), DecodeError> {
    let (codec, consumed) = read_varint(bytes)?;
    Ok((codec, &bytes[consumed..]))
}

/// Human-readable multicodec name for the codes this harness understands.
pub fn codec_name(codec: u64) -> Option<&'static str> {
    match codec {
        ED25519_PUB => Some("ed25519-pub"),
        ED448_PUB => Some("ed448-pub"),
        _ => None,
    }
}

/// Raw key material recovered from a multicodec-prefixed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// The multicodec tag read from the prefix.
    pub codec: u64,
    /// Key bytes following the prefix.
    pub bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Strip the multicodec prefix from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the prefix varint is malformed.
    pub fn from_prefixed(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (codec, rest) = strip_multicodec_prefix(bytes)?;
        Ok(Self {
            codec,
            bytes: rest.to_vec(),
        })
    }

    /// Decode a multibase `publicKeyMultibase` value and strip its prefix.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for malformed multibase or varint input.
    pub fn from_multibase(s: &str) -> Result<Self, DecodeError> {
        let decoded = multibase::decode(s)?;
        Self::from_prefixed(&decoded)
    }

    /// Number of raw key bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key material is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Multicodec name, if known.
    pub fn codec_name(&self) -> Option<&'static str> {
        codec_name(self.codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_prefix_is_two_bytes() {
        assert_eq!(encode_varint(ED25519_PUB), vec![0xed, 0x01]);
        assert_eq!(read_varint(&[0xed, 0x01, 0xff]).unwrap(), (ED25519_PUB, 2));
    }

    #[test]
    fn ed448_prefix_is_two_bytes() {
        assert_eq!(encode_varint(ED448_PUB), vec![0x83, 0x24]);
    }

    #[test]
    fn single_byte_varint() {
        assert_eq!(read_varint(&[0x12, 0x20]).unwrap(), (0x12, 1));
    }

    #[test]
    fn truncated_varint_is_rejected() {
        assert_eq!(
            read_varint(&[0xed]),
            Err(DecodeError::TruncatedVarint { consumed: 1 })
        );
        assert_eq!(
            read_varint(&[]),
            Err(DecodeError::TruncatedVarint { consumed: 0 })
        );
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let bytes = [0xff; 12];
        assert_eq!(read_varint(&bytes), Err(DecodeError::VarintOverflow));
    }

    #[test]
    fn strip_consumes_only_the_prefix() {
        let key = [7u8; ED25519_PUBLIC_KEY_LENGTH];
        let prefixed = prefix(ED25519_PUB, &key);
        assert_eq!(prefixed.len(), 34);
        let (codec, rest) = strip_multicodec_prefix(&prefixed).unwrap();
        assert_eq!(codec, ED25519_PUB);
        assert_eq!(rest, &key);
    }

    #[test]
    fn strip_with_empty_payload_returns_empty_slice() {
        let (codec, rest) = strip_multicodec_prefix(&[0xed, 0x01]).unwrap();
        assert_eq!(codec, ED25519_PUB);
        assert!(rest.is_empty());
    }

    #[test]
    fn ed25519_multikey_starts_with_z6mk() {
        let encoded = multibase::encode(&prefix(ED25519_PUB, &[42u8; 32]));
        assert!(encoded.starts_with("z6Mk"), "got {encoded}");
        let material = KeyMaterial::from_multibase(&encoded).unwrap();
        assert_eq!(material.codec_name(), Some("ed25519-pub"));
        assert_eq!(material.len(), ED25519_PUBLIC_KEY_LENGTH);
    }

    #[test]
    fn well_known_did_key_value_decodes_to_34_bytes() {
        let value = "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK";
        let decoded = multibase::decode(value).unwrap();
        assert_eq!(decoded.len(), 34);
        let material = KeyMaterial::from_prefixed(&decoded).unwrap();
        assert_eq!(material.codec, ED25519_PUB);
        assert_eq!(material.len(), 32);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn varint_round_trip(value in 0u64..(1u64 << 63)) {
            let encoded = encode_varint(value);
            prop_assert!(encoded.len() <= MAX_VARINT_BYTES);
            prop_assert_eq!(read_varint(&encoded).unwrap(), (value, encoded.len()));
        }

        /// Every 34-byte multicodec Ed25519 encoding yields exactly 32 key bytes.
        #[test]
        fn ed25519_encoding_strips_to_32_bytes(key in prop::array::uniform32(any::<u8>())) {
            let prefixed = prefix(ED25519_PUB, &key);
            prop_assert_eq!(prefixed.len(), 34);
            let material = KeyMaterial::from_multibase(&multibase::encode(&prefixed)).unwrap();
            prop_assert_eq!(material.codec, ED25519_PUB);
            prop_assert_eq!(material.bytes, key.to_vec());
        }
    }
}
