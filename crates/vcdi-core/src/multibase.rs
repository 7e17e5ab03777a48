//! # Multibase (base58-btc)
//!
//! Only the base58-btc encoding (sigil `z`) is accepted. Any other multibase
//! encoding is a decode error, because the EdDSA cryptosuites forbid them
//! for both `publicKeyMultibase` and `proofValue`.

use multibase::Base;

use crate::error::DecodeError;

/// Multibase sigil for base58-btc.
pub const BASE58_BTC_SIGIL: char = 'z';

/// The bitcoin base58 alphabet (no `0`, `O`, `I`, `l`).
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Returns `true` if `c` belongs to the base58-btc alphabet.
pub fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

/// Returns `true` if the whole string is non-empty and made only of
/// base58-btc characters.
///
/// The sigil itself (`z`) is part of the alphabet, so a full multibase
/// string passes this check as-is.
pub fn is_base58(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_base58_char)
}

/// Decode a base58-btc multibase string into raw bytes.
///
/// A string consisting of the sigil alone decodes to zero bytes; rejecting
/// empty key material is the caller's policy, not the codec's.
///
/// # Errors
///
/// - [`DecodeError::Empty`] for an empty string.
/// - [`DecodeError::MissingSigil`] if the first character is not `z`.
/// - [`DecodeError::InvalidCharacter`] for any non-base58 character.
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let mut chars = s.chars();
    let first = chars.next().ok_or(DecodeError::Empty)?;
    if first != BASE58_BTC_SIGIL {
        return Err(DecodeError::MissingSigil { found: first });
    }

    let payload = chars.as_str();
    if let Some((offset, character)) = payload.char_indices().find(|(_, c)| !is_base58_char(*c)) {
        return Err(DecodeError::InvalidCharacter {
            character,
            position: offset + 1,
        });
    }
    if payload.is_empty() {
        return Ok(Vec::new());
    }

    Base::Base58Btc
        .decode(payload)
        .map_err(|e| DecodeError::Base58(e.to_string()))
}

/// Encode bytes as a base58-btc multibase string (`z` + base58).
pub fn encode(bytes: &[u8]) -> String {
    multibase::encode(Base::Base58Btc, bytes)
}
