//! # Error Hierarchy
//!
//! Structured error types for the codec and identifier primitives, built
//! with `thiserror`. Higher layers (resolution, issuance, verification)
//! define their own enums and wrap these via `#[from]`.

use thiserror::Error;

/// Malformed multibase or multicodec input.
///
/// Every variant carries enough context to explain the failure in a matrix
/// cell without the original input at hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input string was empty.
    #[error("multibase value is empty")]
    Empty,

    /// The input does not start with the base58-btc sigil.
    #[error("missing base58-btc multibase prefix (z), found {found:?}")]
    MissingSigil {
        /// The first character of the input.
        found: char,
    },

    /// The payload contains a character outside the base58-btc alphabet.
    #[error("invalid base58-btc character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Character offset within the full multibase string.
        position: usize,
    },

    /// The base58 decoder rejected the payload.
    #[error("base58-btc decoding failed: {0}")]
    Base58(String),

    /// The byte sequence ended before the varint terminator.
    #[error("multicodec varint truncated after {consumed} bytes")]
    TruncatedVarint {
        /// Bytes read before running out of input.
        consumed: usize,
    },

    /// The varint is longer than the 9 bytes multiformats allows.
    #[error("multicodec varint exceeds 9 bytes")]
    VarintOverflow,
}

/// Validation errors for identifier newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Capability tag is empty or contains whitespace.
    #[error("invalid capability tag: \"{0}\" (expected a non-empty token without whitespace)")]
    InvalidTag(String),

    /// Implementation name is empty.
    #[error("invalid implementation name: \"{0}\" (expected a non-empty name)")]
    InvalidImplementationName(String),

    /// Cryptosuite identifier is not in the allow-list.
    #[error("unknown cryptosuite: \"{0}\" (expected eddsa-rdfc-2022 or eddsa-jcs-2022)")]
    UnknownCryptosuite(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sigil_message_names_the_prefix() {
        let err = DecodeError::MissingSigil { found: 'u' };
        let msg = err.to_string();
        assert!(msg.contains("base58-btc"));
        assert!(msg.contains("(z)"));
    }

    #[test]
    fn invalid_character_reports_position() {
        let err = DecodeError::InvalidCharacter {
            character: '0',
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid base58-btc character '0' at position 3"
        );
    }
}
