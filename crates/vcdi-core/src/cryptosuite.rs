//! # EdDSA Cryptosuites
//!
//! The two cryptosuite identifiers defined for EdDSA Data Integrity proofs.
//! Matching against a proof's `cryptosuite` member is an exact string
//! comparison, never a prefix or substring test.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An EdDSA cryptosuite identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cryptosuite {
    /// RDF Dataset Canonicalization + Ed25519.
    #[serde(rename = "eddsa-rdfc-2022")]
    EddsaRdfc2022,
    /// JSON Canonicalization Scheme + Ed25519.
    #[serde(rename = "eddsa-jcs-2022")]
    EddsaJcs2022,
}

impl Cryptosuite {
    /// Every supported cryptosuite, in a stable order.
    pub const ALL: [Cryptosuite; 2] = [Self::EddsaRdfc2022, Self::EddsaJcs2022];

    /// The wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EddsaRdfc2022 => "eddsa-rdfc-2022",
            Self::EddsaJcs2022 => "eddsa-jcs-2022",
        }
    }

    /// Exact comparison against a proof's `cryptosuite` member.
    pub fn matches(self, candidate: Option<&str>) -> bool {
        candidate == Some(self.as_str())
    }

    /// Whether `candidate` names any suite in `allowed`.
    pub fn any_matches(allowed: &[Cryptosuite], candidate: Option<&str>) -> bool {
        allowed.iter().any(|suite| suite.matches(candidate))
    }
}

impl fmt::Display for Cryptosuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cryptosuite {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|suite| suite.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCryptosuite(s.to_string()))
    }
}
