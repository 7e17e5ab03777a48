//! # Data Integrity Proofs
//!
//! A proof as it appears on an issued credential. Every member is optional
//! on the wire; rules decide which absences are violations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vcdi_core::Cryptosuite;

/// The only proof `type` the EdDSA cryptosuites define.
pub const DATA_INTEGRITY_PROOF: &str = "DataIntegrityProof";

/// A Data Integrity proof.
///
/// Members the harness does not inspect are preserved in `extra` so that a
/// credential can be forwarded to a verifier unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Proof type; must be `DataIntegrityProof`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,
    /// Cryptosuite identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cryptosuite: Option<String>,
    /// Multibase-encoded signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,
    /// Verification relationship the proof is made for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,
    /// Identifier of the key used, typically a DID URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Any other members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Proof {
    /// Whether `type` is exactly `DataIntegrityProof`.
    pub fn is_data_integrity(&self) -> bool {
        self.proof_type.as_deref() == Some(DATA_INTEGRITY_PROOF)
    }

    /// Whether the proof uses `suite` (exact match).
    pub fn uses(&self, suite: Cryptosuite) -> bool {
        suite.matches(self.cryptosuite.as_deref())
    }

    /// Whether the proof uses any suite in `allowed`.
    pub fn uses_any(&self, allowed: &[Cryptosuite]) -> bool {
        Cryptosuite::any_matches(allowed, self.cryptosuite.as_deref())
    }
}
