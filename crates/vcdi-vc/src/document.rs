//! # Verification Method and Controller Documents
//!
//! Documents obtained by dereferencing a proof's `verificationMethod` and
//! then that method's `controller`. They are fetched on demand and never
//! persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The verification method type the EdDSA cryptosuites require.
pub const MULTIKEY_TYPE: &str = "Multikey";

/// A dereferenced verification method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethodDocument {
    /// Method identifier (DID URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Method type; expected `Multikey`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,
    /// Identifier of the controller document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    /// Multibase, multicodec-prefixed public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,
    /// Any other members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerificationMethodDocument {
    /// Whether `type` is exactly `Multikey`.
    pub fn is_multikey(&self) -> bool {
        self.method_type.as_deref() == Some(MULTIKEY_TYPE)
    }
}

/// A controller document, kept as a raw JSON object.
///
/// Only own-property membership is ever queried: a proof purpose is bound
/// when the controller declares a member of that name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerDocument(Map<String, Value>);

impl ControllerDocument {
    /// Wrap a JSON value. Returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Document identifier.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Whether the document has an own member named `relationship`.
    pub fn declares(&self, relationship: &str) -> bool {
        self.0.contains_key(relationship)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multikey_type_is_exact() {
        let doc: VerificationMethodDocument = serde_json::from_value(json!({
            "id": "did:key:z6Mk#z6Mk",
            "type": "Multikey",
            "controller": "did:key:z6Mk",
            "publicKeyMultibase": "z6Mk"
        }))
        .unwrap();
        assert!(doc.is_multikey());
        assert_eq!(doc.controller.as_deref(), Some("did:key:z6Mk"));

        let other: VerificationMethodDocument =
            serde_json::from_value(json!({"type": "Ed25519VerificationKey2020"})).unwrap();
        assert!(!other.is_multikey());
    }

    #[test]
    fn controller_declares_own_members_only() {
        let doc = ControllerDocument::from_value(json!({
            "id": "did:key:z6Mk",
            "assertionMethod": ["did:key:z6Mk#z6Mk"]
        }))
        .unwrap();
        assert!(doc.declares("assertionMethod"));
        assert!(!doc.declares("authentication"));
        assert_eq!(doc.id(), Some("did:key:z6Mk"));
    }

    #[test]
    fn non_object_controller_is_rejected() {
        assert!(ControllerDocument::from_value(json!("did:key:z6Mk")).is_none());
    }
}
