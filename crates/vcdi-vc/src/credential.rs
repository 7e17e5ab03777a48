//! # Verifiable Credential structure
//!
//! [`Credential`] follows the W3C VC Data Model 1.1 envelope. Unlike a
//! credential library, parsing here is lenient: the envelope members carry
//! defaults and unknown members are kept in `extra`, so that an issuer's
//! partially conformant output can still be inspected row by row.
//!
//! JSON polymorphism (`@context`, `type`, `issuer` and `proof` may each be a
//! single value or a collection) is handled at the serde level. Members whose
//! JSON type is wrong are kept as raw values rather than rejected; judging
//! them is the job of the shape checks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::proof::Proof;

/// The VC Data Model 1.1 base context.
pub const VC_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// The base credential type every credential must carry.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Errors turning issuer output into a [`Credential`].
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The value is not a JSON object.
    #[error("credential is not a JSON object (found {found})")]
    NotAnObject {
        /// JSON type name of the value received.
        found: &'static str,
    },

    /// The object has members of the wrong shape.
    #[error("malformed credential: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A Verifiable Credential as produced by fixtures or returned by issuers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// JSON-LD context.
    #[serde(rename = "@context", default, skip_serializing_if = "ContextValue::is_empty")]
    pub context: ContextValue,

    /// Credential identifier, injected per test case. A string when well
    /// formed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Credential type(s).
    #[serde(rename = "type", default, skip_serializing_if = "CredentialTypeValue::is_empty")]
    pub credential_type: CredentialTypeValue,

    /// Issuer identifier, injected per test case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,

    /// Claims about the subject.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub credential_subject: Value,

    /// ISO-8601 issuance timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<Value>,

    /// ISO-8601 expiration timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Value>,

    /// Attached proofs.
    #[serde(default, skip_serializing_if = "ProofValue::is_empty")]
    pub proof: ProofValue,

    /// Any other members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// Parse issuer output.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotAnObject`] for non-object values and
    /// [`CredentialError::Malformed`] when a member has an unusable shape.
    pub fn from_value(value: Value) -> Result<Self, CredentialError> {
        if !value.is_object() {
            return Err(CredentialError::NotAnObject {
                found: json_type_name(&value),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize back to JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; cannot occur for well-formed values.
    pub fn to_value(&self) -> Result<Value, CredentialError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Return a copy carrying a fresh `urn:uuid:` identifier and the given
    /// issuer. Every call yields a distinct identifier.
    pub fn with_fresh_identity(&self, issuer: &str) -> Self {
        let mut credential = self.clone();
        credential.id = Some(Value::String(format!("urn:uuid:{}", Uuid::new_v4())));
        credential.issuer = Some(Issuer::Id(issuer.to_string()));
        credential
    }

    /// All proofs, single or many, as a list.
    pub fn proofs(&self) -> Vec<&Proof> {
        self.proof.as_list()
    }

    /// The `verificationMethod` of each proof that declares one.
    pub fn verification_methods(&self) -> Vec<&str> {
        self.proofs()
            .into_iter()
            .filter_map(|p| p.verification_method.as_deref())
            .collect()
    }

    /// Issuer identifier, whichever form the issuer member takes.
    pub fn issuer_id(&self) -> Option<&str> {
        self.issuer.as_ref().and_then(Issuer::id)
    }

    /// Credential identifier when it is a string.
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }
}

/// JSON-LD `@context` value: either a single string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Single context URI string.
    Single(String),
    /// Array of context URI strings or objects.
    Array(Vec<Value>),
    /// Any other JSON value.
    Other(Value),
}

impl Default for ContextValue {
    fn default() -> Self {
        Self::Array(Vec::new())
    }
}

impl ContextValue {
    /// Whether the context includes `uri` as a string entry.
    pub fn includes(&self, uri: &str) -> bool {
        match self {
            Self::Single(s) => s == uri,
            Self::Array(entries) => entries.iter().any(|v| v.as_str() == Some(uri)),
            Self::Other(_) => false,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Array(entries) if entries.is_empty())
    }
}

/// Credential `type` value: either a single string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialTypeValue {
    /// Single type string.
    Single(String),
    /// Array of type strings.
    Array(Vec<String>),
    /// Any other JSON value.
    Other(Value),
}

impl Default for CredentialTypeValue {
    fn default() -> Self {
        Self::Array(Vec::new())
    }
}

impl CredentialTypeValue {
    /// Check whether `"VerifiableCredential"` is included in the type.
    pub fn contains_vc_type(&self) -> bool {
        match self {
            Self::Single(s) => s == VERIFIABLE_CREDENTIAL_TYPE,
            Self::Array(arr) => arr.iter().any(|s| s == VERIFIABLE_CREDENTIAL_TYPE),
            Self::Other(_) => false,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Array(arr) if arr.is_empty())
    }
}

/// Credential `issuer`: a bare identifier or an object with an `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Issuer {
    /// Bare identifier.
    Id(String),
    /// Object form.
    Object {
        /// Issuer identifier.
        id: String,
        /// Other members (name, image, ...).
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Any other JSON value.
    Other(Value),
}

impl Issuer {
    /// The issuer identifier, if the member carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) | Self::Object { id, .. } => Some(id),
            Self::Other(_) => None,
        }
    }
}

/// Proof member: a single proof or an array of proofs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProofValue {
    /// A single proof object.
    Single(Box<Proof>),
    /// An array of proof objects.
    Array(Vec<Proof>),
}

impl Default for ProofValue {
    fn default() -> Self {
        Self::Array(Vec::new())
    }
}

impl ProofValue {
    /// Returns `true` if there are no proofs.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Array(arr) => arr.is_empty(),
        }
    }

    /// Normalize to a list of proof references.
    pub fn as_list(&self) -> Vec<&Proof> {
        match self {
            Self::Single(p) => vec![p.as_ref()],
            Self::Array(arr) => arr.iter().collect(),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
