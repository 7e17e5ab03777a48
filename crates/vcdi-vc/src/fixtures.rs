//! # Credential Fixtures
//!
//! Deterministic base credentials used as issuance input. Each call to
//! [`generate`] or [`Fixtures::clone`] returns a freshly allocated value, so
//! no two test cases ever share a mutable fixture. Fixtures carry no `id`
//! and no `issuer`; the runner injects both per case via
//! [`Credential::with_fresh_identity`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::credential::{
    ContextValue, Credential, CredentialTypeValue, ProofValue, VC_V1_CONTEXT,
    VERIFIABLE_CREDENTIAL_TYPE,
};

/// Fixed issuance timestamp for every fixture.
pub const FIXTURE_ISSUANCE_DATE: &str = "2024-01-01T00:00:00Z";

/// Fixed expiration timestamp for every fixture.
pub const FIXTURE_EXPIRATION_DATE: &str = "2099-01-01T00:00:00Z";

/// Placeholder credential subject identifier.
pub const FIXTURE_SUBJECT_ID: &str = "did:example:1234";

/// Fixture errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixtureError {
    /// No fixture registered under that name.
    #[error("unknown fixture: \"{0}\"")]
    UnknownFixture(String),

    /// The credential has no `proofValue` to tamper with.
    #[error("credential has no proofValue to tamper with")]
    NothingToTamper,
}

/// Named credential templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Minimal valid VC 1.1 credential.
    ValidVc,
}

impl Template {
    /// Every template.
    pub const ALL: [Template; 1] = [Self::ValidVc];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ValidVc => "validVc",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the credential for `template`.
pub fn generate(template: Template) -> Credential {
    match template {
        Template::ValidVc => Credential {
            context: ContextValue::Array(vec![json!(VC_V1_CONTEXT)]),
            id: None,
            credential_type: CredentialTypeValue::Array(vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string(),
            ]),
            issuer: None,
            credential_subject: json!({ "id": FIXTURE_SUBJECT_ID }),
            issuance_date: Some(json!(FIXTURE_ISSUANCE_DATE)),
            expiration_date: Some(json!(FIXTURE_EXPIRATION_DATE)),
            proof: ProofValue::default(),
            extra: Map::new(),
        },
    }
}

/// A named set of generated fixtures.
#[derive(Debug, Clone)]
pub struct Fixtures {
    credentials: BTreeMap<&'static str, Credential>,
}

impl Fixtures {
    /// Generate every template.
    pub fn generate() -> Self {
        let credentials = Template::ALL
            .into_iter()
            .map(|t| (t.name(), generate(t)))
            .collect();
        Self { credentials }
    }

    /// Deep copy of the fixture registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::UnknownFixture`] for unregistered names.
    pub fn clone(&self, name: &str) -> Result<Credential, FixtureError> {
        self.credentials
            .get(name)
            .cloned()
            .ok_or_else(|| FixtureError::UnknownFixture(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.credentials.keys().copied()
    }
}

/// Return a copy of the credential JSON whose first `proofValue` has one
/// base58 character replaced. Every other member is left exactly as
/// received, and the new value is still valid base58-btc, so a verifier can
/// only reject it on the signature itself.
///
/// # Errors
///
/// Returns [`FixtureError::NothingToTamper`] if the first proof has no
/// string `proofValue` or the value has no payload after the sigil.
pub fn tamper_proof_value(credential: &Value) -> Result<Value, FixtureError> {
    let mut tampered = credential.clone();
    let proof = match tampered.get_mut("proof") {
        Some(Value::Array(proofs)) => proofs.first_mut(),
        Some(proof) => Some(proof),
        None => None,
    };
    let value = proof
        .and_then(|p| p.get_mut("proofValue"))
        .ok_or(FixtureError::NothingToTamper)?;
    let original = value.as_str().ok_or(FixtureError::NothingToTamper)?;

    let mut chars: Vec<char> = original.chars().collect();
    let target = chars.get_mut(1).ok_or(FixtureError::NothingToTamper)?;
    *target = if *target == '2' { '3' } else { '2' };
    *value = Value::String(chars.into_iter().collect());

    Ok(tampered)
}
