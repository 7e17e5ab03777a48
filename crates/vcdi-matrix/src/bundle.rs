//! # Evidence Bundles
//!
//! Everything gathered for one matrix column: the issued credential, the
//! verification methods and controllers its proofs point at, and what the
//! verifier said about it. Rules read a bundle; they never perform I/O.
//!
//! Each piece of evidence is a `Result`: a failure to gather it is recorded
//! once here and reported by every rule that needs it.

use std::fmt;

use serde::{Deserialize, Serialize};

use vcdi_client::{IssuedCredential, VerifierOutcome};
use vcdi_vc::{ControllerDocument, Proof, VerificationMethodDocument};

use crate::failure::AssertionFailure;

/// Kinds of evidence a rule may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// The credential returned by the issuer.
    Issued,
    /// Documents for each proof's `verificationMethod`.
    VerificationMethods,
    /// Controller documents of those verification methods.
    Controllers,
    /// The verifier's answer for the issued credential.
    Verification,
    /// The verifier's answer for a copy with an altered `proofValue`.
    TamperedVerification,
}

impl Evidence {
    /// Whether gathering this evidence needs a verifier endpoint.
    pub fn needs_verifier(self) -> bool {
        matches!(self, Self::Verification | Self::TamperedVerification)
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Issued => "issued credential",
            Self::VerificationMethods => "verification method",
            Self::Controllers => "controller document",
            Self::Verification => "verification",
            Self::TamperedVerification => "tampered verification",
        };
        f.write_str(name)
    }
}

/// A verification method together with the identifier it was resolved
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMethod {
    pub id: String,
    pub document: VerificationMethodDocument,
}

/// Evidence gathered for one implementation column.
#[derive(Debug, Clone)]
pub struct EvidenceBundle {
    pub implementation: String,
    pub issued: Result<IssuedCredential, AssertionFailure>,
    /// One entry per proof that names a `verificationMethod`, in proof order.
    pub verification_methods: Result<Vec<ResolvedMethod>, AssertionFailure>,
    /// One entry per resolved verification method, in the same order.
    pub controllers: Result<Vec<ControllerDocument>, AssertionFailure>,
    pub verification: Result<VerifierOutcome, AssertionFailure>,
    pub tampered_verification: Result<VerifierOutcome, AssertionFailure>,
}

impl EvidenceBundle {
    /// A bundle with only the issuance result; everything else is marked
    /// as not collected.
    pub fn new(implementation: impl Into<String>, issued: Result<IssuedCredential, AssertionFailure>) -> Self {
        Self {
            implementation: implementation.into(),
            issued,
            verification_methods: Err(AssertionFailure::missing(Evidence::VerificationMethods)),
            controllers: Err(AssertionFailure::missing(Evidence::Controllers)),
            verification: Err(AssertionFailure::missing(Evidence::Verification)),
            tampered_verification: Err(AssertionFailure::missing(Evidence::TamperedVerification)),
        }
    }

    /// A bundle where nothing could be gathered; every accessor reports
    /// `failure`.
    pub fn failed(implementation: impl Into<String>, failure: AssertionFailure) -> Self {
        Self {
            implementation: implementation.into(),
            issued: Err(failure.clone()),
            verification_methods: Err(failure.clone()),
            controllers: Err(failure.clone()),
            verification: Err(failure.clone()),
            tampered_verification: Err(failure),
        }
    }

    pub fn with_verification_methods(mut self, methods: Vec<ResolvedMethod>) -> Self {
        self.verification_methods = Ok(methods);
        self
    }

    pub fn with_controllers(mut self, controllers: Vec<ControllerDocument>) -> Self {
        self.controllers = Ok(controllers);
        self
    }

    pub fn with_verification(mut self, outcome: VerifierOutcome) -> Self {
        self.verification = Ok(outcome);
        self
    }

    pub fn with_tampered_verification(mut self, outcome: VerifierOutcome) -> Self {
        self.tampered_verification = Ok(outcome);
        self
    }

    pub fn issued(&self) -> Result<&IssuedCredential, AssertionFailure> {
        self.issued.as_ref().map_err(Clone::clone)
    }

    /// Proofs on the issued credential.
    pub fn proofs(&self) -> Result<Vec<&Proof>, AssertionFailure> {
        Ok(self.issued()?.credential.proofs())
    }

    pub fn verification_methods(&self) -> Result<&[ResolvedMethod], AssertionFailure> {
        self.verification_methods
            .as_deref()
            .map_err(Clone::clone)
    }

    /// The resolved method for identifier `id`, if it was resolved.
    pub fn method_for(&self, id: &str) -> Option<&ResolvedMethod> {
        self.verification_methods
            .as_ref()
            .ok()?
            .iter()
            .find(|m| m.id == id)
    }

    pub fn controllers(&self) -> Result<&[ControllerDocument], AssertionFailure> {
        self.controllers.as_deref().map_err(Clone::clone)
    }

    pub fn verification(&self) -> Result<&VerifierOutcome, AssertionFailure> {
        self.verification.as_ref().map_err(Clone::clone)
    }

    pub fn tampered_verification(&self) -> Result<&VerifierOutcome, AssertionFailure> {
        self.tampered_verification.as_ref().map_err(Clone::clone)
    }
}
