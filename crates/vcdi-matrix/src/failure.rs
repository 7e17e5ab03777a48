//! # Cell Failures
//!
//! [`AssertionFailure`] is the normal outcome for a nonconforming
//! implementation, not a crash. Each failure carries a [`FailureKind`], and
//! each kind maps to a [`FailureClass`] so reports can tell implementation
//! defects apart from problems in the test environment.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vcdi_client::{IssuanceError, ResolutionError, TransportFault, VerificationError};
use vcdi_core::DecodeError;

use crate::bundle::Evidence;

/// Who is at fault for a failed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// The implementation under test produced nonconforming output.
    Implementation,
    /// The network, a document host or the harness setup failed.
    Environment,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implementation => write!(f, "implementation"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A rule predicate evaluated false.
    Assertion,
    /// A multibase or multicodec value in the output did not decode.
    Decode,
    /// The issuer answered with an error object.
    IssuerRejected,
    /// The issuer answered 2xx with something that is not a credential.
    MalformedCredential,
    /// A document loader failed or returned an unusable document.
    Resolution,
    /// An HTTP request got no response after retries.
    Transport,
    /// An HTTP request timed out on every attempt.
    Timeout,
    /// The harness could not set up the case.
    Configuration,
    /// Evidence the rule needs was never collected.
    MissingEvidence,
}

impl FailureKind {
    /// The class this kind of failure is reported under.
    pub fn class(self) -> FailureClass {
        match self {
            Self::Assertion | Self::Decode | Self::IssuerRejected | Self::MalformedCredential => {
                FailureClass::Implementation
            }
            Self::Resolution
            | Self::Transport
            | Self::Timeout
            | Self::Configuration
            | Self::MissingEvidence => {
                FailureClass::Environment
            }
        }
    }
}

/// A failed cell: kind plus a human-readable reason.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{reason}")]
pub struct AssertionFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl AssertionFailure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    /// A rule predicate that evaluated false.
    pub fn assertion(reason: impl Into<String>) -> Self {
        Self::new(FailureKind::Assertion, reason)
    }

    /// A decode failure, prefixed with what was being decoded.
    pub fn decode(context: &str, error: &DecodeError) -> Self {
        Self::new(FailureKind::Decode, format!("{context} ({error})"))
    }

    /// Evidence of `kind` was not gathered for this bundle.
    pub fn missing(evidence: Evidence) -> Self {
        Self::new(
            FailureKind::MissingEvidence,
            format!("{evidence} evidence was not collected"),
        )
    }

    pub fn class(&self) -> FailureClass {
        self.kind.class()
    }
}

fn transport_kind(fault: TransportFault) -> FailureKind {
    match fault {
        TransportFault::Timeout => FailureKind::Timeout,
        TransportFault::Connect | TransportFault::Body | TransportFault::Other => FailureKind::Transport,
    }
}

impl From<&IssuanceError> for AssertionFailure {
    fn from(e: &IssuanceError) -> Self {
        let kind = match e {
            IssuanceError::Transport { fault, .. } => transport_kind(*fault),
            IssuanceError::Rejected { .. } => FailureKind::IssuerRejected,
            IssuanceError::MalformedCredential { .. } => FailureKind::MalformedCredential,
        };
        Self::new(kind, format!("Expected issuer to have issued a credential: {e}"))
    }
}

impl From<&ResolutionError> for AssertionFailure {
    fn from(e: &ResolutionError) -> Self {
        let kind = match e {
            ResolutionError::Decode { .. } => FailureKind::Decode,
            ResolutionError::Transport {
                fault: TransportFault::Timeout,
                ..
            } => FailureKind::Timeout,
            _ => FailureKind::Resolution,
        };
        Self::new(kind, format!("Failed to resolve document: {e}"))
    }
}

impl From<&VerificationError> for AssertionFailure {
    fn from(e: &VerificationError) -> Self {
        Self::new(transport_kind(e.fault()), format!("Failed to reach verifier: {e}"))
    }
}
