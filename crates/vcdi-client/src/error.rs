//! Error types for issuance, verification and document resolution.

use serde_json::Value;
use vcdi_core::DecodeError;
use vcdi_vc::CredentialError;

use crate::retry::TransportFault;

/// Failure dereferencing a verification method or controller document.
///
/// Resolution failures describe the environment the harness runs in (a
/// loader, a network, a remote document), not a rule violation.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// No loader handles this kind of identifier.
    #[error("no document loader for {url}")]
    UnsupportedScheme { url: String },

    /// The loader has no document at this identifier.
    #[error("document not found: {url}")]
    NotFound { url: String },

    /// No HTTP response while fetching the document.
    #[error("fetching {url}: {fault}: {source}")]
    Transport {
        url: String,
        fault: TransportFault,
        source: reqwest::Error,
    },

    /// The document host answered with a non-2xx status.
    #[error("fetching {url} returned {status}")]
    Status { url: String, status: u16 },

    /// The document was fetched but has an unusable shape.
    #[error("malformed document at {url}: {reason}")]
    Malformed { url: String, reason: String },

    /// A multibase value inside the document did not decode.
    #[error("undecodable key material at {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },
}

impl ResolutionError {
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            fault: TransportFault::classify(&source),
            source,
        }
    }

    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure obtaining an issued credential.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    /// No HTTP response from the issuer.
    #[error("calling issuer {endpoint}: {fault}: {source}")]
    Transport {
        endpoint: String,
        fault: TransportFault,
        source: reqwest::Error,
    },

    /// The issuer answered with an error object.
    #[error("issuer {endpoint} returned {status}: {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: Value,
    },

    /// The issuer answered 2xx but the body is not a usable credential.
    #[error("issuer {endpoint} returned a malformed credential: {source}")]
    MalformedCredential {
        endpoint: String,
        #[source]
        source: CredentialError,
    },
}

impl IssuanceError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            fault: TransportFault::classify(&source),
            source,
        }
    }
}

/// Failure reaching a verifier.
///
/// A verifier that answers, even with 400, produces a
/// [`VerifierOutcome`](crate::endpoint::VerifierOutcome) rather than an
/// error; only transport failures end up here.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// No HTTP response from the verifier.
    #[error("calling verifier {endpoint}: {fault}: {source}")]
    Transport {
        endpoint: String,
        fault: TransportFault,
        source: reqwest::Error,
    },
}

impl VerificationError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            fault: TransportFault::classify(&source),
            source,
        }
    }

    /// Why no response arrived.
    pub fn fault(&self) -> TransportFault {
        match self {
            Self::Transport { fault, .. } => *fault,
        }
    }
}
