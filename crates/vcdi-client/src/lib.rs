//! # vcdi-client -- HTTP plumbing for the conformance harness
//!
//! Everything that talks to the outside world:
//! - **Endpoints** ([`endpoint`]): POST credentials to issuers and verifiers
//!   and record what they answer.
//! - **Registry** ([`implementations`]): implementations under test, in
//!   column order, with capability-tag filtering.
//! - **Configuration** ([`config`]): the runner document and its
//!   environment overrides.
//! - **Resolution** ([`loader`], [`resolver`]): pluggable document loading
//!   and verification method / controller dereferencing.
//!
//! ## Transport Policy
//!
//! All requests share one `reqwest::Client` carrying the configured
//! timeout. Connect failures and timeouts are retried with exponential
//! backoff; any HTTP response, whatever its status, is returned as evidence.
//! A transport failure that survives the retries is surfaced as an error
//! tagged with its [`TransportFault`], never swallowed.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod implementations;
pub mod loader;
pub mod resolver;
pub(crate) mod retry;

pub use config::{ConfigError, EndpointSettings, ImplementationConfig, RunnerConfig};
pub use endpoint::{Endpoint, HttpReply, IssuedCredential, VerifierOutcome};
pub use error::{IssuanceError, ResolutionError, VerificationError};
pub use implementations::{Implementation, Match, Registry, Role};
pub use loader::{DefaultDocumentLoader, DidKeyLoader, DocumentLoader, HttpDocumentLoader, StaticDocumentLoader};
pub use resolver::VerificationMethodResolver;
pub use retry::TransportFault;

use std::time::Duration;

/// Build the shared HTTP client.
///
/// # Errors
///
/// Returns the `reqwest` builder error if the TLS backend cannot be
/// initialised.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("vcdi/", env!("CARGO_PKG_VERSION")))
        .build()
}
