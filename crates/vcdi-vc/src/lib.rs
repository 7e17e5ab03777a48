//! # vcdi-vc: Credential Data Model and Fixtures
//!
//! Types for the artifacts the harness inspects:
//!
//! - **Credentials** ([`Credential`]) as returned by issuers under test.
//!   Parsing is lenient: members may be absent or carry unexpected values,
//!   because reporting those defects is the harness's job.
//! - **Proofs** ([`Proof`]) with every member optional.
//! - **Documents** ([`VerificationMethodDocument`], [`ControllerDocument`])
//!   produced by dereferencing a proof's `verificationMethod`.
//! - **Fixtures** ([`fixtures`]): deterministic base credentials handed out
//!   as fresh values per test case, never shared.

pub mod credential;
pub mod document;
pub mod fixtures;
pub mod proof;

pub use credential::{ContextValue, Credential, CredentialError, CredentialTypeValue, Issuer, ProofValue};
pub use document::{ControllerDocument, VerificationMethodDocument, MULTIKEY_TYPE};
pub use fixtures::{FixtureError, Fixtures, Template};
pub use proof::{Proof, DATA_INTEGRITY_PROOF};
