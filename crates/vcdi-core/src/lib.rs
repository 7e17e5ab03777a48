//! # vcdi-core: Foundational Types for the Conformance Harness
//!
//! Leaf crate of the `vcdi` workspace. Every other crate depends on it; it
//! depends on nothing internal.
//!
//! - **Codec** ([`multibase`], [`multicodec`]): base58-btc multibase decoding
//!   and varint multicodec prefix stripping used to recover raw key and
//!   signature bytes from issuer output.
//! - **Identifiers** ([`identity`]): validated newtypes for implementation
//!   names and capability tags, plus the [`TagSet`] used for matrix filtering.
//! - **Cryptosuites** ([`cryptosuite`]): the EdDSA cryptosuite allow-list.
//! - **Errors** ([`error`]): `thiserror` hierarchy shared across the workspace.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.
//! - The codec is policy-agnostic: it reports what the bytes are, callers
//!   decide whether a length is acceptable.

pub mod cryptosuite;
pub mod error;
pub mod identity;
pub mod multibase;
pub mod multicodec;

pub use cryptosuite::Cryptosuite;
pub use error::{DecodeError, ValidationError};
pub use identity::{CapabilityTag, ImplementationName, TagSet};
pub use multicodec::KeyMaterial;
