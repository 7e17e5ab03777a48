//! # Assertion Rules
//!
//! Each [`Rule`] is a pure, synchronous predicate over an
//! [`EvidenceBundle`]. A rule declares the [`Evidence`] it needs so the
//! runner only gathers what the rule set uses; evaluation itself never
//! touches the network and never depends on another rule's outcome.
//!
//! Rules reach evidence through the bundle accessors, so a failure to
//! gather evidence (issuance, resolution, transport) surfaces as that
//! failure, with its own kind and reason, in every cell that needed it.
//!
//! ## Rule Sets
//!
//! | Constructor                           | Rows                                               |
//! |---------------------------------------|----------------------------------------------------|
//! | [`RuleSet::create`]                   | cryptosuite, method type, purpose, key, signature, verification |
//! | [`RuleSet::verification_methods`]     | Multikey encoding rows                             |
//! | [`RuleSet::proof_representations`]   | DataIntegrityProof rows                            |
//! | [`RuleSet::interop`]                  | credential shape, verifier accepts and rejects     |
//! | [`RuleSet::verifier`]                 | verifier accepts and rejects                       |

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use vcdi_core::multibase::{self, BASE58_BTC_SIGIL};
use vcdi_core::multicodec::{ED25519_PUBLIC_KEY_LENGTH, ED448_PUBLIC_KEY_LENGTH};
use vcdi_core::{Cryptosuite, KeyMaterial};
use vcdi_vc::credential::VC_V1_CONTEXT;
use vcdi_vc::{Proof, VerificationMethodDocument, DATA_INTEGRITY_PROOF};

use crate::bundle::{Evidence, EvidenceBundle, ResolvedMethod};
use crate::expectations::{verification_fail, verification_success};
use crate::failure::AssertionFailure;

/// Decoded length of an Ed25519 `publicKeyMultibase` (prefix + key).
pub const MULTIKEY_ED25519_LENGTH: usize = 34;

/// Signature length for a 32-byte public key.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// Signature length for a 57-byte public key.
pub const ED448_SIGNATURE_LENGTH: usize = 114;

const SECRET_KEYS_OUT_OF_SCOPE: &str = "Testing secret keys is out of scope.";

const MSG_NO_METHOD_DOCUMENTS: &str = "Expected at least one \"verificationMethodDocument\".";
const MSG_NO_MULTIKEY: &str = "Expected at least one proof to have \"type\" property value \"Multikey\".";
const MSG_NOT_MULTIBASE: &str =
    "Expected \"publicKeyMultibase\" value of the verification method to be multibase base58-btc encoded value";
const MSG_NO_PROOF_VALUE: &str = "Expected a proof value on the proof.";

// Clause links for the data model rows.
const LINK_PUBLIC_KEY_PREFIX: &str = "https://w3c.github.io/vc-di-eddsa/#:~:text=The%20publicKeyMultibase%20value%20of%20the%20verification%20method%20MUST%20start%20with%20the%20base%2D58%2Dbtc%20prefix%20(z)%2C%20as%20defined%20in%20the%20Multibase%20section%20of%20Controller%20Documents%201.0.";
const LINK_PUBLIC_KEY_OTHER: &str = "https://w3c.github.io/vc-di-eddsa/#:~:text=of%20Controller%20Documents%201.0.-,Any%20other%20encoding%20MUST%20NOT%20be%20allowed.,-Developers%20are%20advised%20to%20not";
const LINK_SECRET_KEY_PREFIX: &str = "https://w3c.github.io/vc-di-eddsa/#:~:text=The%20secretKeyMultibase%20value%20of%20the%20verification%20method%20MUST%20start%20with%20the%20base%2D58%2Dbtc%20prefix%20(z)%2C%20as%20defined%20in%20the%20Multibase%20section%20of%20Controller%20Documents%201.0.";
const LINK_SECRET_KEY_OTHER: &str = "https://w3c.github.io/vc-di-eddsa/#:~:text=of%20Controller%20Documents%201.0.-,Any%20other%20encoding%20MUST%20NOT%20be%20allowed.,-Developers%20are%20advised%20to%20prevent";
const LINK_PROOF_TYPE: &str = "https://w3c.github.io/vc-di-eddsa/#:~:text=The%20type%20property%20MUST%20be%20DataIntegrityProof";
const LINK_CRYPTOSUITE: &str = "https://w3c.github.io/vc-di-eddsa/#:~:text=The%20cryptosuite%20property%20of%20the%20proof%20MUST%20be%20eddsa%2Drdfc%2D2022%20or%20eddsa%2Djcs%2D2022";
const LINK_PROOF_VALUE: &str = "https://w3c.github.io/vc-di-eddsa/#:~:text=The%20proofValue%20property%20of%20the%20proof%20MUST%20be%20a%20detached%20EdDSA%20signature%20produced%20according%20to%20%5BRFC8032%5D%2C%20encoded%20using%20the%20base%2D58%2Dbtc%20header%20and%20alphabet%20as%20described%20in%20the%20Multibase%20section%20of%20Controller%20Documents%201.0";
const LINK_VC_DATA_MODEL: &str = "https://www.w3.org/TR/vc-data-model/#basic-concepts";
const LINK_VERIFY_PROOF: &str = "https://w3c.github.io/vc-di-eddsa/#verify-proof-eddsa-rdfc-2022";

// ---------------------------------------------------------------------------
// Rule trait
// ---------------------------------------------------------------------------

/// Non-failing result of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Pass,
    Skip(String),
}

/// A normative statement checked against one implementation's evidence.
pub trait Rule: Send + Sync + fmt::Debug {
    /// Stable machine identifier.
    fn id(&self) -> &str;

    /// The normative statement, used as the row label.
    fn statement(&self) -> &str;

    /// Link to the clause tested.
    fn link(&self) -> Option<&str> {
        None
    }

    /// Evidence this rule reads.
    fn requires(&self) -> &'static [Evidence];

    /// Evaluate the rule.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] when the statement does not hold or
    /// required evidence is missing.
    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure>;

    /// Whether the rule can only be evaluated with a verifier.
    fn needs_verifier(&self) -> bool {
        self.requires().iter().any(|e| e.needs_verifier())
    }
}

fn ensure(condition: bool, reason: impl Into<String>) -> Result<(), AssertionFailure> {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::assertion(reason))
    }
}

/// Resolved methods, failing if there are none.
fn non_empty_methods(bundle: &EvidenceBundle) -> Result<&[ResolvedMethod], AssertionFailure> {
    let methods = bundle.verification_methods()?;
    ensure(!methods.is_empty(), MSG_NO_METHOD_DOCUMENTS)?;
    Ok(methods)
}

/// `publicKeyMultibase` starts with `z` and is entirely base58-btc.
fn check_multibase_encoding(method: &VerificationMethodDocument) -> Result<&str, AssertionFailure> {
    let encoded = method
        .public_key_multibase
        .as_deref()
        .ok_or_else(|| AssertionFailure::assertion(format!("{MSG_NOT_MULTIBASE} (publicKeyMultibase is missing)")))?;
    if encoded.starts_with(BASE58_BTC_SIGIL) && multibase::is_base58(encoded) {
        return Ok(encoded);
    }
    let detail = match multibase::decode(encoded) {
        Err(e) => e.to_string(),
        Ok(_) => "not base58-btc".to_string(),
    };
    Err(AssertionFailure::assertion(format!("{MSG_NOT_MULTIBASE} ({detail})")))
}

// ---------------------------------------------------------------------------
// Issuer rows
// ---------------------------------------------------------------------------

/// Some proof's `cryptosuite` equals the suite under test exactly.
#[derive(Debug, Clone)]
pub struct CryptosuiteIdentity {
    suite: Cryptosuite,
    statement: String,
}

impl CryptosuiteIdentity {
    pub fn new(suite: Cryptosuite) -> Self {
        Self {
            suite,
            statement: format!("The field \"cryptosuite\" MUST be \"{suite}\"."),
        }
    }
}

impl Rule for CryptosuiteIdentity {
    fn id(&self) -> &str {
        "cryptosuite-identity"
    }

    fn statement(&self) -> &str {
        &self.statement
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        let proofs = bundle.proofs()?;
        ensure(
            proofs.iter().any(|p| p.uses(self.suite)),
            format!(
                "Expected at least one proof to have \"cryptosuite\" with the value \"{}\".",
                self.suite
            ),
        )?;
        Ok(Check::Pass)
    }
}

/// Some resolved verification method has `type` `Multikey`.
#[derive(Debug, Clone, Default)]
pub struct VerificationMethodType;

impl Rule for VerificationMethodType {
    fn id(&self) -> &str {
        "verification-method-type"
    }

    fn statement(&self) -> &str {
        "Dereferencing the \"verificationMethod\" MUST result in an object containing a type property with \"Multikey\" value."
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued, Evidence::VerificationMethods]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        let methods = non_empty_methods(bundle)?;
        ensure(methods.iter().any(|m| m.document.is_multikey()), MSG_NO_MULTIKEY)?;
        Ok(Check::Pass)
    }
}

/// Some proof's `proofPurpose` is declared by some controller document.
#[derive(Debug, Clone, Default)]
pub struct ProofPurposeBinding;

impl Rule for ProofPurposeBinding {
    fn id(&self) -> &str {
        "proof-purpose-binding"
    }

    fn statement(&self) -> &str {
        "The \"proof.proofPurpose\" field MUST match the verification relationship expressed by the verification method controller."
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued, Evidence::VerificationMethods, Evidence::Controllers]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        let methods = non_empty_methods(bundle)?;
        ensure(methods.iter().any(|m| m.document.is_multikey()), MSG_NO_MULTIKEY)?;

        let proofs = bundle.proofs()?;
        let controllers = bundle.controllers()?;
        let bound = proofs.iter().any(|proof| {
            proof
                .proof_purpose
                .as_deref()
                .is_some_and(|purpose| controllers.iter().any(|c| c.declares(purpose)))
        });
        ensure(
            bound,
            "Expected \"proof.proofPurpose\" field to match the verification method controller.",
        )?;
        Ok(Check::Pass)
    }
}

/// Every `publicKeyMultibase` is base58-btc multibase decoding to 34 bytes.
#[derive(Debug, Clone, Default)]
pub struct PublicKeyEncoding;

impl Rule for PublicKeyEncoding {
    fn id(&self) -> &str {
        "public-key-encoding"
    }

    fn statement(&self) -> &str {
        "The \"publicKeyMultibase\" value of the verification method MUST be 34 bytes in length and starts with the base-58-btc prefix (z)."
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued, Evidence::VerificationMethods]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        for method in non_empty_methods(bundle)? {
            let encoded = check_multibase_encoding(&method.document)?;
            let bytes = multibase::decode(encoded).map_err(|e| AssertionFailure::decode(MSG_NOT_MULTIBASE, &e))?;
            ensure(
                bytes.len() == MULTIKEY_ED25519_LENGTH,
                format!(
                    "Expected \"publicKeyMultibase\" value of the verification method to be 34 bytes in length. (got {})",
                    bytes.len()
                ),
            )?;
        }
        Ok(Check::Pass)
    }
}

/// Decoded `proofValue` length follows from the public key length.
#[derive(Debug, Clone)]
pub struct SignatureLength {
    suite: Cryptosuite,
}

impl SignatureLength {
    pub fn new(suite: Cryptosuite) -> Self {
        Self { suite }
    }

    fn check_proof(&self, bundle: &EvidenceBundle, proof: &Proof) -> Result<(), AssertionFailure> {
        let proof_value = proof
            .proof_value
            .as_deref()
            .ok_or_else(|| AssertionFailure::assertion(MSG_NO_PROOF_VALUE))?;
        let signature = multibase::decode(proof_value)
            .map_err(|e| AssertionFailure::decode("Expected proofValue to be multibase base58-btc encoded.", &e))?;

        let vm = proof
            .verification_method
            .as_deref()
            .ok_or_else(|| AssertionFailure::assertion("Expected proof to have a \"verificationMethod\"."))?;
        let method = bundle
            .method_for(vm)
            .ok_or_else(|| AssertionFailure::assertion(format!("Expected \"{vm}\" to have been dereferenced.")))?;
        let encoded = method
            .document
            .public_key_multibase
            .as_deref()
            .ok_or_else(|| AssertionFailure::assertion(format!("{MSG_NOT_MULTIBASE} (publicKeyMultibase is missing)")))?;
        let key = KeyMaterial::from_multibase(encoded).map_err(|e| AssertionFailure::decode(MSG_NOT_MULTIBASE, &e))?;

        match key.len() {
            ED25519_PUBLIC_KEY_LENGTH => ensure(
                signature.len() == ED25519_SIGNATURE_LENGTH,
                format!("Expected 64 byte proofValue for 32 byte key. (got {})", signature.len()),
            ),
            ED448_PUBLIC_KEY_LENGTH => ensure(
                signature.len() == ED448_SIGNATURE_LENGTH,
                format!("Expected 114 byte proofValue for 57 byte key. (got {})", signature.len()),
            ),
            other => Err(AssertionFailure::assertion(format!(
                "Expected public key length to be either 32 or 57 bytes. (key length not 32 or 57: got {other})"
            ))),
        }
    }
}

impl Rule for SignatureLength {
    fn id(&self) -> &str {
        "signature-length"
    }

    fn statement(&self) -> &str {
        "\"proofValue\" field when decoded to raw bytes, MUST be 64 bytes in length if the associated public key is 32 bytes or 114 bytes in length if the public key is 57 bytes."
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued, Evidence::VerificationMethods]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        let in_suite: Vec<&Proof> = bundle.proofs()?.into_iter().filter(|p| p.uses(self.suite)).collect();
        ensure(
            !in_suite.is_empty(),
            format!("Expected at least one {} cryptosuite.", self.suite),
        )?;
        for proof in in_suite {
            self.check_proof(bundle, proof)?;
        }
        Ok(Check::Pass)
    }
}

/// A conformant verifier accepts the issued credential.
#[derive(Debug, Clone, Default)]
pub struct EndToEndVerification;

impl Rule for EndToEndVerification {
    fn id(&self) -> &str {
        "end-to-end-verification"
    }

    fn statement(&self) -> &str {
        "\"proof\" MUST verify when using a conformant verifier."
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued, Evidence::Verification]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        let outcome = bundle.verification()?;
        ensure(outcome.error.is_none(), "Expected verifier to not error.")?;
        let result = outcome
            .result
            .as_ref()
            .ok_or_else(|| AssertionFailure::assertion("Expected verifier to return a result."))?;
        ensure(result.status != Some(400), "Expected status code to not be 400.")?;
        ensure(result.status == Some(200), "Expected status code to be 200.")?;
        Ok(Check::Pass)
    }
}

// ---------------------------------------------------------------------------
// Data model: verification methods
// ---------------------------------------------------------------------------

/// Which Multikey encoding row a [`MultikeyEncoding`] rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultikeyRow {
    PublicKeyPrefix,
    PublicKeyOtherEncoding,
    SecretKeyPrefix,
    SecretKeyOtherEncoding,
}

/// `publicKeyMultibase` (or `secretKeyMultibase`) encoding rows.
///
/// Public key rows require `z` plus base58-btc without a length check.
/// Secret key rows are always skipped: the harness never sees secret keys.
#[derive(Debug, Clone)]
pub struct MultikeyEncoding {
    row: MultikeyRow,
}

impl MultikeyEncoding {
    pub fn new(row: MultikeyRow) -> Self {
        Self { row }
    }
}

impl Rule for MultikeyEncoding {
    fn id(&self) -> &str {
        match self.row {
            MultikeyRow::PublicKeyPrefix => "public-key-multibase-prefix",
            MultikeyRow::PublicKeyOtherEncoding => "public-key-other-encoding",
            MultikeyRow::SecretKeyPrefix => "secret-key-multibase-prefix",
            MultikeyRow::SecretKeyOtherEncoding => "secret-key-other-encoding",
        }
    }

    fn statement(&self) -> &str {
        match self.row {
            MultikeyRow::PublicKeyPrefix => {
                "The publicKeyMultibase value of the verification method MUST start with the base-58-btc prefix (z), as defined in the Multibase section of Controller Documents 1.0."
            }
            MultikeyRow::SecretKeyPrefix => {
                "The secretKeyMultibase value of the verification method MUST start with the base-58-btc prefix (z), as defined in the Multibase section of Controller Documents 1.0."
            }
            MultikeyRow::PublicKeyOtherEncoding | MultikeyRow::SecretKeyOtherEncoding => {
                "Any other encoding MUST NOT be allowed."
            }
        }
    }

    fn link(&self) -> Option<&str> {
        Some(match self.row {
            MultikeyRow::PublicKeyPrefix => LINK_PUBLIC_KEY_PREFIX,
            MultikeyRow::PublicKeyOtherEncoding => LINK_PUBLIC_KEY_OTHER,
            MultikeyRow::SecretKeyPrefix => LINK_SECRET_KEY_PREFIX,
            MultikeyRow::SecretKeyOtherEncoding => LINK_SECRET_KEY_OTHER,
        })
    }

    fn requires(&self) -> &'static [Evidence] {
        match self.row {
            MultikeyRow::PublicKeyPrefix | MultikeyRow::PublicKeyOtherEncoding => {
                &[Evidence::Issued, Evidence::VerificationMethods]
            }
            MultikeyRow::SecretKeyPrefix | MultikeyRow::SecretKeyOtherEncoding => &[],
        }
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        match self.row {
            MultikeyRow::SecretKeyPrefix | MultikeyRow::SecretKeyOtherEncoding => {
                Ok(Check::Skip(SECRET_KEYS_OUT_OF_SCOPE.to_string()))
            }
            MultikeyRow::PublicKeyPrefix | MultikeyRow::PublicKeyOtherEncoding => {
                for method in non_empty_methods(bundle)? {
                    check_multibase_encoding(&method.document)?;
                }
                Ok(Check::Pass)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Data model: proof representations
// ---------------------------------------------------------------------------

/// Which DataIntegrityProof row a [`ProofRepresentation`] rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofRow {
    Type,
    CryptosuiteMembership,
    ProofValueEncoding,
}

/// Rows over every proof whose cryptosuite is in the allow-list.
///
/// All rows share one precondition: a credential was issued, it has
/// proofs, and at least one of them uses an allowed cryptosuite.
#[derive(Debug, Clone)]
pub struct ProofRepresentation {
    row: ProofRow,
    allowed: Vec<Cryptosuite>,
    statement: String,
}

impl ProofRepresentation {
    pub fn new(row: ProofRow, allowed: &[Cryptosuite]) -> Self {
        let statement = match row {
            ProofRow::Type => "The type property MUST be DataIntegrityProof.".to_string(),
            ProofRow::CryptosuiteMembership => format!(
                "The cryptosuite property of the proof MUST be {}.",
                join_or(allowed)
            ),
            ProofRow::ProofValueEncoding => "The proofValue property of the proof MUST be a detached EdDSA signature produced according to [RFC8032], encoded using the base-58-btc header and alphabet as described in the Multibase section of Controller Documents 1.0.".to_string(),
        };
        Self {
            row,
            allowed: allowed.to_vec(),
            statement,
        }
    }

    fn allowed_proofs<'a>(&self, bundle: &'a EvidenceBundle) -> Result<Vec<&'a Proof>, AssertionFailure> {
        let proofs = bundle.proofs()?;
        ensure(!proofs.is_empty(), "Expected credential to have a proof.")?;
        let allowed: Vec<&Proof> = proofs.into_iter().filter(|p| p.uses_any(&self.allowed)).collect();
        ensure(
            !allowed.is_empty(),
            format!("Expected {} cryptosuite.", join_or(&self.allowed)),
        )?;
        Ok(allowed)
    }

    fn check_proof(&self, proof: &Proof) -> Result<(), AssertionFailure> {
        match self.row {
            ProofRow::Type => {
                ensure(proof.proof_type.is_some(), "Expected a type identifier on the proof.")?;
                ensure(
                    proof.is_data_integrity(),
                    format!("Expected {DATA_INTEGRITY_PROOF} type."),
                )
            }
            ProofRow::CryptosuiteMembership => {
                ensure(
                    proof.cryptosuite.is_some(),
                    "Expected a cryptosuite identifier on the proof.",
                )?;
                ensure(
                    proof.uses_any(&self.allowed),
                    format!("Expected {} cryptosuite.", join_or(&self.allowed)),
                )
            }
            ProofRow::ProofValueEncoding => {
                let value = proof
                    .proof_value
                    .as_deref()
                    .ok_or_else(|| AssertionFailure::assertion(MSG_NO_PROOF_VALUE))?;
                multibase::decode(value)
                    .map(|_| ())
                    .map_err(|e| AssertionFailure::decode("Expected to have a decoded proofValue.", &e))
            }
        }
    }
}

impl Rule for ProofRepresentation {
    fn id(&self) -> &str {
        match self.row {
            ProofRow::Type => "proof-type",
            ProofRow::CryptosuiteMembership => "cryptosuite-membership",
            ProofRow::ProofValueEncoding => "proof-value-encoding",
        }
    }

    fn statement(&self) -> &str {
        &self.statement
    }

    fn link(&self) -> Option<&str> {
        Some(match self.row {
            ProofRow::Type => LINK_PROOF_TYPE,
            ProofRow::CryptosuiteMembership => LINK_CRYPTOSUITE,
            ProofRow::ProofValueEncoding => LINK_PROOF_VALUE,
        })
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        for proof in self.allowed_proofs(bundle)? {
            self.check_proof(proof)?;
        }
        Ok(Check::Pass)
    }
}

fn join_or(suites: &[Cryptosuite]) -> String {
    let names: Vec<&str> = suites.iter().map(|s| s.as_str()).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

// ---------------------------------------------------------------------------
// Interop rows
// ---------------------------------------------------------------------------

/// The raw issued credential has the VC 1.1 shape.
#[derive(Debug, Clone, Default)]
pub struct CredentialShape;

impl CredentialShape {
    fn check_raw(credential: &Value) -> Result<(), AssertionFailure> {
        let object = credential
            .as_object()
            .ok_or_else(|| AssertionFailure::assertion("Expected credential to be an object."))?;
        let member = |name: &str| {
            object
                .get(name)
                .ok_or_else(|| AssertionFailure::assertion(format!("Expected credential to have property \"{name}\".")))
        };

        let context = member("@context")?;
        let includes_v1 = match context {
            Value::String(s) => s == VC_V1_CONTEXT,
            Value::Array(entries) => entries.iter().any(|e| e.as_str() == Some(VC_V1_CONTEXT)),
            _ => false,
        };
        ensure(
            includes_v1,
            format!("Expected \"@context\" to include \"{VC_V1_CONTEXT}\"."),
        )?;

        ensure(
            member("type")? == &serde_json::json!(["VerifiableCredential"]),
            "Expected \"type\" to equal [\"VerifiableCredential\"].",
        )?;
        ensure(member("id")?.is_string(), "Expected \"id\" to be a string.")?;
        ensure(
            member("credentialSubject")?.is_object(),
            "Expected \"credentialSubject\" to be an object.",
        )?;
        ensure(member("issuanceDate")?.is_string(), "Expected \"issuanceDate\" to be a string.")?;
        ensure(
            member("expirationDate")?.is_string(),
            "Expected \"expirationDate\" to be a string.",
        )?;
        ensure(member("issuer")?.is_string(), "Expected \"issuer\" to be a string.")?;
        ensure(member("proof")?.is_object(), "Expected \"proof\" to be an object.")?;
        Ok(())
    }
}

impl Rule for CredentialShape {
    fn id(&self) -> &str {
        "credential-shape"
    }

    fn statement(&self) -> &str {
        "The issued credential MUST conform to the Verifiable Credentials Data Model v1.1."
    }

    fn link(&self) -> Option<&str> {
        Some(LINK_VC_DATA_MODEL)
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        Self::check_raw(&bundle.issued()?.raw)?;
        Ok(Check::Pass)
    }
}

/// The verifier accepts the untampered credential.
#[derive(Debug, Clone, Default)]
pub struct VerificationSucceeds;

impl Rule for VerificationSucceeds {
    fn id(&self) -> &str {
        "verification-success"
    }

    fn statement(&self) -> &str {
        "A conformant verifier MUST verify a credential issued by a conformant issuer."
    }

    fn link(&self) -> Option<&str> {
        Some(LINK_VERIFY_PROOF)
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued, Evidence::Verification]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        verification_success(bundle.verification()?)?;
        Ok(Check::Pass)
    }
}

/// The verifier rejects a copy with an altered `proofValue`.
#[derive(Debug, Clone, Default)]
pub struct TamperedProofRejected;

impl Rule for TamperedProofRejected {
    fn id(&self) -> &str {
        "tampered-proof-rejected"
    }

    fn statement(&self) -> &str {
        "A conformant verifier MUST reject a credential whose \"proofValue\" has been altered."
    }

    fn link(&self) -> Option<&str> {
        Some(LINK_VERIFY_PROOF)
    }

    fn requires(&self) -> &'static [Evidence] {
        &[Evidence::Issued, Evidence::TamperedVerification]
    }

    fn check(&self, bundle: &EvidenceBundle) -> Result<Check, AssertionFailure> {
        verification_fail(bundle.tampered_verification()?)?;
        Ok(Check::Pass)
    }
}

// ---------------------------------------------------------------------------
// Rule sets
// ---------------------------------------------------------------------------

/// An ordered, titled collection of rules. Row order follows insertion.
#[derive(Debug)]
pub struct RuleSet {
    title: String,
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rules: Vec::new(),
        }
    }

    /// Append `rule` as the next row.
    pub fn with(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Union of the evidence every rule requires.
    pub fn requires(&self) -> BTreeSet<Evidence> {
        self.rules
            .iter()
            .flat_map(|r| r.requires().iter().copied())
            .collect()
    }

    /// Issuer conformance rows for `suite`.
    pub fn create(suite: Cryptosuite) -> Self {
        Self::new(format!("{suite} (issuer)"))
            .with(CryptosuiteIdentity::new(suite))
            .with(VerificationMethodType)
            .with(ProofPurposeBinding)
            .with(PublicKeyEncoding)
            .with(SignatureLength::new(suite))
            .with(EndToEndVerification)
    }

    /// Multikey verification method rows.
    pub fn verification_methods(suite_name: &str) -> Self {
        Self::new(format!("{suite_name} - Data Model - Verification Methods (Multikey)"))
            .with(MultikeyEncoding::new(MultikeyRow::PublicKeyPrefix))
            .with(MultikeyEncoding::new(MultikeyRow::PublicKeyOtherEncoding))
            .with(MultikeyEncoding::new(MultikeyRow::SecretKeyPrefix))
            .with(MultikeyEncoding::new(MultikeyRow::SecretKeyOtherEncoding))
    }

    /// DataIntegrityProof representation rows over `allowed` suites.
    pub fn proof_representations(suite_name: &str, allowed: &[Cryptosuite]) -> Self {
        Self::new(format!("{suite_name} - Data Model - Proof Representations (DataIntegrityProof)"))
            .with(ProofRepresentation::new(ProofRow::Type, allowed))
            .with(ProofRepresentation::new(ProofRow::CryptosuiteMembership, allowed))
            .with(ProofRepresentation::new(ProofRow::ProofValueEncoding, allowed))
    }

    /// Issuer-to-verifier interoperability rows.
    pub fn interop(suite: Cryptosuite) -> Self {
        Self::new(format!("{suite} (interop)"))
            .with(CredentialShape)
            .with(VerificationSucceeds)
            .with(TamperedProofRejected)
    }

    /// Verifier rows, run against credentials from the default issuer.
    pub fn verifier(suite: Cryptosuite) -> Self {
        Self::new(format!("{suite} (verifier)"))
            .with(VerificationSucceeds)
            .with(TamperedProofRejected)
    }
}
