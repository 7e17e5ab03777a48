//! # Matrix Runner
//!
//! Drives a [`RuleSet`] across implementation columns. For each column the
//! runner gathers an [`EvidenceBundle`] (issue a fresh fixture, dereference
//! the proofs' verification methods and controllers, ask the verifier about
//! the credential and a tampered copy), then evaluates every rule against
//! that bundle.
//!
//! Only evidence some rule in the set requires is gathered. A failure to
//! gather evidence is recorded in the bundle and reported by each rule that
//! reads it; it never aborts the run or affects another column.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use vcdi_client::{
    DocumentLoader, Endpoint, IssuedCredential, Registry, Role, VerificationMethodResolver, VerifierOutcome,
};
use vcdi_core::TagSet;
use vcdi_vc::fixtures::{tamper_proof_value, Fixtures, Template};
use vcdi_vc::ControllerDocument;

use crate::bundle::{Evidence, EvidenceBundle, ResolvedMethod};
use crate::failure::{AssertionFailure, FailureKind};
use crate::report::{Cell, Matrix, Row};
use crate::rules::RuleSet;

/// Skip reason for verifier rows in a column without a verifier.
pub const NO_VERIFIER: &str = "implementation has no verifier matching the required tags";

/// One matrix column: the issuer that produces evidence and, optionally,
/// the verifier that judges it.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub issuer: &'a Endpoint,
    pub verifier: Option<&'a Endpoint>,
}

/// Columns for issuer rule sets: every implementation with an issuer
/// declaring all of `required`, in registry order. Implementations without
/// one are excluded.
pub fn issuer_columns<'a>(registry: &'a Registry, required: &TagSet) -> Vec<Column<'a>> {
    registry
        .filter_by_tags(required, Role::Issuer)
        .into_iter()
        .map(|m| Column {
            name: m.implementation.name().as_str(),
            issuer: m.endpoint,
            verifier: m.implementation.verifier_for(required),
        })
        .collect()
}

/// Columns for verifier rule sets: every implementation with a verifier
/// declaring all of `required`, each fed by `default_issuer`.
pub fn verifier_columns<'a>(
    registry: &'a Registry,
    required: &TagSet,
    default_issuer: &'a Endpoint,
) -> Vec<Column<'a>> {
    registry
        .filter_by_tags(required, Role::Verifier)
        .into_iter()
        .map(|m| Column {
            name: m.implementation.name().as_str(),
            issuer: default_issuer,
            verifier: Some(m.endpoint),
        })
        .collect()
}

/// Runs rule sets against implementation columns.
#[derive(Debug)]
pub struct MatrixRunner<L> {
    resolver: VerificationMethodResolver<L>,
    fixtures: Fixtures,
    checks: Vec<String>,
}

impl<L: DocumentLoader> MatrixRunner<L> {
    pub fn new(loader: L) -> Self {
        Self {
            resolver: VerificationMethodResolver::new(loader),
            fixtures: Fixtures::generate(),
            checks: vec!["proof".to_string()],
        }
    }

    /// Checks passed through to verifiers in `options.checks`.
    pub fn with_checks(mut self, checks: Vec<String>) -> Self {
        self.checks = checks;
        self
    }

    /// Evaluate `rules` for every column, in order.
    pub async fn run(&self, columns: &[Column<'_>], rules: &RuleSet) -> Matrix {
        let required = rules.requires();
        let mut matrix = Matrix::new(rules.title(), columns.iter().map(|c| c.name.to_string()).collect());
        matrix.rows = rules
            .iter()
            .map(|rule| Row {
                id: rule.id().to_string(),
                statement: rule.statement().to_string(),
                link: rule.link().map(str::to_string),
                cells: Vec::with_capacity(columns.len()),
            })
            .collect();

        info!(title = rules.title(), columns = columns.len(), rows = rules.len(), "running matrix");

        for column in columns {
            let bundle = self.collect(column, &required).await;
            for (row, rule) in matrix.rows.iter_mut().zip(rules.iter()) {
                let cell = if rule.needs_verifier() && column.verifier.is_none() {
                    Cell::skip(NO_VERIFIER)
                } else {
                    Cell::from(rule.check(&bundle))
                };
                debug!(
                    implementation = column.name,
                    rule = rule.id(),
                    outcome = %cell.outcome,
                    reason = cell.reason.as_deref().unwrap_or(""),
                    "cell evaluated"
                );
                row.cells.push(cell);
            }
        }

        let summary = matrix.summary();
        info!(
            title = rules.title(),
            pass = summary.pass,
            fail = summary.fail,
            skip = summary.skip,
            "matrix complete"
        );
        matrix
    }

    /// Gather the evidence `required` names for `column`.
    pub async fn collect(&self, column: &Column<'_>, required: &BTreeSet<Evidence>) -> EvidenceBundle {
        info!(implementation = column.name, issuer = %column.issuer.url(), "collecting evidence");

        let credential = match self.fixtures.clone(Template::ValidVc.name()) {
            Ok(credential) => credential.with_fresh_identity(column.issuer.id()),
            Err(e) => {
                return EvidenceBundle::failed(
                    column.name,
                    AssertionFailure::new(FailureKind::Configuration, e.to_string()),
                )
            }
        };

        let issued = match column.issuer.issue(&credential).await {
            Ok(issued) => issued,
            Err(e) => {
                warn!(implementation = column.name, error = %e, "issuance failed");
                return EvidenceBundle::failed(column.name, AssertionFailure::from(&e));
            }
        };

        let mut bundle = EvidenceBundle::new(column.name, Ok(issued.clone()));

        if required.contains(&Evidence::VerificationMethods) || required.contains(&Evidence::Controllers) {
            let methods = self.resolve_methods(&issued).await;
            if required.contains(&Evidence::Controllers) {
                bundle.controllers = match &methods {
                    Ok(methods) => self.resolve_controllers(methods).await,
                    Err(failure) => Err(failure.clone()),
                };
            }
            bundle.verification_methods = methods;
        }

        if let Some(verifier) = column.verifier {
            if required.contains(&Evidence::Verification) {
                bundle.verification = self.verify(verifier, &issued.raw).await;
            }
            if required.contains(&Evidence::TamperedVerification) {
                bundle.tampered_verification = self.verify_tampered(verifier, &issued).await;
            }
        }

        bundle
    }

    async fn resolve_methods(&self, issued: &IssuedCredential) -> Result<Vec<ResolvedMethod>, AssertionFailure> {
        let mut methods = Vec::new();
        for id in issued.credential.verification_methods() {
            let document = self.resolver.resolve(id).await.map_err(|e| {
                warn!(verification_method = id, error = %e, "verification method resolution failed");
                AssertionFailure::from(&e)
            })?;
            methods.push(ResolvedMethod {
                id: id.to_string(),
                document,
            });
        }
        Ok(methods)
    }

    async fn resolve_controllers(
        &self,
        methods: &[ResolvedMethod],
    ) -> Result<Vec<ControllerDocument>, AssertionFailure> {
        let mut controllers = Vec::with_capacity(methods.len());
        for method in methods {
            let controller = self
                .resolver
                .resolve_controller(&method.document)
                .await
                .map_err(|e| AssertionFailure::from(&e))?;
            controllers.push(controller);
        }
        Ok(controllers)
    }

    async fn verify(&self, verifier: &Endpoint, credential: &serde_json::Value) -> Result<VerifierOutcome, AssertionFailure> {
        verifier
            .verify(credential, &self.checks)
            .await
            .map_err(|e| AssertionFailure::from(&e))
    }

    async fn verify_tampered(
        &self,
        verifier: &Endpoint,
        issued: &IssuedCredential,
    ) -> Result<VerifierOutcome, AssertionFailure> {
        let tampered = tamper_proof_value(&issued.raw)
            .map_err(|e| AssertionFailure::assertion(format!("Expected a proof value to alter: {e}")))?;
        self.verify(verifier, &tampered).await
    }
}
