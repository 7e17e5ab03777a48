//! # vcdi-matrix: Rules and the Matrix Runner
//!
//! Turns implementation endpoints into a conformance matrix.
//!
//! - **Evidence** ([`bundle`]): what was gathered for one column.
//! - **Rules** ([`rules`]): pure predicates over evidence, grouped into
//!   titled [`RuleSet`]s.
//! - **Runner** ([`runner`]): gathers evidence per column and evaluates
//!   every rule against it.
//! - **Report** ([`report`]): the resulting [`Matrix`] of pass, fail and
//!   skip cells, each failure tagged with a [`FailureClass`].
//!
//! A failing cell is data, not an error: nothing in this crate returns
//! `Err` because an implementation misbehaved.

pub mod bundle;
pub mod expectations;
pub mod failure;
pub mod report;
pub mod rules;
pub mod runner;

pub use bundle::{Evidence, EvidenceBundle, ResolvedMethod};
pub use failure::{AssertionFailure, FailureClass, FailureKind};
pub use report::{Cell, Matrix, Outcome, Row, Summary};
pub use rules::{Check, Rule, RuleSet};
pub use runner::{issuer_columns, verifier_columns, Column, MatrixRunner};
