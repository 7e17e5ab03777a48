//! # Matrix Report
//!
//! The result of running a [`RuleSet`](crate::rules::RuleSet): one row per
//! rule, one column per implementation, one [`Cell`] per pair. Serializes
//! to JSON for downstream report generators and renders as plain text.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::failure::{AssertionFailure, FailureClass};
use crate::rules::Check;

pub const ROW_LABEL: &str = "Test Name";
pub const COLUMN_LABEL: &str = "Implementation";

/// Outcome of one rule against one implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// One matrix cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<FailureClass>,
}

impl Cell {
    pub fn pass() -> Self {
        Self {
            outcome: Outcome::Pass,
            reason: None,
            class: None,
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Skip,
            reason: Some(reason.into()),
            class: None,
        }
    }

    pub fn fail(failure: &AssertionFailure) -> Self {
        Self {
            outcome: Outcome::Fail,
            reason: Some(failure.reason.clone()),
            class: Some(failure.class()),
        }
    }
}

impl From<Result<Check, AssertionFailure>> for Cell {
    fn from(result: Result<Check, AssertionFailure>) -> Self {
        match result {
            Ok(Check::Pass) => Self::pass(),
            Ok(Check::Skip(reason)) => Self::skip(reason),
            Err(failure) => Self::fail(&failure),
        }
    }
}

/// One rule's results across every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub cells: Vec<Cell>,
}

/// Cell counts for a whole matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    /// Failures blamed on implementations.
    pub implementation_failures: usize,
    /// Failures blamed on the environment.
    pub environment_failures: usize,
}

/// A completed conformance matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub row_label: String,
    pub column_label: String,
    /// Column headers, in registry order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Matrix {
    pub fn new(title: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            title: title.into(),
            generated_at: Utc::now(),
            row_label: ROW_LABEL.to_string(),
            column_label: COLUMN_LABEL.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    /// The cell at (`row` id, `column` name).
    pub fn cell(&self, row: &str, column: &str) -> Option<&Cell> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.iter().find(|r| r.id == row)?.cells.get(index)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for cell in self.rows.iter().flat_map(|r| r.cells.iter()) {
            match cell.outcome {
                Outcome::Pass => summary.pass += 1,
                Outcome::Skip => summary.skip += 1,
                Outcome::Fail => {
                    summary.fail += 1;
                    match cell.class {
                        Some(FailureClass::Environment) => summary.environment_failures += 1,
                        _ => summary.implementation_failures += 1,
                    }
                }
            }
        }
        summary
    }

    /// Whether any cell failed.
    pub fn has_failures(&self) -> bool {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .any(|c| c.outcome == Outcome::Fail)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.len()))?;
        for row in &self.rows {
            writeln!(f)?;
            writeln!(f, "{}: {}", self.row_label, row.statement)?;
            if let Some(link) = &row.link {
                writeln!(f, "  {link}")?;
            }
            for (column, cell) in self.columns.iter().zip(&row.cells) {
                write!(f, "  [{}] {column}", cell.outcome)?;
                if let Some(reason) = &cell.reason {
                    write!(f, ": {reason}")?;
                }
                if let Some(class) = cell.class {
                    write!(f, " ({class})")?;
                }
                writeln!(f)?;
            }
        }
        let s = self.summary();
        writeln!(f)?;
        write!(
            f,
            "{} passed, {} failed ({} implementation, {} environment), {} skipped",
            s.pass, s.fail, s.implementation_failures, s.environment_failures, s.skip
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;

    fn sample() -> Matrix {
        let mut matrix = Matrix::new("eddsa-rdfc-2022 (issuer)", vec!["Alpha".into(), "Beta".into()]);
        matrix.rows.push(Row {
            id: "cryptosuite-identity".into(),
            statement: "The field \"cryptosuite\" MUST be \"eddsa-rdfc-2022\".".into(),
            link: None,
            cells: vec![
                Cell::pass(),
                Cell::fail(&AssertionFailure::assertion("wrong suite")),
            ],
        });
        matrix.rows.push(Row {
            id: "end-to-end-verification".into(),
            statement: "\"proof\" MUST verify when using a conformant verifier.".into(),
            link: None,
            cells: vec![
                Cell::fail(&AssertionFailure::new(FailureKind::Timeout, "timeout")),
                Cell::skip("no verifier"),
            ],
        });
        matrix
    }

    #[test]
    fn cells_are_addressed_by_row_and_column() {
        let matrix = sample();
        assert_eq!(matrix.cell("cryptosuite-identity", "Alpha"), Some(&Cell::pass()));
        let beta = matrix.cell("cryptosuite-identity", "Beta").unwrap();
        assert_eq!(beta.class, Some(FailureClass::Implementation));
        assert!(matrix.cell("cryptosuite-identity", "Gamma").is_none());
        assert!(matrix.cell("unknown", "Alpha").is_none());
    }

    #[test]
    fn summary_splits_failures_by_class() {
        let summary = sample().summary();
        assert_eq!(summary.pass, 1);
        assert_eq!(summary.fail, 2);
        assert_eq!(summary.skip, 1);
        assert_eq!(summary.implementation_failures, 1);
        assert_eq!(summary.environment_failures, 1);
    }

    #[test]
    fn json_uses_report_labels() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["rowLabel"], ROW_LABEL);
        assert_eq!(value["columnLabel"], COLUMN_LABEL);
        assert_eq!(value["rows"][0]["cells"][1]["outcome"], "fail");
        assert_eq!(value["rows"][0]["cells"][1]["class"], "implementation");
        assert!(value["rows"][0]["cells"][0].get("reason").is_none());

        let back: Matrix = serde_json::from_value(value).unwrap();
        assert_eq!(back.columns, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn text_render_lists_every_cell() {
        let text = sample().to_string();
        assert!(text.starts_with("eddsa-rdfc-2022 (issuer)\n"));
        assert!(text.contains("[fail] Beta: wrong suite (implementation)"));
        assert!(text.contains("[skip] Beta: no verifier"));
        assert!(text.ends_with("1 passed, 2 failed (1 implementation, 1 environment), 1 skipped"));
    }
}
