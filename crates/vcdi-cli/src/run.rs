//! # Run Subcommand
//!
//! Loads the runner configuration, builds the implementation registry and
//! runs the selected rule sets, printing one matrix per set.
//!
//! Exit code 0 means every cell passed or was skipped; 1 means at least one
//! cell failed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use vcdi_client::{http_client, DefaultDocumentLoader, Registry, RunnerConfig};
use vcdi_core::{CapabilityTag, Cryptosuite};
use vcdi_matrix::{issuer_columns, verifier_columns, Matrix, MatrixRunner, RuleSet};

/// Which rule sets to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Suite {
    /// Issuer conformance rows.
    Create,
    /// Verification method and proof representation rows.
    DataModel,
    /// Credential shape plus verifier accept / reject rows.
    Interop,
    /// Verifier rows fed by the default issuer.
    Verify,
    /// Every suite above.
    All,
}

impl Suite {
    fn includes(self, other: Suite) -> bool {
        self == Suite::All || self == other
    }
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Arguments for the run subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Rule sets to run.
    #[arg(long, value_enum, default_value_t = Suite::Create)]
    pub suite: Suite,

    /// Cryptosuite under test. Defaults to the configuration, then to the
    /// first required tag naming a cryptosuite.
    #[arg(long)]
    pub cryptosuite: Option<Cryptosuite>,

    /// Replace the configured required tags (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Write the report here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Execute the run subcommand with the configuration at `config_path`.
pub fn run_run(args: &RunArgs, config_path: &Path) -> Result<u8> {
    let mut config = RunnerConfig::load(config_path)?;
    if let Some(tags) = &args.tags {
        config.override_tags(tags.iter().cloned())?;
    }
    let suite = args
        .cryptosuite
        .or_else(|| config.cryptosuite())
        .unwrap_or(Cryptosuite::EddsaRdfc2022);
    if config.tags.is_empty() {
        config.tags.insert(CapabilityTag::new(suite.as_str())?);
    }

    tracing::info!(
        config = %config_path.display(),
        cryptosuite = %suite,
        tags = %config.tags,
        "starting conformance run"
    );

    let registry = Registry::from_config(&config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let matrices = runtime.block_on(run_suites(args.suite, suite, &config, &registry))?;

    let report = match args.format {
        Format::Json => serde_json::to_string_pretty(&matrices)?,
        Format::Text => matrices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n"),
    };
    match &args.output {
        Some(path) => {
            fs::write(path, &report).with_context(|| format!("failed to write report: {}", path.display()))?;
            println!("  report: {}", path.display());
        }
        None => println!("{report}"),
    }

    Ok(u8::from(matrices.iter().any(Matrix::has_failures)))
}

async fn run_suites(
    selected: Suite,
    suite: Cryptosuite,
    config: &RunnerConfig,
    registry: &Registry,
) -> Result<Vec<Matrix>> {
    let http = http_client(Duration::from_secs(config.timeout_secs)).context("failed to build HTTP client")?;
    let runner = MatrixRunner::new(DefaultDocumentLoader::new(http)).with_checks(config.checks.clone());
    let required = &config.tags;
    let columns = issuer_columns(registry, required);
    if columns.is_empty() {
        tracing::warn!(tags = %required, "no implementation has an issuer matching the required tags");
    }

    let mut matrices = Vec::new();
    if selected.includes(Suite::Create) {
        matrices.push(runner.run(&columns, &RuleSet::create(suite)).await);
    }
    if selected.includes(Suite::DataModel) {
        matrices.push(runner.run(&columns, &RuleSet::verification_methods(suite.as_str())).await);
        matrices.push(
            runner
                .run(&columns, &RuleSet::proof_representations(suite.as_str(), &Cryptosuite::ALL))
                .await,
        );
    }
    if selected.includes(Suite::Interop) {
        matrices.push(runner.run(&columns, &RuleSet::interop(suite)).await);
    }
    if selected.includes(Suite::Verify) {
        let name = config.default_issuer_name();
        let default_issuer = registry.get(name).and_then(|i| i.issuer_for(required));
        match default_issuer {
            Some(issuer) => {
                let columns = verifier_columns(registry, required, issuer);
                matrices.push(runner.run(&columns, &RuleSet::verifier(suite)).await);
            }
            None if selected == Suite::Verify => {
                bail!("default issuer \"{name}\" has no issuer matching tags {required}")
            }
            None => tracing::warn!(issuer = name, "skipping verifier suite: default issuer not available"),
        }
    }
    Ok(matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn all_includes_every_suite() {
        for suite in [Suite::Create, Suite::DataModel, Suite::Interop, Suite::Verify] {
            assert!(Suite::All.includes(suite));
            assert!(suite.includes(suite));
        }
        assert!(!Suite::Create.includes(Suite::Verify));
    }

    #[test]
    fn shipped_config_parses() {
        let config = RunnerConfig::parse(include_str!("../../../config/runner.yaml")).unwrap();
        assert_eq!(config.cryptosuite(), Some(Cryptosuite::EddsaRdfc2022));
        let registry = Registry::from_config(&config).unwrap();
        assert_eq!(issuer_columns(&registry, &config.tags).len(), 2);
    }

    #[test]
    fn missing_config_is_an_error() {
        let args = RunArgs {
            suite: Suite::Create,
            cryptosuite: None,
            tags: None,
            format: Format::Text,
            output: None,
        };
        let err = run_run(&args, Path::new("/nonexistent/runner.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/runner.yaml"));
    }

    #[test]
    fn empty_registry_produces_empty_report() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tags: [eddsa-jcs-2022]\nimplementations: []").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        let args = RunArgs {
            suite: Suite::DataModel,
            cryptosuite: None,
            tags: None,
            format: Format::Json,
            output: Some(out.path().to_path_buf()),
        };
        assert_eq!(run_run(&args, file.path()).unwrap(), 0);

        let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.path()).unwrap()).unwrap();
        let matrices = report.as_array().unwrap();
        assert_eq!(matrices.len(), 2);
        assert_eq!(
            matrices[1]["title"],
            "eddsa-jcs-2022 - Data Model - Proof Representations (DataIntegrityProof)"
        );
        assert_eq!(matrices[0]["columns"], serde_json::json!([]));
    }

    #[test]
    fn verify_suite_requires_the_default_issuer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tags: [eddsa-rdfc-2022]\nimplementations: []").unwrap();
        let args = RunArgs {
            suite: Suite::Verify,
            cryptosuite: None,
            tags: None,
            format: Format::Text,
            output: None,
        };
        let err = run_run(&args, file.path()).unwrap_err();
        assert!(err.to_string().contains("Grotto Networking") || err.to_string().contains("default issuer"));
    }
}
