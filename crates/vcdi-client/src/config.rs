//! Runner configuration.
//!
//! A YAML (or JSON) document naming the capability tags an implementation
//! must declare to take part in a run, the default issuer used to produce
//! credentials for verifier columns, and every implementation under test
//! with its issuer and verifier endpoints.
//!
//! ```yaml
//! tags: [eddsa-rdfc-2022]
//! defaultIssuerName: Grotto Networking
//! timeoutSecs: 30
//! implementations:
//!   - name: Digital Bazaar
//!     issuers:
//!       - id: did:key:z6MkptjaoxjyKQaSqf1dHXswP6EayYhPQBYzprVCPmGBHz9S
//!         endpoint: https://issuer.example/credentials/issue
//!         tags: [eddsa-rdfc-2022]
//!     verifiers:
//!       - id: https://verifier.example
//!         endpoint: https://verifier.example/credentials/verify
//!         tags: [eddsa-rdfc-2022]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use vcdi_core::{Cryptosuite, ImplementationName, TagSet, ValidationError};

/// Environment variable naming the default issuer implementation.
pub const ISSUER_NAME_ENV: &str = "ISSUER_NAME_JCS";

/// Default issuer implementation when neither the environment nor the
/// configuration names one.
pub const DEFAULT_ISSUER_NAME: &str = "Grotto Networking";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "VCDI_CONFIG";

/// Configuration file used when nothing else is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/runner.yaml";

/// Complete runner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
    /// Tags an endpoint must declare to be matched.
    pub tags: TagSet,
    /// Cryptosuite under test. Falls back to the first cryptosuite found
    /// among `tags`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cryptosuite: Option<Cryptosuite>,
    /// Implementation whose issuer produces credentials for verifier runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_issuer_name: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `options.checks` sent with every verification request.
    #[serde(default = "default_checks")]
    pub checks: Vec<String>,
    /// Implementations, in column order.
    #[serde(default)]
    pub implementations: Vec<ImplementationConfig>,
}

/// One implementation under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationConfig {
    pub name: ImplementationName,
    #[serde(default)]
    pub issuers: Vec<EndpointSettings>,
    #[serde(default)]
    pub verifiers: Vec<EndpointSettings>,
}

/// Settings of a single issuer or verifier endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// Identifier injected as the credential `issuer` (issuers), or a label
    /// (verifiers).
    pub id: String,
    /// URL the harness POSTs to.
    pub endpoint: Url,
    /// Implementation-defined options passed through verbatim.
    #[serde(default = "empty_options")]
    pub options: Value,
    /// Capabilities this endpoint declares.
    #[serde(default)]
    pub tags: TagSet,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_checks() -> Vec<String> {
    vec!["proof".to_string()]
}

fn empty_options() -> Value {
    Value::Object(Map::new())
}

impl RunnerConfig {
    /// Read and parse a configuration file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not a valid document, and
    /// [`ConfigError::DuplicateImplementation`] if two implementations
    /// share a name.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_str_with_path(&raw, path)?;
        config.apply_overrides(|var| std::env::var(var).ok());
        tracing::debug!(
            path = %path.display(),
            implementations = config.implementations.len(),
            tags = %config.tags,
            "loaded runner configuration"
        );
        Ok(config)
    }

    /// Parse a configuration document without touching the environment.
    ///
    /// # Errors
    ///
    /// As for [`RunnerConfig::load`], minus I/O.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::from_str_with_path(raw, Path::new("<inline>"))
    }

    fn from_str_with_path(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.check_unique_names()?;
        Ok(config)
    }

    fn check_unique_names(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::BTreeSet::new();
        for implementation in &self.implementations {
            if !seen.insert(implementation.name.as_str()) {
                return Err(ConfigError::DuplicateImplementation(
                    implementation.name.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// `ISSUER_NAME_JCS` replaces `defaultIssuerName`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(ISSUER_NAME_ENV).filter(|n| !n.trim().is_empty()) {
            self.default_issuer_name = Some(name);
        }
    }

    /// Name of the implementation whose issuer serves verifier runs.
    pub fn default_issuer_name(&self) -> &str {
        self.default_issuer_name
            .as_deref()
            .unwrap_or(DEFAULT_ISSUER_NAME)
    }

    /// The cryptosuite under test: explicit setting first, otherwise the
    /// first required tag that names a cryptosuite.
    pub fn cryptosuite(&self) -> Option<Cryptosuite> {
        self.cryptosuite.or_else(|| {
            self.tags
                .iter()
                .find_map(|tag| tag.as_str().parse::<Cryptosuite>().ok())
        })
    }

    /// Replace the required tag set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any tag is malformed.
    pub fn override_tags<I, S>(&mut self, tags: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = TagSet::parse(tags)?;
        Ok(())
    }
}

/// Resolve the configuration path: explicit argument, then `VCDI_CONFIG`,
/// then `config/runner.yaml`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("implementation \"{0}\" is declared more than once")]
    DuplicateImplementation(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
