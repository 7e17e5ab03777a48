//! Implementation registry.
//!
//! Holds the implementations under test in configuration order and answers
//! the tag-filtering questions the runner asks: which implementations have
//! an issuer (or verifier) declaring every required tag, and which endpoint
//! to use.

use std::time::Duration;

use vcdi_core::{ImplementationName, TagSet};

use crate::config::{ConfigError, EndpointSettings, RunnerConfig};
use crate::endpoint::Endpoint;

/// Endpoint role used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Issuer,
    Verifier,
}

/// A named implementation with its issuer and verifier endpoints.
#[derive(Debug, Clone)]
pub struct Implementation {
    name: ImplementationName,
    issuers: Vec<Endpoint>,
    verifiers: Vec<Endpoint>,
}

impl Implementation {
    pub fn new(name: ImplementationName, issuers: Vec<Endpoint>, verifiers: Vec<Endpoint>) -> Self {
        Self {
            name,
            issuers,
            verifiers,
        }
    }

    pub fn name(&self) -> &ImplementationName {
        &self.name
    }

    pub fn issuers(&self) -> &[Endpoint] {
        &self.issuers
    }

    pub fn verifiers(&self) -> &[Endpoint] {
        &self.verifiers
    }

    /// Endpoints of `role`.
    pub fn endpoints(&self, role: Role) -> &[Endpoint] {
        match role {
            Role::Issuer => &self.issuers,
            Role::Verifier => &self.verifiers,
        }
    }

    /// First endpoint of `role` declaring every tag in `required`.
    pub fn matching(&self, role: Role, required: &TagSet) -> Option<&Endpoint> {
        self.endpoints(role).iter().find(|e| e.supports(required))
    }

    /// First issuer declaring every tag in `required`.
    pub fn issuer_for(&self, required: &TagSet) -> Option<&Endpoint> {
        self.matching(Role::Issuer, required)
    }

    /// First verifier declaring every tag in `required`.
    pub fn verifier_for(&self, required: &TagSet) -> Option<&Endpoint> {
        self.matching(Role::Verifier, required)
    }
}

/// An implementation together with the endpoint selected by a filter.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub implementation: &'a Implementation,
    pub endpoint: &'a Endpoint,
}

/// Implementations under test, in caller-provided order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    implementations: Vec<Implementation>,
}

impl Registry {
    pub fn new(implementations: Vec<Implementation>) -> Self {
        Self { implementations }
    }

    /// Build the registry described by `config`, sharing one HTTP client
    /// with the configured timeout across all endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the client cannot be built.
    pub fn from_config(config: &RunnerConfig) -> Result<Self, ConfigError> {
        let http = crate::http_client(Duration::from_secs(config.timeout_secs))
            .map_err(ConfigError::HttpClient)?;
        let endpoints = |settings: &[EndpointSettings]| -> Vec<Endpoint> {
            settings
                .iter()
                .cloned()
                .map(|s| Endpoint::new(http.clone(), s))
                .collect()
        };
        let implementations = config
            .implementations
            .iter()
            .map(|i| Implementation::new(i.name.clone(), endpoints(&i.issuers), endpoints(&i.verifiers)))
            .collect();
        Ok(Self::new(implementations))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Implementation> {
        self.implementations.iter()
    }

    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    /// Look an implementation up by name.
    pub fn get(&self, name: &str) -> Option<&Implementation> {
        self.implementations.iter().find(|i| i.name.as_str() == name)
    }

    /// Implementations with at least one `role` endpoint declaring every
    /// tag in `required`, each paired with the first such endpoint. Order
    /// follows the registry; implementations without a match are left out.
    pub fn filter_by_tags<'a>(&'a self, required: &TagSet, role: Role) -> Vec<Match<'a>> {
        self.implementations
            .iter()
            .filter_map(|implementation| match implementation.matching(role, required) {
                Some(endpoint) => Some(Match {
                    implementation,
                    endpoint,
                }),
                None => {
                    let missing: Vec<&str> = implementation
                        .endpoints(role)
                        .first()
                        .map(|e| e.tags().missing_from(required))
                        .unwrap_or_default()
                        .into_iter()
                        .map(|t| t.as_str())
                        .collect();
                    tracing::debug!(
                        implementation = %implementation.name,
                        ?role,
                        required = %required,
                        ?missing,
                        "implementation has no matching endpoint"
                    );
                    None
                }
            })
            .collect()
    }
}
