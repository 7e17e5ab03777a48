//! Document loaders.
//!
//! A [`DocumentLoader`] turns an identifier (a DID, a DID URL or an HTTP
//! URL) into a JSON document. The harness treats loading as a black box;
//! the loaders here cover the identifiers conformance runs meet in
//! practice:
//!
//! | Loader                    | Identifiers                          |
//! |---------------------------|--------------------------------------|
//! | [`DidKeyLoader`]          | `did:key:z6Mk...` (Ed25519)          |
//! | [`HttpDocumentLoader`]    | `http(s)://...`, `did:web:...`       |
//! | [`StaticDocumentLoader`]  | anything registered in memory        |
//! | [`DefaultDocumentLoader`] | routes to the first two by scheme    |
//!
//! A URL with a fragment selects the matching verification method from the
//! loaded document.

use std::collections::HashMap;
use std::future::Future;

use serde_json::{json, Value};

use vcdi_core::multicodec::{self, KeyMaterial};
use vcdi_vc::MULTIKEY_TYPE;

use crate::error::ResolutionError;

const DID_KEY_PREFIX: &str = "did:key:";
const DID_WEB_PREFIX: &str = "did:web:";

/// Contexts of an expanded `did:key` controller document.
const DID_KEY_CONTEXTS: [&str; 2] = [
    "https://www.w3.org/ns/did/v1",
    "https://w3id.org/security/multikey/v1",
];

/// Verification relationships an Ed25519 `did:key` document declares.
const DID_KEY_RELATIONSHIPS: [&str; 4] = [
    "authentication",
    "assertionMethod",
    "capabilityInvocation",
    "capabilityDelegation",
];

/// Members that may list verification methods by value.
const METHOD_MEMBERS: [&str; 5] = [
    "verificationMethod",
    "authentication",
    "assertionMethod",
    "capabilityInvocation",
    "capabilityDelegation",
];

/// Dereferences identifiers to JSON documents.
pub trait DocumentLoader: Send + Sync {
    /// Load the document identified by `url`.
    fn load(&self, url: &str) -> impl Future<Output = Result<Value, ResolutionError>> + Send;
}

/// Split `url` at the first `#`.
fn split_fragment(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    }
}

/// Pick the verification method `url` refers to out of `document`.
///
/// Without a fragment the whole document is returned. With one, the
/// document itself matches if its `id` equals `url`; otherwise methods
/// listed by value are searched for an `id` equal to `url` or to the bare
/// `#fragment`.
pub fn select_fragment(document: Value, url: &str) -> Result<Value, ResolutionError> {
    let (_, Some(fragment)) = split_fragment(url) else {
        return Ok(document);
    };
    if document.get("id").and_then(Value::as_str) == Some(url) {
        return Ok(document);
    }
    let relative = format!("#{fragment}");
    METHOD_MEMBERS
        .iter()
        .filter_map(|member| document.get(*member).and_then(Value::as_array))
        .flatten()
        .find(|method| {
            method
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| id == url || id == relative)
        })
        .cloned()
        .ok_or_else(|| ResolutionError::NotFound {
            url: url.to_string(),
        })
}

// -- In-memory ----------------------------------------------------------------

/// Serves documents registered in memory.
///
/// Lookups try the full identifier first, then the identifier without its
/// fragment followed by fragment selection.
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentLoader {
    documents: HashMap<String, Value>,
}

impl StaticDocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `url`, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, url: impl Into<String>, document: Value) -> Self {
        self.insert(url, document);
        self
    }

    fn lookup(&self, url: &str) -> Result<Value, ResolutionError> {
        if let Some(document) = self.documents.get(url) {
            return Ok(document.clone());
        }
        let (base, _) = split_fragment(url);
        match self.documents.get(base) {
            Some(document) => select_fragment(document.clone(), url),
            None => Err(ResolutionError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

impl DocumentLoader for StaticDocumentLoader {
    async fn load(&self, url: &str) -> Result<Value, ResolutionError> {
        self.lookup(url)
    }
}

// -- did:key ------------------------------------------------------------------

/// Expands Ed25519 `did:key` identifiers locally.
///
/// `did:key:z6Mk...` yields the controller document; `did:key:z6Mk...#z6Mk...`
/// yields the `Multikey` verification method.
#[derive(Debug, Clone, Copy, Default)]
pub struct DidKeyLoader;

impl DidKeyLoader {
    /// Expand `url` synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnsupportedScheme`] for non-`did:key`
    /// input, [`ResolutionError::Decode`] for undecodable keys,
    /// [`ResolutionError::Malformed`] for keys of another codec, and
    /// [`ResolutionError::NotFound`] for a fragment naming another key.
    pub fn expand(url: &str) -> Result<Value, ResolutionError> {
        let (did, fragment) = split_fragment(url);
        let Some(multibase) = did.strip_prefix(DID_KEY_PREFIX) else {
            return Err(ResolutionError::UnsupportedScheme {
                url: url.to_string(),
            });
        };

        let key = KeyMaterial::from_multibase(multibase).map_err(|source| ResolutionError::Decode {
            url: url.to_string(),
            source,
        })?;
        if key.codec != multicodec::ED25519_PUB {
            return Err(ResolutionError::malformed(
                url,
                format!(
                    "did:key codec {:#x} is not ed25519-pub",
                    key.codec
                ),
            ));
        }

        let method_id = format!("{did}#{multibase}");
        let method = json!({
            "id": method_id,
            "type": MULTIKEY_TYPE,
            "controller": did,
            "publicKeyMultibase": multibase,
        });

        match fragment {
            Some(f) if f == multibase => Ok(method),
            Some(_) => Err(ResolutionError::NotFound {
                url: url.to_string(),
            }),
            None => {
                let mut document = json!({
                    "@context": DID_KEY_CONTEXTS,
                    "id": did,
                    "verificationMethod": [method],
                });
                if let Some(map) = document.as_object_mut() {
                    for relationship in DID_KEY_RELATIONSHIPS {
                        map.insert(relationship.to_string(), json!([method_id]));
                    }
                }
                Ok(document)
            }
        }
    }
}

impl DocumentLoader for DidKeyLoader {
    async fn load(&self, url: &str) -> Result<Value, ResolutionError> {
        tracing::debug!(url, "expanding did:key");
        Self::expand(url)
    }
}

// -- HTTP and did:web -----------------------------------------------------------

/// Fetches documents over HTTP(S), translating `did:web` identifiers to
/// their `did.json` location first.
#[derive(Debug, Clone)]
pub struct HttpDocumentLoader {
    http: reqwest::Client,
}

impl HttpDocumentLoader {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn fetch(&self, url: &str, location: &str) -> Result<Value, ResolutionError> {
        tracing::debug!(url, location, "fetching document");
        let resp = crate::retry::retry_send(location, || {
            self.http
                .get(location)
                .header(
                    reqwest::header::ACCEPT,
                    "application/did+ld+json, application/ld+json, application/json",
                )
                .send()
        })
        .await
        .map_err(|e| ResolutionError::transport(url, e))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolutionError::NotFound {
                url: url.to_string(),
            });
        }
        if !resp.status().is_success() {
            return Err(ResolutionError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.json()
            .await
            .map_err(|e| ResolutionError::malformed(url, format!("response is not JSON: {e}")))
    }
}

impl DocumentLoader for HttpDocumentLoader {
    async fn load(&self, url: &str) -> Result<Value, ResolutionError> {
        let (base, _) = split_fragment(url);
        let location = if base.starts_with(DID_WEB_PREFIX) {
            did_web_location(base)?
        } else if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            return Err(ResolutionError::UnsupportedScheme {
                url: url.to_string(),
            });
        };
        let document = self.fetch(url, &location).await?;
        select_fragment(document, url)
    }
}

/// Location of the `did.json` for a `did:web` DID.
///
/// `did:web:example.com` maps to `https://example.com/.well-known/did.json`;
/// `did:web:example.com:user:alice` maps to
/// `https://example.com/user/alice/did.json`. A percent-encoded port
/// (`%3A`) in the host is decoded.
pub fn did_web_location(did: &str) -> Result<String, ResolutionError> {
    let (base, _) = split_fragment(did);
    let rest = base
        .strip_prefix(DID_WEB_PREFIX)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ResolutionError::malformed(did, "did:web has no host"))?;

    let mut segments = rest.split(':');
    let host = segments
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ResolutionError::malformed(did, "did:web has no host"))?
        .replace("%3A", ":")
        .replace("%3a", ":");
    let path: Vec<&str> = segments.collect();
    if path.iter().any(|s| s.is_empty()) {
        return Err(ResolutionError::malformed(did, "did:web has an empty path segment"));
    }

    let location = if path.is_empty() {
        format!("https://{host}/.well-known/did.json")
    } else {
        format!("https://{host}/{}/did.json", path.join("/"))
    };
    url::Url::parse(&location)
        .map(|u| u.to_string())
        .map_err(|e| ResolutionError::malformed(did, format!("invalid did:web location: {e}")))
}

// -- Routing ------------------------------------------------------------------

/// Routes `did:key` to [`DidKeyLoader`] and `did:web`/HTTP(S) to
/// [`HttpDocumentLoader`].
#[derive(Debug, Clone)]
pub struct DefaultDocumentLoader {
    did_key: DidKeyLoader,
    http: HttpDocumentLoader,
}

impl DefaultDocumentLoader {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            did_key: DidKeyLoader,
            http: HttpDocumentLoader::new(http),
        }
    }
}

impl DocumentLoader for DefaultDocumentLoader {
    async fn load(&self, url: &str) -> Result<Value, ResolutionError> {
        if url.starts_with(DID_KEY_PREFIX) {
            self.did_key.load(url).await
        } else {
            self.http.load(url).await
        }
    }
}
