//! Issuer and verifier endpoints.
//!
//! | Role     | Request body                                        | 2xx body                        |
//! |----------|-----------------------------------------------------|---------------------------------|
//! | issuer   | `{credential, options}`                             | credential, bare or wrapped     |
//! | verifier | `{verifiableCredential, options: {checks: [...]}}`  | verification result             |
//!
//! Issuers may answer with the credential itself or wrap it in
//! `verifiableCredential` (VC API) or `data`. Verifier answers are never
//! interpreted here: the HTTP status and body are recorded as a
//! [`VerifierOutcome`] and judged by the rule set.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use vcdi_core::TagSet;
use vcdi_vc::Credential;

use crate::config::EndpointSettings;
use crate::error::{IssuanceError, VerificationError};

/// Members under which issuers are known to wrap the issued credential.
const CREDENTIAL_WRAPPERS: [&str; 2] = ["verifiableCredential", "data"];

/// A credential returned by an issuer, parsed and raw.
///
/// The raw JSON is what gets forwarded to verifiers and what shape checks
/// inspect; the parsed form feeds the typed rules.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCredential {
    pub raw: Value,
    pub credential: Credential,
}

/// Status and body of one HTTP reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub body: Value,
}

/// What a verifier said about one credential.
///
/// Exactly one of `result` (2xx) and `error` (any other status) is set when
/// the outcome comes from [`Endpoint::verify`]. Both are optional so that
/// expectations can be checked against any recorded shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifierOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<HttpReply>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<HttpReply>,
}

impl VerifierOutcome {
    /// Outcome of a 2xx reply.
    pub fn accepted(status: u16, body: Value) -> Self {
        Self {
            result: Some(HttpReply {
                status: Some(status),
                body,
            }),
            error: None,
        }
    }

    /// Outcome of a non-2xx reply.
    pub fn rejected(status: u16, body: Value) -> Self {
        Self {
            result: None,
            error: Some(HttpReply {
                status: Some(status),
                body,
            }),
        }
    }
}

/// An issuer or verifier endpoint of one implementation.
#[derive(Debug, Clone)]
pub struct Endpoint {
    http: reqwest::Client,
    settings: EndpointSettings,
}

impl Endpoint {
    pub fn new(http: reqwest::Client, settings: EndpointSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &EndpointSettings {
        &self.settings
    }

    /// Identifier from the settings; for issuers, the `issuer` value
    /// injected into credentials.
    pub fn id(&self) -> &str {
        &self.settings.id
    }

    pub fn url(&self) -> &url::Url {
        &self.settings.endpoint
    }

    pub fn tags(&self) -> &TagSet {
        &self.settings.tags
    }

    /// Whether this endpoint declares every tag in `required`.
    pub fn supports(&self, required: &TagSet) -> bool {
        self.settings.tags.is_superset_of(required)
    }

    /// Ask the issuer to sign `credential`.
    ///
    /// Calls `POST {endpoint}` with `{credential, options}`. Every failure is
    /// logged with the endpoint, the error, and the full request body.
    pub async fn issue(&self, credential: &Credential) -> Result<IssuedCredential, IssuanceError> {
        let endpoint = self.settings.endpoint.to_string();
        let body = json!({
            "credential": credential,
            "options": self.settings.options,
        });

        let result = self.post_issue(&endpoint, &body).await;
        if let Err(e) = &result {
            tracing::warn!(endpoint = %endpoint, "Issuance failed for {endpoint}");
            tracing::error!(endpoint = %endpoint, error = %e, "issuer error");
            tracing::info!(
                endpoint = %endpoint,
                body = %serde_json::to_string_pretty(&json!({ "body": body })).unwrap_or_default(),
                "issuance request"
            );
        }
        result
    }

    async fn post_issue(&self, endpoint: &str, body: &Value) -> Result<IssuedCredential, IssuanceError> {
        tracing::debug!(endpoint, "POST issue");
        let resp = crate::retry::retry_send(endpoint, || {
            self.http.post(self.settings.endpoint.clone()).json(body).send()
        })
        .await
        .map_err(|e| IssuanceError::transport(endpoint, e))?;

        let status = resp.status().as_u16();
        let success = resp.status().is_success();
        let text = resp.text().await.map_err(|e| IssuanceError::transport(endpoint, e))?;
        let payload = parse_body(&text);

        if !success {
            return Err(IssuanceError::Rejected {
                endpoint: endpoint.into(),
                status,
                body: payload,
            });
        }

        let raw = unwrap_credential(payload);
        let credential = Credential::from_value(raw.clone()).map_err(|source| {
            IssuanceError::MalformedCredential {
                endpoint: endpoint.into(),
                source,
            }
        })?;
        Ok(IssuedCredential { raw, credential })
    }

    /// Submit `credential` to the verifier.
    ///
    /// Calls `POST {endpoint}` with
    /// `{verifiableCredential, options: {checks}}`. `checks` values are
    /// passed through unchanged.
    pub async fn verify(&self, credential: &Value, checks: &[String]) -> Result<VerifierOutcome, VerificationError> {
        let endpoint = self.settings.endpoint.to_string();
        let body = json!({
            "verifiableCredential": credential,
            "options": { "checks": checks },
        });
        tracing::debug!(endpoint = %endpoint, "POST verify");

        let resp = crate::retry::retry_send(&endpoint, || {
            self.http.post(self.settings.endpoint.clone()).json(&body).send()
        })
        .await
        .map_err(|e| VerificationError::transport(&endpoint, e))?;

        let status = resp.status().as_u16();
        let success = resp.status().is_success();
        let text = resp.text().await.map_err(|e| VerificationError::transport(&endpoint, e))?;
        let payload = parse_body(&text);
        tracing::debug!(endpoint = %endpoint, status, "verifier replied");

        Ok(if success {
            VerifierOutcome::accepted(status, payload)
        } else {
            VerifierOutcome::rejected(status, payload)
        })
    }
}

/// JSON body if it parses, otherwise the text as a JSON string. Empty
/// bodies become `null`.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn unwrap_credential(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) => {
            for wrapper in CREDENTIAL_WRAPPERS {
                if map.get(wrapper).is_some_and(Value::is_object) {
                    if let Some(inner) = map.remove(wrapper) {
                        return inner;
                    }
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_vc_api_and_data_wrappers() {
        let vc = json!({"id": "urn:uuid:1", "type": ["VerifiableCredential"]});
        assert_eq!(unwrap_credential(json!({"verifiableCredential": vc})), vc);
        assert_eq!(unwrap_credential(json!({"data": vc})), vc);
        assert_eq!(unwrap_credential(vc.clone()), vc);
    }

    #[test]
    fn non_object_wrapper_member_is_left_alone() {
        let body = json!({"data": "string", "type": ["VerifiableCredential"]});
        assert_eq!(unwrap_credential(body.clone()), body);
    }

    #[test]
    fn body_parsing_keeps_non_json_text() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_body("Bad Request"), json!("Bad Request"));
    }

    #[test]
    fn outcome_constructors_set_exactly_one_side() {
        let ok = VerifierOutcome::accepted(200, Value::Null);
        assert!(ok.result.is_some() && ok.error.is_none());
        let bad = VerifierOutcome::rejected(400, Value::Null);
        assert!(bad.result.is_none() && bad.error.is_some());
        assert_eq!(bad.error.unwrap().status, Some(400));
    }
}
