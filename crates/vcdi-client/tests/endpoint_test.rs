//! Contract tests for issuer and verifier endpoints.
//!
//! wiremock stands in for VC API services. Request bodies are matched
//! exactly against the shapes the harness promises to send.

use serde_json::json;
use vcdi_client::{Endpoint, EndpointSettings, IssuanceError, TransportFault};
use vcdi_core::TagSet;
use vcdi_vc::fixtures::{generate, Template};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer, route: &str, options: serde_json::Value) -> Endpoint {
    let http = vcdi_client::http_client(std::time::Duration::from_secs(5)).unwrap();
    Endpoint::new(
        http,
        EndpointSettings {
            id: "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK".into(),
            endpoint: format!("{}{route}", server.uri()).parse().unwrap(),
            options,
            tags: TagSet::parse(["eddsa-rdfc-2022"]).unwrap(),
        },
    )
}

fn signed(credential: &serde_json::Value) -> serde_json::Value {
    let mut vc = credential.clone();
    vc["proof"] = json!({
        "type": "DataIntegrityProof",
        "cryptosuite": "eddsa-rdfc-2022",
        "proofPurpose": "assertionMethod",
        "verificationMethod": "did:key:z6Mk#z6Mk",
        "proofValue": "z5C5b"
    });
    vc
}

// ── issuer ───────────────────────────────────────────────────────────

#[tokio::test]
async fn issue_posts_credential_and_options() {
    let server = MockServer::start().await;
    let issuer = endpoint(&server, "/credentials/issue", json!({"mandatoryPointers": ["/issuer"]}));
    let credential = generate(Template::ValidVc).with_fresh_identity(issuer.id());
    let sent = credential.to_value().unwrap();
    let sent_id = sent["id"].clone();

    Mock::given(method("POST"))
        .and(path("/credentials/issue"))
        .and(body_partial_json(json!({
            "credential": {"issuer": issuer.id(), "id": sent_id},
            "options": {"mandatoryPointers": ["/issuer"]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "verifiableCredential": signed(&sent)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let issued = issuer.issue(&credential).await.unwrap();
    assert_eq!(issued.credential.id, credential.id);
    assert_eq!(issued.credential.proofs().len(), 1);
    assert_eq!(issued.raw["proof"]["cryptosuite"], "eddsa-rdfc-2022");
}

#[tokio::test]
async fn issue_accepts_a_bare_credential_body() {
    let server = MockServer::start().await;
    let issuer = endpoint(&server, "/issue", json!({}));
    let credential = generate(Template::ValidVc).with_fresh_identity(issuer.id());

    Mock::given(method("POST"))
        .and(path("/issue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed(&credential.to_value().unwrap())))
        .mount(&server)
        .await;

    let issued = issuer.issue(&credential).await.unwrap();
    assert_eq!(issued.credential.issuer_id(), Some(issuer.id()));
}

#[tokio::test]
async fn issuer_error_object_is_rejected_with_status_and_body() {
    let server = MockServer::start().await;
    let issuer = endpoint(&server, "/issue", json!({}));

    Mock::given(method("POST"))
        .and(path("/issue"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "unsupported context"})))
        .mount(&server)
        .await;

    let err = issuer.issue(&generate(Template::ValidVc)).await.unwrap_err();
    match err {
        IssuanceError::Rejected { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body["message"], "unsupported context");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn non_object_success_body_is_malformed() {
    let server = MockServer::start().await;
    let issuer = endpoint(&server, "/issue", json!({}));

    Mock::given(method("POST"))
        .and(path("/issue"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let err = issuer.issue(&generate(Template::ValidVc)).await.unwrap_err();
    assert!(matches!(err, IssuanceError::MalformedCredential { .. }), "{err:?}");
}

// ── verifier ─────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_sends_checks_and_records_success() {
    let server = MockServer::start().await;
    let verifier = endpoint(&server, "/credentials/verify", json!({}));

    Mock::given(method("POST"))
        .and(path("/credentials/verify"))
        .and(body_partial_json(json!({
            "verifiableCredential": {"type": ["VerifiableCredential"]},
            "options": {"checks": ["proof"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"verified": true})))
        .expect(1)
        .mount(&server)
        .await;

    let vc = generate(Template::ValidVc).to_value().unwrap();
    let outcome = verifier.verify(&vc, &["proof".to_string()]).await.unwrap();
    let result = outcome.result.unwrap();
    assert_eq!(result.status, Some(200));
    assert_eq!(result.body["verified"], true);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn verify_records_rejection_as_error() {
    let server = MockServer::start().await;
    let verifier = endpoint(&server, "/verify", json!({}));

    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid signature"))
        .mount(&server)
        .await;

    let vc = generate(Template::ValidVc).to_value().unwrap();
    let outcome = verifier.verify(&vc, &["proof".to_string()]).await.unwrap();
    assert!(outcome.result.is_none());
    let error = outcome.error.unwrap();
    assert_eq!(error.status, Some(400));
    assert_eq!(error.body, json!("invalid signature"));
}

#[tokio::test]
async fn unknown_checks_pass_through_unchanged() {
    let server = MockServer::start().await;
    let verifier = endpoint(&server, "/verify", json!({}));

    Mock::given(method("POST"))
        .and(path("/verify"))
        .and(body_partial_json(json!({"options": {"checks": ["proof", "expiration"]}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let vc = generate(Template::ValidVc).to_value().unwrap();
    let checks = vec!["proof".to_string(), "expiration".to_string()];
    let outcome = verifier.verify(&vc, &checks).await.unwrap();
    assert_eq!(outcome.result.unwrap().body, serde_json::Value::Null);
}

#[tokio::test]
async fn slow_verifier_is_reported_as_timeout() {
    let server = MockServer::start().await;
    let http = vcdi_client::http_client(std::time::Duration::from_millis(50)).unwrap();
    let verifier = Endpoint::new(
        http,
        EndpointSettings {
            id: "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK".into(),
            endpoint: format!("{}/verify", server.uri()).parse().unwrap(),
            options: json!({}),
            tags: TagSet::parse(["eddsa-rdfc-2022"]).unwrap(),
        },
    );

    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
        .mount(&server)
        .await;

    let vc = generate(Template::ValidVc).to_value().unwrap();
    let err = verifier.verify(&vc, &["proof".to_string()]).await.unwrap_err();
    assert_eq!(err.fault(), TransportFault::Timeout);
    assert!(err.to_string().contains("timed out"), "{err}");
}
