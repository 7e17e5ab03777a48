//! HTTP document loading and resolution against a mocked document host.

use serde_json::json;
use vcdi_client::{
    DefaultDocumentLoader, DocumentLoader, HttpDocumentLoader, ResolutionError, TransportFault,
    VerificationMethodResolver,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> reqwest::Client {
    vcdi_client::http_client(std::time::Duration::from_secs(5)).unwrap()
}

async fn controller_host() -> MockServer {
    let server = MockServer::start().await;
    let controller = format!("{}/issuer", server.uri());
    let method_id = format!("{controller}#key-1");

    Mock::given(method("GET"))
        .and(path("/issuer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": controller,
            "verificationMethod": [{
                "id": method_id,
                "type": "Multikey",
                "controller": controller,
                "publicKeyMultibase": "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK"
            }],
            "assertionMethod": [method_id]
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn http_fragment_is_selected_from_fetched_document() {
    let server = controller_host().await;
    let loader = HttpDocumentLoader::new(http());
    let url = format!("{}/issuer#key-1", server.uri());

    let method = loader.load(&url).await.unwrap();
    assert_eq!(method["id"], url);
    assert_eq!(method["type"], "Multikey");
}

#[tokio::test]
async fn http_chain_resolves_method_controller_and_key() {
    let server = controller_host().await;
    let resolver = VerificationMethodResolver::new(DefaultDocumentLoader::new(http()));
    let url = format!("{}/issuer#key-1", server.uri());

    let method = resolver.resolve(&url).await.unwrap();
    let controller = resolver.resolve_controller(&method).await.unwrap();
    assert!(controller.declares("assertionMethod"));
    assert!(!controller.declares("authentication"));

    let key = resolver.public_key_material(&url).await.unwrap();
    assert_eq!(key.len(), 32);
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let loader = HttpDocumentLoader::new(http());
    let err = loader.load(&format!("{}/nobody", server.uri())).await.unwrap_err();
    assert!(matches!(err, ResolutionError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let loader = HttpDocumentLoader::new(http());
    let err = loader.load(&format!("{}/issuer", server.uri())).await.unwrap_err();
    assert!(matches!(err, ResolutionError::Status { status: 503, .. }), "{err:?}");
}

#[tokio::test]
async fn non_json_document_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let loader = HttpDocumentLoader::new(http());
    let err = loader.load(&format!("{}/issuer", server.uri())).await.unwrap_err();
    assert!(matches!(err, ResolutionError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let loader = HttpDocumentLoader::new(
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(50))
            .build()
            .unwrap(),
    );
    let err = loader.load("http://127.0.0.1:1/issuer").await.unwrap_err();
    assert!(
        matches!(
            err,
            ResolutionError::Transport {
                fault: TransportFault::Connect,
                ..
            }
        ),
        "{err:?}"
    );
    assert!(err.to_string().contains("connection failed"));
}

#[tokio::test]
async fn default_loader_routes_did_key_locally() {
    let loader = DefaultDocumentLoader::new(http());
    let doc = loader
        .load("did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK")
        .await
        .unwrap();
    assert!(doc.get("assertionMethod").is_some());

    let err = loader.load("urn:example:1").await.unwrap_err();
    assert!(matches!(err, ResolutionError::UnsupportedScheme { .. }));
}
