//! Catalog action API client against a mock catalog

use serde_json::json;
use sihook::models::LicenseOpenness;
use sihook::services::{CatalogClient, LicenseRegistry, PackageResolver};
use sihook::HookError;
use sihook_common::config::CatalogConfig;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, api_token: Option<&str>) -> CatalogClient {
    CatalogClient::new(&CatalogConfig {
        url: Some(format!("{}/", server.uri())),
        api_token: api_token.map(str::to_string),
    })
    .unwrap()
}

#[tokio::test]
async fn test_license_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/action/license_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [
                {"id": "cc-by", "od_conformance": "approved", "osd_conformance": "not reviewed", "title": "CC BY"},
                {"id": "closed", "od_conformance": "not reviewed", "osd_conformance": "rejected"},
                {"id": "legacy", "is_okd_compliant": false, "is_osi_compliant": true}
            ]
        })))
        .mount(&server)
        .await;

    let licenses = client(&server, None).license_list().await.unwrap();
    assert_eq!(licenses.len(), 3);

    let openness = LicenseOpenness::from_records(&licenses);
    assert_eq!(openness.get("cc-by"), Some(true));
    assert_eq!(openness.get("closed"), Some(false));
    assert_eq!(openness.get("legacy"), Some(true));
}

#[tokio::test]
async fn test_license_list_failure_is_registry_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/3/action/license_list"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = client(&server, None).license_list().await;
    assert!(matches!(result, Err(HookError::Registry(_))));
}

#[tokio::test]
async fn test_resolve_trims_identifier_and_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/action/package_show"))
        .and(query_param("id", "test-name"))
        .and(header("authorization", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": {"id": "abc-123", "type": "dataset", "name": "test-name", "title": "Test"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let package = client(&server, Some("secret-token"))
        .resolve("  test-name ")
        .await
        .unwrap();

    assert_eq!(package.id, "abc-123");
    assert_eq!(package.dataset_type.as_deref(), Some("dataset"));
    assert_eq!(package.name, "test-name");
}

#[tokio::test]
async fn test_resolve_not_found() {
    let server = MockServer::start().await;
    Mock::given(path("/api/3/action/package_show"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": {"__type": "Not Found Error", "message": "Not found"}
        })))
        .mount(&server)
        .await;

    let result = client(&server, None).resolve("missing").await;

    match result {
        Err(HookError::Resolution { id, reason }) => {
            assert_eq!(id, "missing");
            assert!(reason.contains("Not found"));
        }
        other => panic!("Expected resolution error, got {:?}", other),
    }
}
