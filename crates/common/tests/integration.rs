//! Integration tests for the Google API plumbing: token exchange and Firestore REST.
//!
//! Runs against `wiremock` servers, no network access needed.
//!
//! ```bash
//! cargo test -p pickup-common --test integration
//! ```

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pickup_common::auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource, TokenSource};
use pickup_common::error::StoreError;
use pickup_common::store::{DocumentStore, FirestoreClient};

const TEST_KEY: &str = include_str!("fixtures/test-key.pem");
const DOCS: &str = "/v1/projects/pickup-test/databases/(default)/documents";

// ============================================================
// Helpers
// ============================================================

fn service_account(token_uri: String) -> ServiceAccountKey {
    let json = json!({
        "type": "service_account",
        "project_id": "pickup-test",
        "private_key_id": "kid-1",
        "private_key": TEST_KEY,
        "client_email": "relay@pickup-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    });
    ServiceAccountKey::from_json(&json.to_string()).unwrap()
}

fn firestore(server: &MockServer) -> FirestoreClient {
    FirestoreClient::new(
        reqwest::Client::new(),
        &server.uri(),
        "pickup-test",
        "(default)",
        Arc::new(StaticTokenSource::new("test-token")),
    )
    .unwrap()
}

// ============================================================
// Token exchange
// ============================================================

#[tokio::test]
async fn test_token_exchange_is_reused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = service_account(format!("{}/token", server.uri()));
    let source = ServiceAccountTokenSource::new(key, reqwest::Client::new()).unwrap();

    assert_eq!(source.project_id(), "pickup-test");
    assert_eq!(source.access_token().await.unwrap(), "ya29.test");
    // Second call is served from the cached token (mock expects exactly one hit)
    assert_eq!(source.access_token().await.unwrap(), "ya29.test");
}

#[tokio::test]
async fn test_token_exchange_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let key = service_account(format!("{}/token", server.uri()));
    let source = ServiceAccountTokenSource::new(key, reqwest::Client::new()).unwrap();

    let err = source.access_token().await.unwrap_err();
    assert!(err.to_string().contains("invalid_grant"));
}

// ============================================================
// Firestore REST
// ============================================================

#[tokio::test]
async fn test_firestore_get_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/deliveries/D1", DOCS)))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/pickup-test/databases/(default)/documents/deliveries/D1",
            "fields": {
                "user_name": { "stringValue": "alice" },
                "boxes": { "integerValue": "3" }
            },
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let doc = firestore(&server)
        .get_by_id("deliveries", "D1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(doc.id, "D1");
    assert_eq!(doc.get_str("user_name"), Some("alice"));
    assert_eq!(doc.get("boxes"), Some(&json!(3)));
}

#[tokio::test]
async fn test_firestore_missing_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/deliveries/nope", DOCS)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let doc = firestore(&server).get_by_id("deliveries", "nope").await.unwrap();
    assert!(doc.is_none());
}

#[tokio::test]
async fn test_firestore_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let err = firestore(&server)
        .get_by_id("deliveries", "D1")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_firestore_run_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS)))
        .and(body_partial_json(json!({
            "structuredQuery": {
                "from": [{ "collectionId": "users" }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "user_name" },
                        "op": "EQUAL",
                        "value": { "stringValue": "alice" }
                    }
                },
                "limit": 1
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "document": {
                    "name": "projects/pickup-test/databases/(default)/documents/users/u1",
                    "fields": {
                        "user_name": { "stringValue": "alice" },
                        "email": { "stringValue": "alice@example.org" },
                        "fcmToken": { "stringValue": "tok-1" }
                    }
                },
                "readTime": "2024-01-01T00:00:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let docs = firestore(&server)
        .query_by_field("users", "user_name", &json!("alice"), 1)
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "u1");
    assert_eq!(docs[0].get_str("fcmToken"), Some("tok-1"));
}

#[tokio::test]
async fn test_firestore_run_query_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "readTime": "2024-01-01T00:00:00Z" }])),
        )
        .mount(&server)
        .await;

    let docs = firestore(&server)
        .query_by_field("users", "user_name", &json!("ghost"), 1)
        .await
        .unwrap();
    assert!(docs.is_empty());
}
