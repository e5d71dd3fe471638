//! Version-gated access operations: users, tokens, default expiry.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jfrog_client::models::TokenRequest;
use jfrog_client::{access, Capabilities, ClientError, Instance};

async fn mock_version(server: &MockServer, version: &str) {
    Mock::given(method("GET"))
        .and(path("/artifactory/api/system/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": version})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn old_platform_never_hits_the_token_endpoint() {
    let server = MockServer::start().await;
    mock_version(&server, "7.20.0").await;
    Mock::given(method("GET"))
        .and(path("/access/api/v1/tokens"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let caps = Capabilities::resolve(&instance).await.unwrap();
    let err = access::list_tokens(&instance, &caps).await.unwrap_err();
    assert!(matches!(err, ClientError::VersionUnsupported { .. }));
}

#[tokio::test]
async fn user_count_filters_by_realm() {
    let server = MockServer::start().await;
    mock_version(&server, "7.49.3").await;
    Mock::given(method("GET"))
        .and(path("/access/api/v2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                {"username": "alice", "realm": "internal"},
                {"username": "bob", "realm": "saml"},
                {"username": "carol", "realm": "internal"},
            ]
        })))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let caps = Capabilities::resolve(&instance).await.unwrap();
    assert_eq!(access::count_users(&instance, &caps, None).await.unwrap(), 3);
    assert_eq!(
        access::count_users(&instance, &caps, Some("internal")).await.unwrap(),
        2
    );
    assert_eq!(access::count_users(&instance, &caps, Some("scim")).await.unwrap(), 0);
}

#[tokio::test]
async fn tokens_are_listed() {
    let server = MockServer::start().await;
    mock_version(&server, "7.21.1").await;
    Mock::given(method("GET"))
        .and(path("/access/api/v1/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tokens": [
                {
                    "token_id": "11e5-a9c7",
                    "subject": "jfac@01/users/admin",
                    "issued_at": 1700000000,
                    "issuer": "jfac@01",
                    "refreshable": true,
                },
            ]
        })))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let caps = Capabilities::resolve(&instance).await.unwrap();
    let tokens = access::list_tokens(&instance, &caps).await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_id, "11e5-a9c7");
    assert!(tokens[0].refreshable);
    assert!(tokens[0].expiry.is_none());
}

#[tokio::test]
async fn token_creation_posts_the_request_body() {
    let server = MockServer::start().await;
    mock_version(&server, "7.30.0").await;
    Mock::given(method("POST"))
        .and(path("/access/api/v1/tokens"))
        .and(body_partial_json(json!({
            "description": "ci token",
            "include_reference_token": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_id": "t-123",
            "access_token": "eyJ...",
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let caps = Capabilities::resolve(&instance).await.unwrap();
    let token = access::create_token(&instance, &caps, &TokenRequest::new("ci token"))
        .await
        .unwrap();
    assert_eq!(token.token_id.as_deref(), Some("t-123"));
}

#[tokio::test]
async fn default_expiry_round_trip() {
    let server = MockServer::start().await;
    mock_version(&server, "8.0.0").await;
    Mock::given(method("GET"))
        .and(path("/access/api/v1/tokens/default_expiry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"default_expiry": 31536000})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/access/api/v1/tokens/default_expiry"))
        .and(body_partial_json(json!({"default_expiry": 7776000})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let caps = Capabilities::resolve(&instance).await.unwrap();
    assert_eq!(
        access::default_token_expiry(&instance, &caps).await.unwrap(),
        31536000
    );
    access::set_default_token_expiry(&instance, &caps, 7776000)
        .await
        .unwrap();
}

#[tokio::test]
async fn default_expiry_is_gated_below_7_62() {
    let server = MockServer::start().await;
    mock_version(&server, "7.61.9").await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let caps = Capabilities::resolve(&instance).await.unwrap();
    let err = access::default_token_expiry(&instance, &caps).await.unwrap_err();
    assert!(matches!(err, ClientError::VersionUnsupported { .. }));
}
