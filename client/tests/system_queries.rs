//! Platform query endpoints: ping, version, licenses, storage, counts.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jfrog_client::{repository, system, Instance, RepositoryType};

#[tokio::test]
async fn ping_is_healthy_on_ok_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/system/ping"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "admin-token").unwrap();
    assert!(system::ping(&instance).await);
}

#[tokio::test]
async fn ping_degrades_to_unhealthy_on_failure_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/system/ping"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    assert!(!system::ping(&instance).await);
}

#[tokio::test]
async fn ping_handles_unreachable_host() {
    // Nothing listens here; the connection error must not propagate.
    let instance = Instance::new("http://127.0.0.1:9", "t").unwrap();
    assert!(!system::ping(&instance).await);
}

#[tokio::test]
async fn version_is_fetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/system/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "7.77.3",
            "revision": "77703900",
        })))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let info = system::get_version(&instance).await.unwrap();
    assert_eq!(info.version, "7.77.3");
    assert_eq!(info.revision.as_deref(), Some("77703900"));
}

#[tokio::test]
async fn license_falls_back_to_placeholder_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/system/license"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let license = system::get_license(&instance).await.unwrap();
    assert_eq!(license.license_type.as_deref(), Some("N/A"));
}

#[tokio::test]
async fn node_count_is_the_length_of_the_ha_license_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/system/licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "licenses": [
                {"type": "Enterprise Plus", "validThrough": "Jan 1, 2027", "licensedTo": "Example"},
                {"type": "Enterprise Plus", "validThrough": "Jan 1, 2027", "licensedTo": "Example"},
            ]
        })))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    assert_eq!(system::node_count(&instance).await.unwrap(), 2);
}

#[tokio::test]
async fn storage_info_parses_summaries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/storageinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "binariesSummary": {"binariesCount": "1,024", "binariesSize": "5.2 GB"},
            "fileStoreSummary": {"storageType": "file-system", "usedSpace": "10 GB (40%)"},
        })))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let info = system::get_storage_info(&instance).await.unwrap();
    let binaries = info.binaries_summary.unwrap();
    assert_eq!(binaries.binaries_count.as_deref(), Some("1,024"));
    let store = info.file_store_summary.unwrap();
    assert_eq!(store.storage_type.as_deref(), Some("file-system"));
}

#[tokio::test]
async fn repo_count_counts_the_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/repositories"))
        .and(query_param("type", "federated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "fed-1"}, {"key": "fed-2"}, {"key": "fed-3"},
        ])))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let count = repository::repo_count(&instance, RepositoryType::Federated)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn repo_count_degrades_to_zero_on_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/repositories"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let count = repository::repo_count(&instance, RepositoryType::Local)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn create_repository_sends_a_minimal_config_with_derived_layout() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/api/repositories/npm-dev-local"))
        .and(wiremock::matchers::body_partial_json(json!({
            "key": "npm-dev-local",
            "rclass": "local",
            "packageType": "npm",
            "xrayIndex": true,
            "repoLayoutRef": "npm-default",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Successfully created repository 'npm-dev-local'",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let instance = Instance::new(&server.uri(), "t").unwrap();
    let body = repository::create_repository(&instance, "npm-dev-local", "npm", RepositoryType::Local)
        .await
        .unwrap();
    assert!(body.contains("npm-dev-local"));
}

#[tokio::test]
async fn base_url_with_product_suffix_reaches_the_same_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/system/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    // The user pasted the UI URL; the /artifactory suffix is stripped.
    let instance = Instance::new(&format!("{}/artifactory/", server.uri()), "t").unwrap();
    assert!(system::ping(&instance).await);
}
