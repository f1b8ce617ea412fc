//! Object-store listing pagination against a mocked account.

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stratus_api::ServiceKind;
use stratus_auth::CloudOptions;
use stratus_client::services::object_store::{self, ListOpts};
use stratus_client::ClientRegistry;

async fn store_client(
    server: &MockServer,
) -> (ClientRegistry, std::sync::Arc<stratus_client::ServiceClient>) {
    let options = CloudOptions {
        service_url: Some(format!("{}/v1/AUTH_demo", server.uri())),
        token: Some("tok".to_string()),
        ..CloudOptions::default()
    };
    let mut registry = ClientRegistry::new(options).unwrap();
    let client = registry.client(ServiceKind::ObjectStore).await.unwrap();
    (registry, client)
}

#[tokio::test]
async fn object_list_all_follows_markers_until_the_listing_is_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/AUTH_demo/photos"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "a.jpg"}, {"name": "b.jpg"},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/AUTH_demo/photos"))
        .and(query_param("marker", "b.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "c.jpg"}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/AUTH_demo/photos"))
        .and(query_param("marker", "c.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (_registry, client) = store_client(&server).await;
    let opts = ListOpts {
        all: true,
        ..ListOpts::default()
    };
    let listing = object_store::object_list(&client, "photos", &opts)
        .await
        .unwrap();
    let names: Vec<&str> = listing
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
}

#[tokio::test]
async fn object_list_uses_name_before_subdir_for_the_marker() {
    let server = MockServer::start().await;
    // The last entry is a grouped prefix, so the subdir becomes the
    // marker for the next page.
    Mock::given(method("GET"))
        .and(path("/v1/AUTH_demo/docs"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "readme.txt"}, {"subdir": "archive/"},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/AUTH_demo/docs"))
        .and(query_param("marker", "archive/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (_registry, client) = store_client(&server).await;
    let opts = ListOpts {
        delimiter: Some("/".to_string()),
        all: true,
        ..ListOpts::default()
    };
    let listing = object_store::object_list(&client, "docs", &opts)
        .await
        .unwrap();
    assert_eq!(listing.len(), 2);
}

#[tokio::test]
async fn a_stuck_marker_terminates_the_listing() {
    let server = MockServer::start().await;
    // A server that keeps returning the same page regardless of the
    // marker must not loop the client forever.
    Mock::given(method("GET"))
        .and(path("/v1/AUTH_demo/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "same.txt"}])))
        .expect(2)
        .mount(&server)
        .await;

    let (_registry, client) = store_client(&server).await;
    let opts = ListOpts {
        all: true,
        ..ListOpts::default()
    };
    let listing = object_store::object_list(&client, "loop", &opts)
        .await
        .unwrap();
    assert_eq!(listing.len(), 2);
}

#[tokio::test]
async fn a_single_page_is_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/AUTH_demo/"))
        .and(query_param("format", "json"))
        .and(query_param("marker", "seen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "t", "count": 3, "bytes": 1024},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (_registry, client) = store_client(&server).await;
    let opts = ListOpts {
        marker: Some("seen".to_string()),
        ..ListOpts::default()
    };
    let listing = object_store::container_list(&client, &opts).await.unwrap();
    assert_eq!(listing[0]["name"], "t");
}
