//! Shared test helpers for Raindrop API integration tests

use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starsync_core::domain::{RepoUrl, StarredItem};
use starsync_raindrop::client::RaindropClient;
use starsync_raindrop::retry::RetryPolicy;

pub const TOKEN: &str = "test-raindrop-token";
pub const COLLECTION: i64 = 31337;

/// Starts a mock server and returns a client with a fast retry policy
pub async fn setup_raindrop_mock() -> (MockServer, RaindropClient) {
    let server = MockServer::start().await;
    let client = RaindropClient::with_base_url(TOKEN, server.uri()).with_retry_policy(RetryPolicy {
        max_retries: 2,
        default_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    });
    (server, client)
}

pub fn url(name: &str) -> RepoUrl {
    RepoUrl::new(format!("https://github.com/{name}")).unwrap()
}

pub fn item(name: &str) -> StarredItem {
    StarredItem::new(
        name,
        url(name),
        Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap(),
    )
    .with_language("Rust")
    .with_topics(["cli"])
}

/// Mounts the existence check reporting `existing` as duplicates
pub async fn mount_exists(server: &MockServer, existing: &[&str]) {
    let duplicates: Vec<_> = existing
        .iter()
        .enumerate()
        .map(|(i, link)| json!({ "_id": i + 1, "link": link }))
        .collect();

    Mock::given(method("POST"))
        .and(path("/import/url/exists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "duplicates": duplicates
        })))
        .mount(server)
        .await;
}

/// Mounts a batch create that accepts anything
pub async fn mount_create(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/raindrops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "items": []
        })))
        .mount(server)
        .await;
}

/// Mounts one page of a collection search for `query`
pub async fn mount_search_page(
    server: &MockServer,
    query: &str,
    page: usize,
    items: Vec<serde_json::Value>,
    count: usize,
) {
    Mock::given(method("GET"))
        .and(path(format!("/raindrops/{COLLECTION}")))
        .and(query_param("search", query))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "items": items,
            "count": count
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// A full page of loose matches that are not `name` itself
pub fn near_misses(name: &str, first_id: u64) -> Vec<serde_json::Value> {
    (0..50)
        .map(|i| {
            json!({
                "_id": first_id + i,
                "link": format!("https://github.com/{name}-{i}")
            })
        })
        .collect()
}
