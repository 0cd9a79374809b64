//! Integration tests for the starred repositories listing

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use starsync_core::ports::IStarSource;
use starsync_github::client::{GithubClient, STAR_MEDIA_TYPE};
use starsync_github::provider::GithubStarSource;
use starsync_github::stars;

use crate::common;

#[tokio::test]
async fn test_single_page_listing() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_single_page(
        &server,
        json!([
            common::star_entry("rust-lang/rust", "2024-05-02T08:00:00Z"),
            common::star_entry("tokio-rs/tokio", "2024-05-01T08:00:00Z"),
        ]),
    )
    .await;

    let snapshot = stars::fetch_all_stars(&client)
        .await
        .expect("Listing failed");

    assert_eq!(snapshot.len(), 2);
    let first = &snapshot.items()[0];
    assert_eq!(first.full_name, "rust-lang/rust");
    assert_eq!(first.html_url.as_str(), "https://github.com/rust-lang/rust");
    assert_eq!(first.language.as_deref(), Some("Rust"));
    assert!(first.topics.contains("cli"));
}

#[tokio::test]
async fn test_sends_auth_and_star_media_type() {
    let (server, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .and(query_param("per_page", "100"))
        .and(header("accept", STAR_MEDIA_TYPE))
        .and(header("authorization", format!("Bearer {}", common::TOKEN).as_str()))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = stars::fetch_all_stars(&client).await.unwrap();
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn test_custom_page_size_is_requested() {
    let (server, _) = common::setup_github_mock().await;
    let client = GithubClient::with_base_url(common::TOKEN, server.uri()).with_per_page(30);

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .and(query_param("per_page", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    stars::fetch_all_stars(&client).await.unwrap();
}

#[tokio::test]
async fn test_follows_link_header_pagination() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_two_pages(
        &server,
        json!([
            common::star_entry("a/one", "2024-05-03T00:00:00Z"),
            common::star_entry("a/two", "2024-05-02T00:00:00Z"),
        ]),
        json!([common::star_entry("a/three", "2024-05-01T00:00:00Z")]),
    )
    .await;

    let snapshot = stars::fetch_all_stars(&client).await.unwrap();

    let names: Vec<&str> = snapshot.iter().map(|i| i.full_name.as_str()).collect();
    assert_eq!(names, vec!["a/one", "a/two", "a/three"]);
}

#[tokio::test]
async fn test_duplicate_across_pages_is_collapsed() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_two_pages(
        &server,
        json!([common::star_entry("a/one", "2024-05-03T00:00:00Z")]),
        json!([
            common::star_entry("a/one", "2024-05-03T00:00:00Z"),
            common::star_entry("a/two", "2024-05-02T00:00:00Z"),
        ]),
    )
    .await;

    let snapshot = stars::fetch_all_stars(&client).await.unwrap();
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn test_star_source_adapter() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_single_page(
        &server,
        json!([common::star_entry("serde-rs/serde", "2024-01-01T00:00:00Z")]),
    )
    .await;

    let source = GithubStarSource::new(client);
    let snapshot = source.fetch_all().await.unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.items()[0].full_name, "serde-rs/serde");
}
