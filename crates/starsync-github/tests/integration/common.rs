//! Shared test helpers for GitHub API integration tests
//!
//! Each helper mounts mock endpoints on a wiremock server. Clients built
//! here point at the mock server.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starsync_github::client::GithubClient;

pub const TOKEN: &str = "test-gh-token";

/// Starts a mock server and returns a client pointing at it
pub async fn setup_github_mock() -> (MockServer, GithubClient) {
    let server = MockServer::start().await;
    let client = GithubClient::with_base_url(TOKEN, server.uri());
    (server, client)
}

/// One starred entry as returned under the star media type
pub fn star_entry(full_name: &str, starred_at: &str) -> Value {
    json!({
        "starred_at": starred_at,
        "repo": {
            "id": 1,
            "full_name": full_name,
            "html_url": format!("https://github.com/{full_name}"),
            "description": format!("{full_name} description"),
            "language": "Rust",
            "topics": ["cli"],
            "stargazers_count": 10
        }
    })
}

/// Mounts `GET /user/starred` returning a single page
pub async fn mount_single_page(server: &MockServer, entries: Value) {
    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a two-page listing linked through the `Link` header
pub async fn mount_two_pages(server: &MockServer, page1: Value, page2: Value) {
    let next = format!("{}/user/starred?per_page=100&page=2", server.uri());
    let last = next.clone();

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page1)
                .insert_header(
                    "Link",
                    format!(r#"<{next}>; rel="next", <{last}>; rel="last""#).as_str(),
                ),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page2))
        .expect(1)
        .mount(server)
        .await;
}
