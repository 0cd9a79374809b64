//! Integration tests for GitHub error handling
//!
//! Every failure must abort the whole listing; a partial snapshot would
//! be reconciled as a wave of unstarred repositories.

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

use starsync_github::stars;
use starsync_github::GithubError;

use crate::common;

#[tokio::test]
async fn test_unauthorized_is_typed() {
    let (server, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;

    let err = stars::fetch_all_stars(&client).await.unwrap_err();

    match err.downcast_ref::<GithubError>() {
        Some(GithubError::Unauthorized(body)) => assert!(body.contains("Bad credentials")),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_typed() {
    let (server, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let err = stars::fetch_all_stars(&client).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<GithubError>(),
        Some(GithubError::RateLimited { reset_at: 1_700_000_000 })
    ));
}

#[tokio::test]
async fn test_failing_second_page_fails_listing() {
    let (server, client) = common::setup_github_mock().await;
    let next = format!("{}/user/starred?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([common::star_entry("a/one", "2024-05-03T00:00:00Z")]))
                .insert_header("Link", format!(r#"<{next}>; rel="next""#).as_str()),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = stars::fetch_all_stars(&client).await.unwrap_err();

    assert!(format!("{err:#}").contains("page 2"));
    assert!(matches!(
        err.downcast_ref::<GithubError>(),
        Some(GithubError::ServerError(_))
    ));
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let (server, client) = common::setup_github_mock().await;

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "an array" })))
        .mount(&server)
        .await;

    let err = stars::fetch_all_stars(&client).await.unwrap_err();
    assert!(format!("{err:#}").contains("parse"));
}

#[tokio::test]
async fn test_self_referencing_next_link_is_detected() {
    let (server, client) = common::setup_github_mock().await;
    let same = format!("{}/user/starred?per_page=100", server.uri());

    Mock::given(method("GET"))
        .and(path("/user/starred"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .insert_header("Link", format!(r#"<{same}>; rel="next""#).as_str()),
        )
        .mount(&server)
        .await;

    let err = stars::fetch_all_stars(&client).await.unwrap_err();
    assert!(err.to_string().contains("loop"));
}
