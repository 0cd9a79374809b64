//! Integration tests for the bookmark endpoints

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use starsync_core::domain::{BookmarkDraft, BookmarkId};
use starsync_core::ports::IBookmarkService;
use starsync_raindrop::bookmarks;
use starsync_raindrop::provider::RaindropBookmarkService;
use starsync_raindrop::RaindropError;

use crate::common;

#[tokio::test]
async fn test_existing_links_posts_urls() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("POST"))
        .and(path("/import/url/exists"))
        .and(header("authorization", format!("Bearer {}", common::TOKEN).as_str()))
        .and(body_json(json!({
            "urls": ["https://github.com/a/one", "https://github.com/a/two"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "ids": [5],
            "duplicates": [{ "_id": 5, "link": "https://github.com/a/two" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let existing = bookmarks::existing_links(
        &client,
        &[common::url("a/one"), common::url("a/two")],
    )
    .await
    .unwrap();

    assert_eq!(existing.len(), 1);
    assert!(existing.contains("https://github.com/a/two"));
}

#[tokio::test]
async fn test_existing_links_skips_request_for_empty_input() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("POST"))
        .and(path("/import/url/exists"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(bookmarks::existing_links(&client, &[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_sends_items_in_collection() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("POST"))
        .and(path("/raindrops"))
        .and(body_partial_json(json!({
            "items": [{
                "collectionId": common::COLLECTION,
                "title": "a/one",
                "link": "https://github.com/a/one",
                "tags": ["github"],
                "note": "topics: Rust, cli",
                "created": "2024-04-01T12:00:00Z"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "items": [{ "_id": 100, "link": "https://github.com/a/one" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = BookmarkDraft::from_item(&common::item("a/one"), &["github".to_string()]);
    let created = bookmarks::create_bookmarks(&client, common::COLLECTION, &[draft])
        .await
        .unwrap();

    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_create_result_false_is_rejected() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("POST"))
        .and(path("/raindrops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": false,
            "errorMessage": "Incorrect collection"
        })))
        .mount(&server)
        .await;

    let draft = BookmarkDraft::from_item(&common::item("a/one"), &[]);
    let err = bookmarks::create_bookmarks(&client, common::COLLECTION, &[draft])
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RaindropError>(),
        Some(RaindropError::Rejected(m)) if m.contains("Incorrect collection")
    ));
}

#[tokio::test]
async fn test_search_is_scoped_to_collection() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("GET"))
        .and(path(format!("/raindrops/{}", common::COLLECTION)))
        .and(query_param("search", "https://github.com/a/one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "items": [
                { "_id": 1, "link": "https://github.com/a/one", "title": "a/one" },
                { "_id": 2, "link": "https://github.com/a/one-more", "title": "a/one-more" }
            ],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = bookmarks::search_collection(&client, common::COLLECTION, "https://github.com/a/one")
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, BookmarkId::new(1));
    assert!(records[0].matches(&common::url("a/one")));
    assert!(!records[1].matches(&common::url("a/one")));
}

#[tokio::test]
async fn test_delete_by_id() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/raindrop/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": true })))
        .expect(1)
        .mount(&server)
        .await;

    bookmarks::delete_bookmark(&client, BookmarkId::new(77)).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/raindrop/78"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "result": false,
            "errorMessage": "Not found"
        })))
        .mount(&server)
        .await;

    let err = bookmarks::delete_bookmark(&client, BookmarkId::new(78))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RaindropError>(),
        Some(RaindropError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unauthorized_is_typed() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("POST"))
        .and(path("/import/url/exists"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = bookmarks::existing_links(&client, &[common::url("a/one")])
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RaindropError>(),
        Some(RaindropError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_service_adapter_searches_its_collection() {
    let (server, client) = common::setup_raindrop_mock().await;

    Mock::given(method("GET"))
        .and(path("/raindrops/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "items": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = RaindropBookmarkService::new(client, 99);
    assert_eq!(service.collection_id(), 99);
    let records = service.search_by_link(&common::url("a/gone")).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_search_collection_follows_pages_until_short_page() {
    let (server, client) = common::setup_raindrop_mock().await;
    let query = "https://github.com/a/lib";

    common::mount_search_page(&server, query, 0, common::near_misses("a/lib", 1), 53).await;
    common::mount_search_page(
        &server,
        query,
        1,
        vec![
            json!({ "_id": 900, "link": "https://github.com/a/lib-x" }),
            json!({ "_id": 901, "link": "https://github.com/a/lib-y" }),
            json!({ "_id": 902, "link": "https://github.com/a/lib-z" }),
        ],
        53,
    )
    .await;

    let records = bookmarks::search_collection(&client, common::COLLECTION, query)
        .await
        .unwrap();

    assert_eq!(records.len(), 53);
    assert_eq!(records[52].id, BookmarkId::new(902));
}

#[tokio::test]
async fn test_find_link_stops_at_exact_match() {
    let (server, client) = common::setup_raindrop_mock().await;
    let link = common::url("a/tool");

    // Page 1 would be another full page; it must not be requested
    common::mount_search_page(
        &server,
        link.as_str(),
        0,
        vec![json!({ "_id": 5, "link": link.as_str() })],
        120,
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("/raindrops/{}", common::COLLECTION)))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let records = bookmarks::find_link(&client, common::COLLECTION, &link)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].matches(&link));
}

#[tokio::test]
async fn test_find_link_absent_after_last_page() {
    let (server, client) = common::setup_raindrop_mock().await;
    let link = common::url("a/gone");

    common::mount_search_page(&server, link.as_str(), 0, common::near_misses("a/gone", 1), 50).await;

    let records = bookmarks::find_link(&client, common::COLLECTION, &link)
        .await
        .unwrap();

    assert_eq!(records.len(), 50);
    assert!(!records.iter().any(|r| r.matches(&link)));
}
