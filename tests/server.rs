//! HTTP Transport Tests
//!
//! Drives the router in-process for /search, /autocomplete and static files.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use gzsearch::server::{router, AppState, ErrorResponse};
use gzsearch::{Collection, QueryEngine, Record};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    _dir: TempDir,
}

fn test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let static_dir = dir.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("hello.txt"), "hi there").unwrap();

    let autocomplete = dir.path().join("data.json");
    std::fs::write(&autocomplete, r#"["Blue Car", "Red Bus"]"#).unwrap();

    let engine = QueryEngine::new(Collection::from(vec![
        Record::new(1, "Blue Car", "fast").with_tags(["car"]),
        Record::new(2, "Red Bus", "Blue interior"),
    ]));

    TestApp {
        app: router(AppState::new(engine, autocomplete), &static_dir),
        _dir: dir,
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_search_returns_matches_in_order() {
    let test = test_app();
    let (status, content_type, body) = get(&test.app, "/search?term=Blue").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let records: Vec<Record> = serde_json::from_slice(&body).unwrap();
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(records[0].tags, vec!["car"]);
}

#[tokio::test]
async fn test_search_wire_field_names() {
    let test = test_app();
    let (_, _, body) = get(&test.app, "/search?term=Bus").await;

    let json: Value = serde_json::from_slice(&body).unwrap();
    let first = &json.as_array().unwrap()[0];
    for key in ["id", "title", "content", "thumb_url", "tags", "updated_at", "image_urls"] {
        assert!(first.get(key).is_some(), "missing {}", key);
    }
}

#[tokio::test]
async fn test_search_url_decodes_term() {
    let test = test_app();
    let (status, _, body) = get(&test.app, "/search?term=Blue%20Car").await;

    assert_eq!(status, StatusCode::OK);
    let records: Vec<Record> = serde_json::from_slice(&body).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_search_no_match_is_empty_array() {
    let test = test_app();
    let (status, _, body) = get(&test.app, "/search?term=purple").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn test_search_missing_or_empty_term_is_bad_request() {
    let test = test_app();

    for uri in ["/search", "/search?term=", "/search?other=1"] {
        let (status, _, body) = get(&test.app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(!error.error.is_empty());
    }
}

#[tokio::test]
async fn test_autocomplete_echoes_file() {
    let test = test_app();
    let (status, content_type, body) = get(&test.app, "/autocomplete").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, br#"["Blue Car", "Red Bus"]"#);
}

#[tokio::test]
async fn test_autocomplete_missing_file_is_server_error() {
    let dir = TempDir::new().unwrap();
    let app = router(
        AppState::new(QueryEngine::default(), dir.path().join("missing.json")),
        dir.path(),
    );

    let (status, _, _) = get(&app, "/autocomplete").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_static_files_served() {
    let test = test_app();

    let (status, _, body) = get(&test.app, "/hello.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"hi there");

    let (status, _, _) = get(&test.app, "/nothing-here.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
