use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use navdeck_engine::Directory;
use navdeck_server::{AppState, router};
use navdeck_storage::SqliteStore;

fn test_app() -> Router {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    router(AppState::new(Directory::new(store), reqwest::Client::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(v) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoint() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_category_returns_materialized_record() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({"name": "Search"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Search");
    assert_eq!(body["order"], 1);

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({"name": "News"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"], 2);

    let (status, body) = send(&app, "GET", "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Search", "News"]);
}

#[tokio::test]
async fn empty_category_name_is_rejected() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({"name": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn put_with_order_reorders() {
    let app = test_app();
    let (_, first) = send(&app, "POST", "/api/categories", Some(json!({"name": "a"}))).await;
    let (_, second) = send(&app, "POST", "/api/categories", Some(json!({"name": "b"}))).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/categories",
        Some(json!({"id": second["id"], "order": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/categories", None).await;
    let list = body.as_array().unwrap();
    assert_eq!(list[0]["id"], second["id"]);
    assert_eq!(list[0]["order"], 1);
    assert_eq!(list[1]["id"], first["id"]);
    assert_eq!(list[1]["order"], 2);
}

#[tokio::test]
async fn put_with_name_renames() {
    let app = test_app();
    let (_, cat) = send(&app, "POST", "/api/categories", Some(json!({"name": "a"}))).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/categories",
        Some(json!({"id": cat["id"], "name": "renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/categories", None).await;
    assert_eq!(body[0]["name"], "renamed");
}

#[tokio::test]
async fn put_without_name_or_order_is_rejected() {
    let app = test_app();
    let (_, cat) = send(&app, "POST", "/api/categories", Some(json!({"name": "a"}))).await;
    let (status, _) = send(&app, "PUT", "/api/categories", Some(json!({"id": cat["id"]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_reorder_applies_permutation() {
    let app = test_app();
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let (_, cat) = send(&app, "POST", "/api/categories", Some(json!({"name": name}))).await;
        ids.push(cat["id"].as_i64().unwrap());
    }

    // a -> 3, b -> 1, c -> 2
    let (status, _) = send(
        &app,
        "PUT",
        "/api/categories/order",
        Some(json!([
            {"id": ids[0], "order": 3},
            {"id": ids[1], "order": 1},
            {"id": ids[2], "order": 2},
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/categories", None).await;
    let ordered_ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ordered_ids, vec![ids[1], ids[2], ids[0]]);
}

#[tokio::test]
async fn bulk_reorder_rejects_duplicate_keys() {
    let app = test_app();
    let mut ids = Vec::new();
    for name in ["a", "b"] {
        let (_, cat) = send(&app, "POST", "/api/categories", Some(json!({"name": name}))).await;
        ids.push(cat["id"].as_i64().unwrap());
    }

    let (status, _) = send(
        &app,
        "PUT",
        "/api/categories/order",
        Some(json!([
            {"id": ids[0], "order": 1},
            {"id": ids[1], "order": 1},
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Prior ordering untouched.
    let (_, body) = send(&app, "GET", "/api/categories", None).await;
    let keys: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["order"].as_i64().unwrap())
        .collect();
    assert_eq!(keys, vec![1, 2]);
}

#[tokio::test]
async fn delete_category_cascades_to_sites() {
    let app = test_app();
    let (_, cat) = send(&app, "POST", "/api/categories", Some(json!({"name": "a"}))).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/sites",
        Some(json!({"name": "Example", "url": "https://example.com", "category_id": cat["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/categories?id={}", cat["id"]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, sites) = send(&app, "GET", "/api/sites", None).await;
    assert!(sites.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_category_is_404() {
    let app = test_app();
    let (status, _) = send(&app, "DELETE", "/api/categories?id=42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn site_crud_round_trip() {
    let app = test_app();
    let (status, site) = send(
        &app,
        "POST",
        "/api/sites",
        Some(json!({"name": "Example", "url": "https://example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(site["category_id"], Value::Null);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/sites",
        Some(json!({
            "id": site["id"],
            "name": "Example v2",
            "url": "https://example.org",
            "category_id": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, sites) = send(&app, "GET", "/api/sites", None).await;
    assert_eq!(sites[0]["name"], "Example v2");
    assert_eq!(sites[0]["url"], "https://example.org");

    let (status, _) = send(&app, "DELETE", &format!("/api/sites?id={}", site["id"]), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, sites) = send(&app, "GET", "/api/sites", None).await;
    assert!(sites.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn site_url_without_scheme_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/sites",
        Some(json!({"name": "bad", "url": "example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("url"));
}

#[tokio::test]
async fn title_for_missing_site_is_404() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/sites/title?id=7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
