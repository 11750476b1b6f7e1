mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use book_service::config::ErrorContract;
use book_service::services::InMemoryBookStore;
use book_service::{router, AppState};
use common::test_config;
use std::sync::Arc;
use tower::ServiceExt;

fn app(error_contract: ErrorContract) -> Router {
    router(AppState {
        config: test_config(error_contract),
        store: Arc::new(InMemoryBookStore::new()),
    })
}

fn post_form(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.into())
        .unwrap()
}

fn oversized_title() -> Vec<u8> {
    let mut body = b"title=".to_vec();
    body.resize(3 * 1024 * 1024, b'a');
    body
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn router_creates_book_from_json_number() {
    let response = app(ErrorContract::Legacy)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/books")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title":1984}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["title"], "1984");
    assert_eq!(body["commentCount"], 0);
}

#[tokio::test]
async fn router_answers_unknown_path_with_404() {
    let response = app(ErrorContract::Legacy)
        .oneshot(Request::builder().uri("/api/authors").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_body_is_413_under_conventional_contract() {
    let response = app(ErrorContract::Conventional)
        .oneshot(post_form("/api/books", oversized_title()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn oversized_body_is_missing_field_under_legacy_contract() {
    let response = app(ErrorContract::Legacy)
        .oneshot(post_form("/api/books", oversized_title()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "missing required field title");
}
