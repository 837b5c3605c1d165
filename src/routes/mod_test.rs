use std::path::PathBuf;

use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt;

use super::*;
use crate::state::test_helpers::test_app_state;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Fresh site directory with an index page, unique per test.
fn site_fixture(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("marmalade-site-{name}-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("work")).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>Nuclear Marmalade</h1>").unwrap();
    std::fs::write(dir.join("work").join("index.html"), "<h1>Case studies</h1>").unwrap();
    dir
}

async fn text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn healthz_is_ok() {
    let response = app(test_app_state()).oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_rejects_other_methods() {
    for method in ["GET", "PUT", "DELETE"] {
        let request = Request::builder().method(method).uri("/api/chat").body(Body::empty()).unwrap();
        let response = app(test_app_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
    }
}

#[tokio::test]
async fn serves_site_index() {
    let state = AppState { site_dir: site_fixture("index"), ..test_app_state() };
    let response = app(state).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Nuclear Marmalade"));
}

#[tokio::test]
async fn directories_resolve_to_index_html() {
    let state = AppState { site_dir: site_fixture("dirs"), ..test_app_state() };
    let response = app(state).oneshot(get("/work/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Case studies"));
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let state = AppState { site_dir: site_fixture("missing"), ..test_app_state() };
    let response = app(state).oneshot(get("/nope.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
