use std::fs;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use tempfile::TempDir;
use tower::ServiceExt;

fn site() -> TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    fs::write(root.path().join("anim-bundle.js"), "window.ANIM_BUNDLE = {};\n").unwrap();
    fs::create_dir(root.path().join("anim")).unwrap();
    fs::write(root.path().join("anim").join("idle.json"), r#"{"frames":3}"#).unwrap();
    fs::create_dir(root.path().join("pages")).unwrap();
    fs::write(root.path().join("pages").join("index.html"), "<h1>battle test</h1>").unwrap();
    root
}

async fn send(root: &TempDir, method: Method, uri: &str) -> Response {
    let app = ddoo_devkit::server::router(root.path().to_path_buf());
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_dev_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "*");
    assert_eq!(headers["cache-control"], "no-store, no-cache, must-revalidate");
}

#[tokio::test]
async fn serves_files_with_content_type() {
    let root = site();
    let response = send(&root, Method::GET, "/anim-bundle.js").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/javascript; charset=utf-8");
    assert_dev_headers(&response);
    assert_eq!(body_text(response).await, "window.ANIM_BUNDLE = {};\n");
}

#[tokio::test]
async fn serves_nested_json() {
    let root = site();
    let response = send(&root, Method::GET, "/anim/idle.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_text(response).await, r#"{"frames":3}"#);
}

#[tokio::test]
async fn options_preflight_is_ok() {
    let root = site();
    let response = send(&root, Method::OPTIONS, "/anything").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_dev_headers(&response);
}

#[tokio::test]
async fn missing_file_is_404_with_headers() {
    let root = site();
    let response = send(&root, Method::GET, "/vfx/none.json").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_dev_headers(&response);
}

#[tokio::test]
async fn traversal_is_forbidden() {
    let root = site();
    let response = send(&root, Method::GET, "/anim/%2e%2e/%2e%2e/etc/passwd").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_escape_is_an_ordinary_missing_path() {
    let root = site();
    let response = send(&root, Method::GET, "/bad%zz").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_utf8_path_is_400() {
    let root = site();
    let response = send(&root, Method::GET, "/%FF.json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[cfg(unix)]
#[tokio::test]
async fn colon_in_file_name_is_served() {
    let root = site();
    fs::write(root.path().join("hit:1.json"), r#"{"frames":1}"#).unwrap();

    let response = send(&root, Method::GET, "/hit:1.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"frames":1}"#);
}

#[tokio::test]
async fn directory_without_slash_redirects() {
    let root = site();
    let response = send(&root, Method::GET, "/anim?v=2").await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/anim/?v=2");
}

#[tokio::test]
async fn directory_lists_entries() {
    let root = site();
    let response = send(&root, Method::GET, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    let html = body_text(response).await;
    assert!(html.contains("Directory listing for /"));
    assert!(html.contains("<a href=\"anim/\">anim/</a>"));
    assert!(html.contains("<a href=\"anim-bundle.js\">anim-bundle.js</a>"));
}

#[tokio::test]
async fn directory_index_html_is_served() {
    let root = site();
    let response = send(&root, Method::GET, "/pages/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>battle test</h1>");
}

#[tokio::test]
async fn unsupported_method_is_501() {
    let root = site();
    let response = send(&root, Method::DELETE, "/anim-bundle.js").await;

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert!(root.path().join("anim-bundle.js").exists());
}
