//! Static-file dev server.
//!
//! Serves the game directory over HTTP for desktop and phone testing on the
//! local network. Every response allows any origin and disables caching, so
//! edited assets show up on the next reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::config::ServeConfig;
use crate::error::{DevkitError, Result};

mod files;
mod mime;
mod util;

use files::ResolveError;

/// Headers added to every response.
pub const DEV_HEADERS: [(&str, &str); 4] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "*"),
    ("cache-control", "no-store, no-cache, must-revalidate"),
];

struct ServeState {
    root: PathBuf,
}

/// Build the router serving `root`.
pub fn router(root: PathBuf) -> Router {
    let state = Arc::new(ServeState { root });
    Router::new()
        .fallback(handle)
        .layer(middleware::map_response(add_dev_headers))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Bind `config.host:config.port` and serve `config.root` until Ctrl+C.
pub async fn serve(config: &ServeConfig) -> Result<()> {
    if !config.root.is_dir() {
        return Err(DevkitError::missing_directory(&config.root));
    }
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .map_err(|source| DevkitError::Serve {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, root = %config.root.display(), "dev server listening");

    axum::serve(listener, router(config.root.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| DevkitError::Serve { addr, source })?;

    tracing::info!("dev server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C, stop the process to exit");
        std::future::pending::<()>().await;
    }
}

// ── Middleware ────────────────────────────────────────────────────────

async fn add_dev_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in DEV_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    response
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(%method, %path, status = response.status().as_u16(), "request");
    response
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn handle(State(state): State<Arc<ServeState>>, method: Method, uri: Uri) -> Response {
    match method {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::GET | Method::HEAD => serve_path(&state.root, &uri).await,
        _ => error_page(StatusCode::NOT_IMPLEMENTED, "Unsupported method"),
    }
}

async fn serve_path(root: &Path, uri: &Uri) -> Response {
    let url_path = uri.path();
    let fs_path = match files::resolve(root, url_path) {
        Ok(p) => p,
        Err(ResolveError::BadRequest) => return error_page(StatusCode::BAD_REQUEST, "Bad path encoding"),
        Err(ResolveError::Forbidden) => return error_page(StatusCode::FORBIDDEN, "Forbidden"),
    };

    let meta = match tokio::fs::metadata(&fs_path).await {
        Ok(m) => m,
        Err(_) => return error_page(StatusCode::NOT_FOUND, "File not found"),
    };

    if !meta.is_dir() {
        return serve_file(&fs_path).await;
    }

    if !url_path.ends_with('/') {
        let mut location = format!("{url_path}/");
        if let Some(query) = uri.query() {
            location.push('?');
            location.push_str(query);
        }
        return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
    }

    let index = fs_path.join("index.html");
    if index.is_file() {
        return serve_file(&index).await;
    }

    match files::render_listing(&fs_path, url_path).await {
        Ok(html) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(_) => error_page(StatusCode::NOT_FOUND, "No permission to list directory"),
    }
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, mime::content_type(path))],
            Body::from(bytes),
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error_page(StatusCode::NOT_FOUND, "File not found")
        }
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "cannot read file");
            error_page(StatusCode::FORBIDDEN, "Cannot read file")
        }
    }
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let code = status.as_u16();
    let body = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Error {code}</title></head>\n\
         <body><h1>Error {code}</h1><p>{}</p></body></html>\n",
        util::html_escape(message)
    );
    (status, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response()
}
