//! Optional web UI served from disk.
//!
//! `index.html` in the configured static directory is served at `/`, and
//! everything else under that directory at `/static/`. Without a static
//! directory the root answers with a small built-in page.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::state::AppState;

const FALLBACK_PAGE: &str = "<h1>External Memory & State</h1><p>Service running.</p>";

/// Resolve a request path inside `root`, refusing anything that could escape it
fn resolve(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let relative = FsPath::new(requested);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

/// Serve `index.html` or the built-in page
pub async fn serve_index(State(state): State<AppState>) -> Response {
    let index = state.config.static_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => Html(FALLBACK_PAGE).into_response(),
    }
}

/// Serve a file from the static directory
pub async fn serve_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let Some(file) = resolve(&state.config.static_dir, &path) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    match tokio::fs::read(&file).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(&file)
                .first_or_octet_stream()
                .to_string();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CACHE_CONTROL, "public, max-age=60".to_string()),
                ],
                contents,
            )
                .into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}
