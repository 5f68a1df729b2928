//! Static asset serving.
//!
//! Maps request paths onto files under the static root. `/` serves
//! `index.html`; anything missing or containing `..` is a plain 404.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::handlers::AppState;

/// Content type for a file, by extension
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Resolve a request path under `root`
///
/// Returns `None` for any path containing `..`.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    if request_path.contains("..") {
        return None;
    }

    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() { "index.html" } else { relative };
    Some(root.join(relative))
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "Not found",
    )
        .into_response()
}

/// Fallback handler: serve a file from the static root
pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(path) = resolve(&state.static_root, uri.path()) else {
        debug!("Rejected path {}", uri.path());
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(e) => {
            debug!("Static file {} unavailable: {}", path.display(), e);
            not_found()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("index.html")), "text/html");
        assert_eq!(content_type(Path::new("app.js")), "text/javascript");
        assert_eq!(content_type(Path::new("style.css")), "text/css");
        assert_eq!(content_type(Path::new("logo.PNG")), "image/png");
        assert_eq!(content_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(content_type(Path::new("icon.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("data.bin")), "application/octet-stream");
        assert_eq!(content_type(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_resolve() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve(root, "/"), Some(PathBuf::from("/srv/public/index.html")));
        assert_eq!(resolve(root, "/js/app.js"), Some(PathBuf::from("/srv/public/js/app.js")));
        assert_eq!(resolve(root, "/../secret"), None);
        assert_eq!(resolve(root, "/a/..b"), None);
    }
}
