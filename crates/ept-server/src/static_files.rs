// Static asset serving for every path that is not an API route.

use std::path::{Path, PathBuf};

use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::debug;

const INDEX_FILE: &str = "index.html";

/// Map a request path onto a file below `root`.
///
/// An empty path or one ending in `/` maps to `index.html`. Returns `None`
/// for any segment that could step outside `root`.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();

    for segment in request_path.split('/').filter(|s| !s.is_empty()) {
        if segment == "."
            || segment == ".."
            || segment.contains('\\')
            || segment.contains(':')
            || segment.contains('\0')
        {
            return None;
        }
        path.push(segment);
    }

    if request_path.is_empty() || request_path.ends_with('/') {
        path.push(INDEX_FILE);
    }
    Some(path)
}

/// Content-Type header value for a file, by extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Serve the file `uri` names from `root`. GET and HEAD only.
pub async fn serve(root: &Path, method: Method, uri: &Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method not allowed",
        )
            .into_response();
    }

    let Some(mut path) = resolve(root, uri.path()) else {
        debug!(path = uri.path(), "rejected static path");
        return not_found();
    };

    if tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        path.push(INDEX_FILE);
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(e) => {
            debug!(path = %path.display(), "static file miss: {e}");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_resolves_to_index() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve(root, "/"), Some(root.join("index.html")));
        assert_eq!(resolve(root, ""), Some(root.join("index.html")));
    }

    #[test]
    fn nested_paths_resolve_below_root() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve(root, "/css/site.css"), Some(root.join("css").join("site.css")));
        assert_eq!(resolve(root, "/docs/"), Some(root.join("docs").join("index.html")));
        assert_eq!(resolve(root, "//app.js"), Some(root.join("app.js")));
    }

    #[test]
    fn traversal_segments_are_rejected() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve(root, "/../secret"), None);
        assert_eq!(resolve(root, "/css/../../etc/passwd"), None);
        assert_eq!(resolve(root, "/./index.html"), None);
        assert_eq!(resolve(root, "/..\\windows"), None);
        assert_eq!(resolve(root, "/C:/boot.ini"), None);
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("APP.JS")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(Path::new("styles.css")), "text/css; charset=utf-8");
        assert_eq!(content_type(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("data.bin")), "application/octet-stream");
        assert_eq!(content_type(Path::new("LICENSE")), "application/octet-stream");
    }
}
