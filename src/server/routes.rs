use crate::error::Error;
use crate::server::app::AppState;
use crate::state::edit::EditStore;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::path::Path;
use tracing::{debug, error, info, warn};

const ALLOW_ORIGIN: (header::HeaderName, &str) = (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");

/// `POST /api/save`: fold the posted store into the pages on disk
pub async fn save(State(state): State<AppState>, body: Bytes) -> Response {
    let store: EditStore = match serde_json::from_slice(&body) {
        Ok(store) => store,
        Err(e) => {
            let e = Error::from(e);
            warn!("rejected save: {e}");
            return save_failed(&e);
        }
    };

    let _guard = state.save_lock.lock().await;
    match state.site.apply(&store).await {
        Ok(report) => {
            info!(
                written = report.written.len(),
                unchanged = report.unchanged.len(),
                "save complete"
            );
            (StatusCode::OK, [ALLOW_ORIGIN], Json(json!({ "ok": true }))).into_response()
        }
        Err(e) => {
            error!("save failed: {e}");
            save_failed(&e)
        }
    }
}

fn save_failed(e: &Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [ALLOW_ORIGIN],
        Json(json!({ "ok": false, "error": e.to_string() })),
    )
        .into_response()
}

/// `OPTIONS /api/save`
pub async fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            ALLOW_ORIGIN,
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

/// Everything else is a file under the site root
pub async fn static_file(State(state): State<AppState>, uri: Uri) -> Response {
    let path = match state.site.resolve(uri.path()) {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}");
            return StatusCode::FORBIDDEN.into_response();
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(e) => {
            debug!(path = %path.display(), "not served: {e}");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Content type by file extension
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
