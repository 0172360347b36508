//! Request handlers for the shelf server.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::config::ShelfConfig;
use crate::file::{FileStorage, PathResolver};
use crate::{Database, Result, ShelfError};

use super::error::ApiError;

/// Fallback content type for files whose real type is not allow-listed.
const OCTET_STREAM: &str = "application/octet-stream";

/// Shared application state.
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Physical byte storage.
    pub storage: FileStorage,
    /// Root folder request paths are served out of.
    pub base_folder: String,
    /// MIME types served with their real content type.
    pub allowed_types: HashSet<String>,
}

impl AppState {
    /// Create application state from a database, storage and shelf config.
    pub fn new(db: Arc<Database>, storage: FileStorage, config: &ShelfConfig) -> Self {
        Self {
            db,
            storage,
            base_folder: config.base_folder.clone(),
            allowed_types: config.allowed_types.iter().cloned().collect(),
        }
    }
}

/// Health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Fallback handler serving files out of the shelf's base folder.
///
/// `/foo.txt` maps to `public_html/foo.txt`, `/a/b/` to
/// `public_html/a/b/index.html`. Paths that don't resolve produce a plain
/// 404 so the redirect layer can still act on them.
pub async fn serve_shelf(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match shelf_response(&state, uri.path()).await {
        Ok(Some(response)) => response,
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Resolve a request path and build the file response.
///
/// Returns Ok(None) when no stored file matches the path.
async fn shelf_response(state: &AppState, raw_path: &str) -> Result<Option<Response>> {
    let mut path = match urlencoding::decode(raw_path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => return Ok(None),
    };

    if path.ends_with('/') {
        path.push_str("index.html");
    }

    let mut parts: Vec<&str> = vec![state.base_folder.as_str()];
    parts.extend(path.split('/').skip(1));

    let resolver = PathResolver::new(state.db.pool());
    let file = match resolver.resolve(&parts).await {
        Ok(file) => file,
        Err(ShelfError::NotFound(_)) | Err(ShelfError::InvalidPath(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    let content = match state.storage.load(&file.stored_name) {
        Ok(content) => content,
        Err(ShelfError::NotFound(_)) => {
            // Entry exists but its bytes are gone; treat as absent.
            tracing::warn!(
                stored_name = %file.stored_name,
                "file entry has no stored bytes"
            );
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let content_type = guess_content_type(file.effective_name(), &state.allowed_types);

    tracing::debug!(path = raw_path, content_type, "serving shelf file");

    Ok(Some(
        ([(header::CONTENT_TYPE, content_type)], content).into_response(),
    ))
}

/// Guess a content type from the filename, downgrading anything outside
/// the allow-list to application/octet-stream.
fn guess_content_type(filename: &str, allowed: &HashSet<String>) -> &'static str {
    match mime_guess::from_path(filename).first_raw() {
        Some(mime) if allowed.contains(mime) => mime,
        _ => OCTET_STREAM,
    }
}
