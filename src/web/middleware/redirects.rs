//! Redirect fallback middleware.
//!
//! A table of `source -> (target, status)` rules applied to responses that
//! would otherwise be 404. Anything that resolved normally is left alone,
//! so a redirect can never shadow a live file.
//!
//! The table is a TOML file of `[[redirect]]` entries:
//!
//! ```toml
//! [[redirect]]
//! source = "/old-page"
//! target = "/new-page"
//! status = 301          # optional, defaults to 301
//!
//! [[redirect]]
//! source = "/retired"   # no target: answers 410 Gone
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::{Result, ShelfError};

/// One redirect rule as written in the table file.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectEntry {
    /// Source path or absolute URI to match.
    pub source: String,
    /// Redirect target. Empty means the resource is gone (410).
    #[serde(default)]
    pub target: String,
    /// Response status. Defaults to 301 when a target is present.
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct RedirectDocument {
    #[serde(default, rename = "redirect")]
    redirects: Vec<RedirectEntry>,
}

/// A validated redirect.
#[derive(Debug, Clone)]
pub struct Redirect {
    /// Source path or absolute URI.
    pub source: String,
    /// Target location (None for 410 Gone).
    pub target: Option<String>,
    /// Response status.
    pub status: StatusCode,
}

/// Validated redirect lookup table.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    by_source: HashMap<String, Redirect>,
}

impl RedirectTable {
    /// An empty table. The middleware becomes a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and validate a redirect table from a TOML file.
    pub fn load(path: impl AsRef<Path>, strict: bool) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: RedirectDocument =
            toml::from_str(&content).map_err(|e| ShelfError::Redirects(e.to_string()))?;
        Self::from_entries(document.redirects, strict)
    }

    /// Build a table from entries, validating as the original rules did:
    /// missing target means 410, status must be 3xx or 410, duplicate
    /// sources warn (last one wins), circular definitions are errors.
    ///
    /// When `strict` is false, errors are logged instead of returned.
    pub fn from_entries(entries: Vec<RedirectEntry>, strict: bool) -> Result<Self> {
        let mut errors: Vec<String> = Vec::new();
        let mut by_source: HashMap<String, Redirect> = HashMap::new();

        for entry in entries {
            let source = entry.source.trim().to_string();
            let target = entry.target.trim().to_string();

            let (target, status_code) = if target.is_empty() {
                (None, 410)
            } else {
                (Some(target), entry.status.unwrap_or(301))
            };

            if !(300..400).contains(&status_code) && status_code != 410 {
                errors.push(format!(
                    "{source}: status {status_code} is not a 3xx or 410"
                ));
                continue;
            }

            let status = match StatusCode::from_u16(status_code) {
                Ok(status) => status,
                Err(_) => {
                    errors.push(format!("{source}: invalid status {status_code}"));
                    continue;
                }
            };

            if by_source.contains_key(&source) {
                warn!(source = %source, "duplicate redirect declaration, keeping the last one");
            }

            by_source.insert(
                source.clone(),
                Redirect {
                    source,
                    target,
                    status,
                },
            );
        }

        for redirect in by_source.values() {
            if let Some(target) = &redirect.target {
                if *target == redirect.source || by_source.contains_key(target) {
                    errors.push(format!(
                        "circular redirect: {} => {}",
                        redirect.source, target
                    ));
                }
            }
        }

        if !errors.is_empty() {
            if strict {
                return Err(ShelfError::Redirects(errors.join("; ")));
            }
            for error in &errors {
                warn!("redirect table: {}", error);
            }
        }

        Ok(Self { by_source })
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    /// Find a redirect for a request, preferring an absolute-URI match
    /// over a bare path match.
    pub fn lookup(&self, full_uri: Option<&str>, path: &str) -> Option<&Redirect> {
        full_uri
            .and_then(|uri| self.by_source.get(uri))
            .or_else(|| self.by_source.get(path))
    }
}

/// Middleware applying the redirect table to 404 responses.
pub async fn redirect_fallback(
    table: Arc<RedirectTable>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if table.is_empty() {
        return next.run(req).await;
    }

    let path = req.uri().path().to_string();
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = next.run(req).await;
    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }

    let full_uri = host.map(|host| format!("http://{host}{path_and_query}"));
    match table.lookup(full_uri.as_deref(), &path) {
        Some(redirect) => redirect_response(redirect),
        None => response,
    }
}

/// Build the response for a matched redirect.
fn redirect_response(redirect: &Redirect) -> Response {
    let mut builder = Response::builder().status(redirect.status);
    if let Some(target) = &redirect.target {
        builder = builder.header(header::LOCATION, target);
    }
    builder
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::util::ServiceExt;

    fn entry(source: &str, target: &str, status: Option<u16>) -> RedirectEntry {
        RedirectEntry {
            source: source.to_string(),
            target: target.to_string(),
            status,
        }
    }

    #[test]
    fn test_default_status_is_301() {
        let table =
            RedirectTable::from_entries(vec![entry("/old", "/new", None)], true).unwrap();

        let redirect = table.lookup(None, "/old").unwrap();
        assert_eq!(redirect.status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(redirect.target.as_deref(), Some("/new"));
    }

    #[test]
    fn test_missing_target_is_gone() {
        let table = RedirectTable::from_entries(vec![entry("/retired", "", None)], true).unwrap();

        let redirect = table.lookup(None, "/retired").unwrap();
        assert_eq!(redirect.status, StatusCode::GONE);
        assert!(redirect.target.is_none());
    }

    #[test]
    fn test_non_3xx_status_rejected() {
        let result =
            RedirectTable::from_entries(vec![entry("/old", "/new", Some(200))], true);
        assert!(matches!(result, Err(ShelfError::Redirects(_))));
    }

    #[test]
    fn test_non_3xx_status_tolerated_when_lenient() {
        let table =
            RedirectTable::from_entries(vec![entry("/old", "/new", Some(200))], false).unwrap();
        // The bad rule is dropped, not kept
        assert!(table.is_empty());
    }

    #[test]
    fn test_circular_redirect_rejected() {
        let result = RedirectTable::from_entries(
            vec![entry("/a", "/b", None), entry("/b", "/a", None)],
            true,
        );
        assert!(matches!(result, Err(ShelfError::Redirects(_))));
    }

    #[test]
    fn test_self_redirect_rejected() {
        let result = RedirectTable::from_entries(vec![entry("/a", "/a", None)], true);
        assert!(matches!(result, Err(ShelfError::Redirects(_))));
    }

    #[test]
    fn test_duplicate_source_last_wins() {
        let table = RedirectTable::from_entries(
            vec![entry("/dup", "/first", None), entry("/dup", "/second", None)],
            true,
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        let redirect = table.lookup(None, "/dup").unwrap();
        assert_eq!(redirect.target.as_deref(), Some("/second"));
    }

    #[test]
    fn test_lookup_prefers_full_uri() {
        let table = RedirectTable::from_entries(
            vec![
                entry("http://example.com/page", "/by-uri", None),
                entry("/page", "/by-path", None),
            ],
            true,
        )
        .unwrap();

        let redirect = table
            .lookup(Some("http://example.com/page"), "/page")
            .unwrap();
        assert_eq!(redirect.target.as_deref(), Some("/by-uri"));

        let redirect = table.lookup(Some("http://other.com/page"), "/page").unwrap();
        assert_eq!(redirect.target.as_deref(), Some("/by-path"));
    }

    #[test]
    fn test_load_from_toml() {
        let table = RedirectTable::from_entries(
            toml::from_str::<super::RedirectDocument>(
                r#"
[[redirect]]
source = "/old-page"
target = "/new-page"

[[redirect]]
source = "/retired"
"#,
            )
            .unwrap()
            .redirects,
            true,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup(None, "/retired").unwrap().status,
            StatusCode::GONE
        );
    }

    fn test_router(table: RedirectTable) -> Router {
        let table = Arc::new(table);
        Router::new()
            .route("/exists", get(|| async { "here" }))
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn(move |req, next| {
                let table = table.clone();
                redirect_fallback(table, req, next)
            }))
    }

    #[tokio::test]
    async fn test_middleware_rewrites_404() {
        let table =
            RedirectTable::from_entries(vec![entry("/old", "/new", Some(302))], true).unwrap();
        let app = test_router(table);

        let response = app
            .oneshot(Request::builder().uri("/old").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/new");
    }

    #[tokio::test]
    async fn test_middleware_leaves_200_alone() {
        let table =
            RedirectTable::from_entries(vec![entry("/exists", "/elsewhere", None)], true).unwrap();
        let app = test_router(table);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/exists")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_middleware_passes_unmatched_404_through() {
        let table =
            RedirectTable::from_entries(vec![entry("/old", "/new", None)], true).unwrap();
        let app = test_router(table);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/unrelated")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_middleware_gone() {
        let table = RedirectTable::from_entries(vec![entry("/retired", "", None)], true).unwrap();
        let app = test_router(table);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/retired")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GONE);
    }
}
