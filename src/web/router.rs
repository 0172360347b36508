//! Router configuration for the shelf server.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, serve_shelf, AppState};
use super::middleware::{redirect_fallback, security_headers, RedirectTable};

/// Create the main router.
///
/// Everything that isn't the health check falls through to the shelf
/// serving handler; 404s from there are then offered to the redirect
/// table.
pub fn create_router(app_state: Arc<AppState>, redirects: Arc<RedirectTable>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .fallback(serve_shelf)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(move |req, next| {
                    let table = redirects.clone();
                    redirect_fallback(table, req, next)
                })),
        )
        .with_state(app_state)
}
