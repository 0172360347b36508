//! Security headers middleware.

use axum::{
    body::Body,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Security headers middleware.
///
/// This server exists to hand back user-uploaded bytes, so the headers
/// matter more than usual:
/// - X-Content-Type-Options: nosniff keeps browsers from reinterpreting
///   the downgraded application/octet-stream responses as markup
/// - Content-Security-Policy: sandbox neuters anything that does get
///   rendered
/// - X-Frame-Options: DENY
/// - Referrer-Policy: strict-origin-when-cross-origin
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("sandbox"),
    );

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
