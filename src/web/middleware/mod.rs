//! Middleware for the shelf server.

pub mod redirects;
pub mod security;

pub use redirects::{redirect_fallback, Redirect, RedirectEntry, RedirectTable};
pub use security::security_headers;
