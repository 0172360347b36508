//! HTTP layer for fileshelf: the serving fallback, redirect handling and
//! the server itself.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use middleware::RedirectTable;
pub use router::create_router;
pub use server::WebServer;
