//! Web server for fileshelf.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::file::FileStorage;
use crate::{Database, Result, ShelfError};

use super::handlers::AppState;
use super::middleware::RedirectTable;
use super::router::create_router;

/// The shelf HTTP server.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Redirect table.
    redirects: Arc<RedirectTable>,
}

impl WebServer {
    /// Create a new web server from configuration and an opened database.
    ///
    /// Initializes file storage and, when configured, loads and validates
    /// the redirect table.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|_| {
                ShelfError::Config(format!(
                    "invalid server address {}:{}",
                    config.server.host, config.server.port
                ))
            })?;

        let storage = FileStorage::new(&config.shelf.storage_path)?;
        tracing::info!("File storage initialized at: {}", config.shelf.storage_path);

        let redirects = if config.redirects.path.is_empty() {
            RedirectTable::empty()
        } else {
            let table = RedirectTable::load(&config.redirects.path, config.redirects.strict)?;
            tracing::info!(
                rules = table.len(),
                "Redirect table loaded from {}",
                config.redirects.path
            );
            table
        };

        let app_state = AppState::new(Arc::new(db), storage, &config.shelf);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            redirects: Arc::new(redirects),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> axum::Router {
        create_router(self.app_state.clone(), self.redirects.clone())
            .layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Shelf server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests binding port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Shelf server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
