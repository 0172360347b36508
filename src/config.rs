//! Configuration module for fileshelf.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShelfError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/fileshelf.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Shelf (file serving) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ShelfConfig {
    /// Path to the physical file storage directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Name of the root folder request paths are served out of.
    #[serde(default = "default_base_folder")]
    pub base_folder: String,
    /// MIME types that may be served with their real content type.
    ///
    /// Anything else is downgraded to application/octet-stream. Uploaded
    /// HTML, SVG or XML served as-is would be a stored XSS vector.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

fn default_storage_path() -> String {
    "data/files".to_string()
}

fn default_base_folder() -> String {
    "public_html".to_string()
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "text/plain".to_string(),
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
    ]
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            base_folder: default_base_folder(),
            allowed_types: default_allowed_types(),
        }
    }
}

/// Redirect table configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectsConfig {
    /// Path to the redirect table TOML file. Empty disables redirects.
    #[serde(default)]
    pub path: String,
    /// Whether validation errors in the table abort startup.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            strict: default_strict(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File serving settings.
    #[serde(default)]
    pub shelf: ShelfConfig,
    /// Redirect table settings.
    #[serde(default)]
    pub redirects: RedirectsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ShelfError::Config(e.to_string()))
    }
}
