use tracing::info;

use fileshelf::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = fileshelf::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        fileshelf::logging::init_console_only(&config.logging.level);
    }

    info!("fileshelf - database-backed file server");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to set up server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
