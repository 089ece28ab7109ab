use std::sync::Arc;

use tracing::info;

use dropslot::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging; a broken log file falls back to console only
    if let Err(e) = dropslot::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        let mut fallback = config.logging.clone();
        fallback.file.clear();
        let _ = dropslot::logging::init(&fallback);
    }

    info!("Dropslot - ephemeral file sharing");

    // An unreachable database is fatal; refuse to serve traffic
    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, Arc::new(db)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start web server: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Serving on {}:{} (base URL {})",
        config.server.host, config.server.port, config.server.base_url
    );

    if let Err(e) = server.run().await {
        tracing::error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
