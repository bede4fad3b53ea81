use std::sync::Arc;

use tracing::{error, info};

use treehole::{Config, Database, FavoriteLimits, WebServer};

#[tokio::main]
async fn main() {
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = treehole::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        treehole::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Treehole favorites service");

    let db = match Database::open(&config.database).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };
    info!("Database ready ({} read replicas)", db.replica_count());

    let server = match WebServer::new(
        &config.server,
        db.clone(),
        FavoriteLimits::from(&config.favorites),
    ) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure web server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
    }

    db.close().await;
}
