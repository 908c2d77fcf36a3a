//! DSO Browser HTTP Server Binary
//!
//! Main entry point for the browser REST API. It loads configuration, opens
//! the catalogue, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! DSO_DB_PATH=data/DSO.db cargo run --bin dso-server
//! ```
//!
//! # Environment Variables
//!
//! - `DSO_CONFIG`: Path to a `browser.toml` (default: searched in the working directory)
//! - `DSO_DB_PATH`: SQLite catalogue path (default: data/DSO.db)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use dso_browser::db::{BrowserConfig, RepositoryFactory};
use dso_browser::http::{create_router, AppState};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting DSO Browser HTTP Server");

    let config = BrowserConfig::load().map_err(|e| anyhow::anyhow!(e))?;
    let filter_options = config.filter_options();

    // A missing or malformed catalogue keeps the server up; data endpoints
    // answer 503 with the reason until it is fixed and the server restarted.
    let state = match RepositoryFactory::from_config(&config) {
        Ok(repository) => {
            info!(
                "Catalogue opened from {}",
                config.database.path.display()
            );
            AppState::new(repository, filter_options)
        }
        Err(e) => {
            warn!("Catalogue unavailable: {}", e.session_message());
            AppState::unavailable(e, filter_options)
        }
    };

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
