//! Navdeck server binary.
//!
//! # Environment variables
//!
//! - `PORT`: HTTP port (default: 8080)
//! - `NAVDECK_DB`: SQLite database path (default: navdeck.db)
//! - `NAVDECK_WEB`: static front-end directory (default: web)
//! - `RUST_LOG`: log filter (default: info)

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use navdeck_engine::Directory;
use navdeck_server::{AppState, router, seed};
use navdeck_storage::SqliteStore;

const TITLE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = std::env::var("NAVDECK_DB").unwrap_or_else(|_| "navdeck.db".to_string());
    let web_dir = std::env::var("NAVDECK_WEB").unwrap_or_else(|_| "web".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .context("PORT must be a number")?;

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open database at {db_path}"))?;
    let mut directory = Directory::new(store);
    seed::seed_if_empty(&mut directory).context("failed to seed demo data")?;

    let client = reqwest::Client::builder()
        .timeout(TITLE_FETCH_TIMEOUT)
        .build()
        .context("failed to build http client")?;

    let app = router(AppState::new(directory, client))
        .fallback_service(ServeDir::new(&web_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, db = %db_path, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutting down");
}
