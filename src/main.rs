//! Application entry point and server initialization
//!
//! Loads configuration, opens the embedded store and serves the router
//! until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use edgelink::config::Config;
use edgelink::database::{init_db, AppState, RedbStore};
use edgelink::route::create_app;

/// # Environment Variables
///
/// - `ADMIN_PATH` - Secret admin path, at least 64 characters
/// - `LANG` - `en` (default) or `zh`
/// - `SITE_TITLE`, `SITE_SUBTITLE` - Landing page branding
/// - `PORT` - Server port number (default: 8080)
/// - `DATABASE_URL` - Path to database file (default: "data.db")
/// - `RUST_LOG` - Log filter (default: "edgelink=debug,tower_http=debug")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("edgelink=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();
    if config.admin_path().is_err() {
        warn!("ADMIN_PATH is missing or shorter than 64 characters; every request will fail until it is set");
    }

    let db = init_db(&config.database_url)
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let port = config.port;
    let db_name = config.database_url.clone();
    let state = AppState::new(Arc::new(RedbStore::new(db)), config)
        .context("failed to compile page templates")?;

    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("server running at http://localhost:{}", port);
    info!("using database: {}", db_name);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM
///
/// Open connections are allowed to complete before the process exits, so no
/// write transaction is cut off halfway.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
