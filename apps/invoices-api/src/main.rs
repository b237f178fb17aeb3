//! # Invoices API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Client ───► HTTP (8080) ───► Entity services ───► SQLite              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use invoices_api::{router, AppConfig, AppState};
use invoices_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.log_filter);

    info!("Starting Invoices API server...");
    info!(
        addr = %config.bind_address(),
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    let db_config = DbConfig::new(config.database_path.clone())
        .max_connections(config.max_connections)
        .connect_timeout(config.connect_timeout());
    let db = Database::new(db_config)
        .await
        .context("Failed to open database")?;

    let app = router(AppState::new(db.clone()));

    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    info!(addr = %bind_addr, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
