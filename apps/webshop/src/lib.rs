//! # Webshop Library
//!
//! HTTP adapter of the event webshop basket.
//! Configures logging, opens the basket store and serves the routes.
//!
//! ## Module Organization
//! ```text
//! webshop/
//! ├── lib.rs          ◄─── You are here (startup & serve)
//! ├── config.rs       ◄─── webshop.toml + WEBSHOP_* overrides
//! ├── auth.rs         ◄─── Identity token → Role
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   └── basket.rs   ◄─── Presenter + reaction handling
//! ├── routes/
//! │   ├── mod.rs      ◄─── build_router
//! │   ├── basket.rs   ◄─── Basket controls
//! │   ├── checkout.rs ◄─── Mode A submission
//! │   ├── quantities.rs ◄─ Mode B submission
//! │   ├── templates.rs ◄── Product form presets
//! │   ├── admin.rs    ◄─── Created-product feed
//! │   └── health.rs   ◄─── Health check
//! └── error.rs        ◄─── API error type
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use basket_store::Database;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::WebshopConfig;
use error::StartupError;
use state::AppState;

/// Runs the webshop until a shutdown signal arrives.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Webshop Startup                                   │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → webshop.toml → WEBSHOP_* → validate                    │
/// │                                                                         │
/// │  2. Determine Database Path ──────────────────────────────────────────► │
/// │     • [storage] database_path, or the platform data directory           │
/// │     • [storage] pool size and connect timeout                           │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Initialize State ─────────────────────────────────────────────────► │
/// │     • Load the configured basket once                                   │
/// │     • Build encoders, template catalog, token verifier                  │
/// │                                                                         │
/// │  5. Serve ────────────────────────────────────────────────────────────► │
/// │     • Bind [server] host:port                                           │
/// │     • Graceful shutdown on Ctrl+C / SIGTERM                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> Result<(), StartupError> {
    info!("Starting event webshop");

    let config = WebshopConfig::load(config_path)?;

    let db_config = config.db_config()?;
    info!(
        db_path = ?db_config.database_path,
        max_connections = db_config.max_connections,
        "Database path determined"
    );

    let db = Database::new(db_config).await?;
    info!("Database connected and migrations applied");

    let state = Arc::new(AppState::new(db.clone(), &config).await?);
    let app = routes::build_router(state);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "Webshop listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Webshop shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=basket_store=trace` - Show trace for the store only
/// - Default: INFO, DEBUG for the webshop crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,webshop=debug,basket_store=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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
