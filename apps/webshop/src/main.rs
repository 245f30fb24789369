//! # Webshop Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Event Webshop                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Event pages (browser)                         │  │
//! │  │  • Product list        • Basket widget                           │  │
//! │  │  • Quantity form       • Admin product form                      │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                           fetch (JSON)                                 │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │  main.rs ────► Logging, config path                              │  │
//! │  │  lib.rs ─────► Database, state, axum server                      │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  webshop.db (basket_storage, WAL mode)                           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```text
//! webshop [path/to/webshop.toml]
//! ```
//! Without an argument, `WEBSHOP_CONFIG` or the platform config directory is used.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    webshop::init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WEBSHOP_CONFIG").ok())
        .map(PathBuf::from);

    match webshop::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Webshop stopped");
            ExitCode::FAILURE
        }
    }
}
