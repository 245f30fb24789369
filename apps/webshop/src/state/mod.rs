//! # State Module
//!
//! Shared application state for the webshop routes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      axum Router                                │   │
//! │  │  .with_state(Arc<AppState>)                                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┴────────┬──────────────────┐             │
//! │     ▼              ▼                  ▼                  ▼              │
//! │  ┌────────┐  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │Database│  │ BasketState  │  │ Encoders,    │  │TokenVerifier │      │
//! │  │ (pool) │  │ Mutex<       │  │ templates    │  │ (admin role) │      │
//! │  │        │  │  Presenter>  │  │ (read-only)  │  │              │      │
//! │  └────────┘  └──────────────┘  └──────────────┘  └──────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: internal connection pool                                  │
//! │  • BasketState: tokio Mutex, one event at a time                       │
//! │  • Everything else: read-only after startup                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod basket;

pub use basket::{BasketResponse, BasketState};

use basket_core::{FieldSchema, OrderEncoder, TemplateCatalog};
use basket_store::Database;

use crate::auth::TokenVerifier;
use crate::config::WebshopConfig;
use crate::error::StartupError;

/// Everything the routes share.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub basket: BasketState,
    pub quantity_encoder: OrderEncoder,
    pub schema: FieldSchema,
    pub templates: TemplateCatalog,
    pub verifier: TokenVerifier,
}

impl AppState {
    /// Builds the state from a validated configuration and an open database.
    ///
    /// Loads the configured basket once; later requests work on that snapshot.
    pub async fn new(db: Database, config: &WebshopConfig) -> Result<Self, StartupError> {
        let settings = config.presenter_settings()?;
        let basket = BasketState::load(&db, config.storage.basket_key.clone(), settings).await?;

        Ok(AppState {
            db,
            basket,
            quantity_encoder: config.quantity_encoder()?,
            schema: FieldSchema::product_form(),
            templates: config.templates.clone(),
            verifier: TokenVerifier::new(&config.auth),
        })
    }
}
