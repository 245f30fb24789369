//! # basket-store: Basket Persistence for the Event Webshop
//!
//! Stores each named basket as one serialized record in SQLite, using sqlx
//! for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Basket Persistence Flow                            │
//! │                                                                         │
//! │  Route handler (POST /basket/items)                                    │
//! │       │  presenter says: persist                                        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  basket-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (basket.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │                │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ load / save    │    │ 001_basket_  │  │   │
//! │  │   │               │    │ corrupt → empty│    │   storage    │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   basket_storage(storage_key, payload, updated_at)              │   │
//! │  │   "shoppingBasket" → [{"key":"P1","amount":2,...}]              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use basket_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("webshop.db")).await?;
//!
//! let mut basket = db.baskets().load("shoppingBasket").await?;
//! basket.add_or_increment(&offer)?;
//! db.baskets().save("shoppingBasket", &basket).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};

pub use repository::basket::BasketRepository;
