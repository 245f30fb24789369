//! # Routes
//!
//! HTTP surface of the webshop. Each handler turns a request into one
//! presenter event (or a read) and answers JSON.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Basket (basket.rs)                                                    │
//! │  GET    /basket                         current view                   │
//! │  POST   /basket/items                   add or increment an offer      │
//! │  POST   /basket/items/{key}/increase    "+"                            │
//! │  POST   /basket/items/{key}/decrease    "−" (removes at 1)             │
//! │  DELETE /basket/items/{key}             remove the row                 │
//! │  DELETE /basket                         empty the basket               │
//! │                                                                         │
//! │  Checkout, mode A (checkout.rs)                                        │
//! │  POST   /checkout                       order fields, basket kept      │
//! │  POST   /checkout/confirm               server accepted: clear         │
//! │  POST   /checkout/failed                server rejected: keep          │
//! │                                                                         │
//! │  Quantity form, mode B (quantities.rs)                                 │
//! │  POST   /orders/quantities              order fields from inputs       │
//! │                                                                         │
//! │  GET    /templates/{name}               product form preset            │
//! │  POST   /admin/products/created         admin: feed a new product      │
//! │  GET    /health                         liveness + storage check       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod admin;
pub mod basket;
pub mod checkout;
pub mod health;
pub mod quantities;
pub mod templates;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Builds the webshop router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/basket", get(basket::get_basket).delete(basket::empty_basket))
        .route("/basket/items", post(basket::add_item))
        .route("/basket/items/{key}", delete(basket::remove_item))
        .route("/basket/items/{key}/increase", post(basket::increase_item))
        .route("/basket/items/{key}/decrease", post(basket::decrease_item))
        .route("/checkout", post(checkout::submit))
        .route("/checkout/confirm", post(checkout::confirm))
        .route("/checkout/failed", post(checkout::failed))
        .route("/orders/quantities", post(quantities::encode_quantities))
        .route("/templates/{name}", get(templates::get_template))
        .route("/admin/products/created", post(admin::product_created))
        .route("/health", get(health::health))
        .with_state(state)
}
