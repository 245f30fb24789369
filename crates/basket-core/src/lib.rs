//! # basket-core: Pure Basket Logic for the Event Webshop
//!
//! This crate holds the basket/order-assembly logic of the event webshop:
//! state transitions, customer limits, totals, order encoding and the
//! presenter that ties them to page events. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Event Webshop Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Event pages (browser)                        │   │
//! │  │    Add buttons ──► Basket table ──► Order form ──► Checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    webshop (axum routes)                        │   │
//! │  │    /basket, /checkout, /orders/quantities, /templates           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │  basket  │ │ encoder  │ │    presenter     │  │   │
//! │  │   │  Money   │ │  Basket  │ │ mode A/B │ │ events ► view    │  │   │
//! │  │   │ Currency │ │  Line    │ │ FieldSch.│ │ toasts           │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  basket-store (persistence)                     │   │
//! │  │           one JSON record per basket key, in SQLite             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in cents and its display format
//! - [`types`] - Product offers, lines, customer limits
//! - [`basket`] - The basket and its transitions
//! - [`summary`] - Item count, subtotal, fee, total
//! - [`encoder`] - Basket or quantity inputs → indexed form fields
//! - [`quantity`] - Per-row quantity inputs (ordering without a basket)
//! - [`presenter`] - Page events → transitions → view + notifications
//! - [`template`] - Product form templates
//! - [`auth`] - Caller roles
//! - [`validation`] - Input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::{Basket, CustomerLimit, FeeRule, Money, OrderEncoder, ProductOffer};
//!
//! let mut basket = Basket::new();
//! let ticket = ProductOffer::new("P1", "Ticket A", Money::from_cents(1000), CustomerLimit::AtMost(2));
//!
//! basket.add_or_increment(&ticket).unwrap();
//! basket.add_or_increment(&ticket).unwrap();
//! assert!(basket.add_or_increment(&ticket).is_err());
//!
//! let summary = basket.summarize(&FeeRule::flat(Money::from_cents(35)));
//! assert_eq!(summary.total.cents(), 2035);
//!
//! let fields = OrderEncoder::checkout().encode_basket(&basket);
//! assert_eq!(fields[0].name, "products[0].key");
//! assert_eq!(fields[1].value, "2");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod basket;
pub mod encoder;
pub mod error;
pub mod money;
pub mod presenter;
pub mod quantity;
pub mod summary;
pub mod template;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::Role;
pub use basket::{Basket, Decremented};
pub use encoder::{Expansion, FieldScheme, FormField, OrderEncoder, OrderEntry};
pub use error::{
    AccessError, BasketError, BasketResult, CoreError, CoreResult, TemplateError, ValidationError,
};
pub use money::{CurrencyFormat, Money};
pub use presenter::{BasketEvent, BasketPresenter, BasketView, PresenterSettings, Reaction};
pub use quantity::QuantityForm;
pub use summary::{BasketSummary, FeeRule};
pub use template::{FieldSchema, ProductForm, TemplateCatalog};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key of the webshop basket.
pub const DEFAULT_BASKET_KEY: &str = "shoppingBasket";

/// Default administration fee per non-empty order, in cents (€ 0,35).
pub const DEFAULT_TRANSACTION_FEE_CENTS: i64 = 35;

/// Maximum length of a product key.
pub const MAX_KEY_LENGTH: usize = 100;

/// Maximum length of a product title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Highest accepted unit cost, in cents (€ 1.000.000,00).
pub const MAX_UNIT_COST_CENTS: i64 = 100_000_000;

/// Highest amount one quantity input may request.
pub const MAX_REQUESTED_AMOUNT: u32 = 100;

/// Most units a single quantity-form submission may request.
pub const MAX_ORDER_UNITS: u32 = 1_000;
