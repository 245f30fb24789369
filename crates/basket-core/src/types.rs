//! # Domain Types
//!
//! Core value types of the basket.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductOffer   │   │      Line       │   │  CustomerLimit  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  key            │──►│  key            │   │  Unlimited      │       │
//! │  │  title          │   │  title          │   │  AtMost(n)      │       │
//! │  │  unit_cost      │   │  unit_cost      │   └─────────────────┘       │
//! │  │  limit          │   │  amount (≥ 1)   │                             │
//! │  └─────────────────┘   │  customer_limit │                             │
//! │   what an "add"        └─────────────────┘                             │
//! │   button carries        one basket entry                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Customer Limit
// =============================================================================

/// Maximum amount of one product a single customer may hold.
///
/// Serialized as an optional number: `null` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum CustomerLimit {
    /// No per-customer cap.
    #[default]
    Unlimited,
    /// At most this many units.
    AtMost(u32),
}

impl CustomerLimit {
    /// Returns true when a line holding `amount` units may not grow further.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::CustomerLimit;
    ///
    /// assert!(CustomerLimit::AtMost(2).is_reached(2));
    /// assert!(!CustomerLimit::AtMost(2).is_reached(1));
    /// assert!(CustomerLimit::AtMost(0).is_reached(0));
    /// assert!(!CustomerLimit::Unlimited.is_reached(u32::MAX - 1));
    /// ```
    pub const fn is_reached(&self, amount: u32) -> bool {
        match self {
            CustomerLimit::Unlimited => amount == u32::MAX,
            CustomerLimit::AtMost(max) => amount >= *max,
        }
    }

    /// Returns true when holding `amount` units is allowed.
    pub const fn permits(&self, amount: u32) -> bool {
        match self {
            CustomerLimit::Unlimited => true,
            CustomerLimit::AtMost(max) => amount <= *max,
        }
    }

    /// Returns the cap, if there is one.
    pub const fn max(&self) -> Option<u32> {
        match self {
            CustomerLimit::Unlimited => None,
            CustomerLimit::AtMost(max) => Some(*max),
        }
    }
}

impl From<Option<u32>> for CustomerLimit {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(max) => CustomerLimit::AtMost(max),
            None => CustomerLimit::Unlimited,
        }
    }
}

impl From<CustomerLimit> for Option<u32> {
    fn from(limit: CustomerLimit) -> Self {
        limit.max()
    }
}

// =============================================================================
// Product Offer
// =============================================================================

/// The data an "add to basket" control carries for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductOffer {
    /// Stable product identifier.
    pub key: String,

    /// Display label.
    pub title: String,

    /// Price of one unit.
    pub unit_cost: Money,

    /// Per-customer cap for this product.
    #[serde(default)]
    #[ts(as = "Option<u32>")]
    pub limit: CustomerLimit,
}

impl ProductOffer {
    /// Creates an offer.
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        unit_cost: Money,
        limit: CustomerLimit,
    ) -> Self {
        ProductOffer {
            key: key.into(),
            title: title.into(),
            unit_cost,
            limit,
        }
    }
}

// =============================================================================
// Line
// =============================================================================

/// One basket entry.
///
/// ## Persisted Shape
/// ```json
/// { "key": "P1", "title": "Ticket A", "unitCost": 1000, "amount": 2, "customerLimit": 4 }
/// ```
/// `unitCost` is in cents. `customerLimit` is omitted when unlimited, so a
/// record written without it reads back as unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Line {
    /// Stable product identifier, unique within a basket.
    pub key: String,

    /// Display label.
    pub title: String,

    /// Price of one unit.
    pub unit_cost: Money,

    /// Number of units, always at least 1.
    pub amount: u32,

    /// Cap remembered from the last add, used by later increments.
    #[serde(default, skip_serializing_if = "is_unlimited")]
    #[ts(as = "Option<u32>")]
    pub customer_limit: CustomerLimit,
}

fn is_unlimited(limit: &CustomerLimit) -> bool {
    *limit == CustomerLimit::Unlimited
}

impl Line {
    /// Creates a line holding one unit of the offered product.
    pub fn from_offer(offer: &ProductOffer) -> Self {
        Line {
            key: offer.key.clone(),
            title: offer.title.clone(),
            unit_cost: offer.unit_cost,
            amount: 1,
            customer_limit: offer.limit,
        }
    }

    /// Unit cost × amount, exact.
    pub fn line_total(&self) -> Money {
        self.unit_cost.multiply_quantity(self.amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
