//! # Basket Summary
//!
//! Derived totals of a basket. Never stored, always recomputed.
//!
//! ```text
//! item_count = Σ amount
//! subtotal   = Σ amount × unit_cost
//! fee        = fee_rule.amount   if subtotal > 0
//!              0                 otherwise
//! total      = subtotal + fee
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Line;

// =============================================================================
// Fee Rule
// =============================================================================

/// Administration/transaction fee charged once per non-empty order.
///
/// ## Example
/// ```rust
/// use basket_core::{FeeRule, Money};
///
/// let rule = FeeRule::flat(Money::from_cents(35));
/// assert_eq!(rule.fee_for(Money::from_cents(1000)).cents(), 35);
/// assert!(rule.fee_for(Money::zero()).is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeRule {
    /// Flat surcharge, added only when the subtotal is positive.
    pub amount: Money,
}

impl FeeRule {
    /// A flat fee.
    pub const fn flat(amount: Money) -> Self {
        FeeRule { amount }
    }

    /// No fee at all.
    pub const fn none() -> Self {
        FeeRule {
            amount: Money::zero(),
        }
    }

    /// Whether the fee is charged on an order with this subtotal.
    pub const fn applies_to(&self, subtotal: Money) -> bool {
        subtotal.is_positive()
    }

    /// The fee charged on an order with this subtotal.
    pub const fn fee_for(&self, subtotal: Money) -> Money {
        if self.applies_to(subtotal) {
            self.amount
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Basket Summary
// =============================================================================

/// Totals shown under the basket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BasketSummary {
    /// Sum of all line amounts.
    pub item_count: u32,
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Administration/transaction fee.
    pub fee: Money,
    /// Subtotal plus fee.
    pub total: Money,
}

impl BasketSummary {
    /// Summary of an empty basket.
    pub const fn empty() -> Self {
        BasketSummary {
            item_count: 0,
            subtotal: Money::zero(),
            fee: Money::zero(),
            total: Money::zero(),
        }
    }
}

/// Computes the summary of a sequence of lines.
pub fn summarize<'a>(lines: impl IntoIterator<Item = &'a Line>, rule: &FeeRule) -> BasketSummary {
    let (item_count, subtotal) = lines
        .into_iter()
        .fold((0u32, Money::zero()), |(count, subtotal), line| {
            (count.saturating_add(line.amount), subtotal + line.line_total())
        });

    let fee = rule.fee_for(subtotal);

    BasketSummary {
        item_count,
        subtotal,
        fee,
        total: subtotal + fee,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
