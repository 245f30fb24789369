//! # Basket Engine
//!
//! The basket and every transition it supports.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Transitions                                   │
//! │                                                                         │
//! │  Page Action             Engine Call               Basket Change        │
//! │  ───────────             ───────────               ─────────────        │
//! │                                                                         │
//! │  Click "add" ──────────► add_or_increment() ─────► push or amount + 1   │
//! │                                                                         │
//! │  Click "+" ────────────► increment() ────────────► amount + 1           │
//! │                                                                         │
//! │  Click "−" ────────────► decrement() ────────────► amount − 1 / remove  │
//! │                                                                         │
//! │  Remove ───────────────► remove() ───────────────► line gone (or no-op) │
//! │                                                                         │
//! │  Empty basket ─────────► clear() ────────────────► no lines             │
//! │                                                                         │
//! │  NOTE: every check runs before any mutation. A rejected transition     │
//! │        leaves the basket exactly as it was.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per key
//! - Every line holds at least one unit (a line reaching zero is removed)
//! - A line never holds more than its customer limit
//! - Lines keep their position until removed; re-adding appends at the end

use serde::{Deserialize, Serialize};

use crate::error::{BasketError, BasketResult, ValidationError};
use crate::summary::{self, BasketSummary, FeeRule};
use crate::types::{CustomerLimit, Line, ProductOffer};
use crate::validation::check_unit_cost;

/// Outcome of a successful [`Basket::decrement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decremented {
    /// The line still exists with this amount.
    Reduced(u32),
    /// The line held a single unit and was removed.
    Removed,
}

/// The ordered collection of lines for one customer session.
///
/// Serialized as the plain ordered list of line records. Deserializing
/// re-checks every invariant, so a tampered or half-written record fails to
/// parse instead of producing an impossible basket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Line>", into = "Vec<Line>")]
pub struct Basket {
    lines: Vec<Line>,
}

impl Basket {
    /// Creates an empty basket.
    pub fn new() -> Self {
        Basket { lines: Vec::new() }
    }

    /// Builds a basket from lines, checking every invariant.
    pub fn from_lines(lines: Vec<Line>) -> Result<Self, ValidationError> {
        for (i, line) in lines.iter().enumerate() {
            if line.amount == 0 {
                return Err(ValidationError::OutOfRange {
                    field: format!("lines[{}].amount", i),
                    min: 1,
                    max: i64::from(u32::MAX),
                });
            }
            check_unit_cost(&format!("lines[{}].unitCost", i), line.unit_cost)?;
            if !line.customer_limit.permits(line.amount) {
                return Err(ValidationError::OutOfRange {
                    field: format!("lines[{}].amount", i),
                    min: 1,
                    max: i64::from(line.customer_limit.max().unwrap_or(u32::MAX)),
                });
            }
            if lines[..i].iter().any(|other| other.key == line.key) {
                return Err(ValidationError::Duplicate {
                    field: "key".to_string(),
                    value: line.key.clone(),
                });
            }
        }

        Ok(Basket { lines })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lines in insertion order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns the line for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Line> {
        self.lines.iter().find(|line| line.key == key)
    }

    /// Position of the line for `key` in the sequence.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.key == key)
    }

    /// Returns the customer limit remembered for `key`.
    pub fn customer_limit(&self, key: &str) -> CustomerLimit {
        self.get(key)
            .map(|line| line.customer_limit)
            .unwrap_or_default()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Computes the derived totals.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::{Basket, CustomerLimit, FeeRule, Money, ProductOffer};
    ///
    /// let mut basket = Basket::new();
    /// let offer = ProductOffer::new("P1", "Ticket A", Money::from_cents(1000), CustomerLimit::AtMost(2));
    /// basket.add_or_increment(&offer).unwrap();
    ///
    /// let summary = basket.summarize(&FeeRule::flat(Money::from_cents(35)));
    /// assert_eq!(summary.item_count, 1);
    /// assert_eq!(summary.total.cents(), 1035);
    /// ```
    pub fn summarize(&self, rule: &FeeRule) -> BasketSummary {
        summary::summarize(&self.lines, rule)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Adds one unit of the offered product.
    ///
    /// ## Behavior
    /// - Line exists: amount + 1, unless it already holds `offer.limit` units
    /// - No line: appended with amount 1, unless `offer.limit` is zero
    /// - The offer's limit replaces the remembered limit on success
    ///
    /// ## Returns
    /// The line's new amount, or `LimitReached` with the basket unchanged.
    pub fn add_or_increment(&mut self, offer: &ProductOffer) -> BasketResult<u32> {
        let limit_reached = |limit: CustomerLimit| BasketError::LimitReached {
            key: offer.key.clone(),
            limit: limit.max().unwrap_or(u32::MAX),
        };

        match self.lines.iter_mut().find(|line| line.key == offer.key) {
            Some(line) => {
                if offer.limit.is_reached(line.amount) {
                    return Err(limit_reached(offer.limit));
                }
                line.amount += 1;
                line.customer_limit = offer.limit;
                Ok(line.amount)
            }
            None => {
                if offer.limit.is_reached(0) {
                    return Err(limit_reached(offer.limit));
                }
                self.lines.push(Line::from_offer(offer));
                Ok(1)
            }
        }
    }

    /// Adds one unit to an existing line, subject to its customer limit.
    pub fn increment(&mut self, key: &str) -> BasketResult<u32> {
        let line = self.line_mut(key)?;

        if line.customer_limit.is_reached(line.amount) {
            return Err(BasketError::LimitReached {
                key: key.to_string(),
                limit: line.customer_limit.max().unwrap_or(u32::MAX),
            });
        }

        line.amount += 1;
        Ok(line.amount)
    }

    /// Takes one unit from an existing line, removing it at zero.
    pub fn decrement(&mut self, key: &str) -> BasketResult<Decremented> {
        let index = self.position(key).ok_or_else(|| BasketError::NotFound {
            key: key.to_string(),
        })?;

        let line = &mut self.lines[index];
        if line.amount > 1 {
            line.amount -= 1;
            return Ok(Decremented::Reduced(line.amount));
        }

        self.lines.remove(index);
        Ok(Decremented::Removed)
    }

    /// Removes the line for `key`. Absent keys are a no-op.
    ///
    /// ## Returns
    /// The removed line, if there was one.
    pub fn remove(&mut self, key: &str) -> Option<Line> {
        self.position(key).map(|index| self.lines.remove(index))
    }

    /// Removes all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, key: &str) -> BasketResult<&mut Line> {
        self.lines
            .iter_mut()
            .find(|line| line.key == key)
            .ok_or_else(|| BasketError::NotFound {
                key: key.to_string(),
            })
    }
}

impl TryFrom<Vec<Line>> for Basket {
    type Error = ValidationError;

    fn try_from(lines: Vec<Line>) -> Result<Self, Self::Error> {
        Basket::from_lines(lines)
    }
}

impl From<Basket> for Vec<Line> {
    fn from(basket: Basket) -> Self {
        basket.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn offer(key: &str, cents: i64, limit: CustomerLimit) -> ProductOffer {
        ProductOffer::new(key, format!("Product {}", key), Money::from_cents(cents), limit)
    }

    fn keys(basket: &Basket) -> Vec<&str> {
        basket.lines().iter().map(|line| line.key.as_str()).collect()
    }

    #[test]
    fn test_add_creates_line_then_increments() {
        let mut basket = Basket::new();
        let p1 = offer("P1", 1000, CustomerLimit::AtMost(2));

        assert_eq!(basket.add_or_increment(&p1).unwrap(), 1);
        assert_eq!(basket.add_or_increment(&p1).unwrap(), 2);

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.get("P1").unwrap().amount, 2);
    }

    /// Empty basket, add "Ticket A" at € 10,00 with a limit of 2.
    #[test]
    fn test_first_add_summary_includes_fee() {
        let mut basket = Basket::new();
        let ticket = ProductOffer::new(
            "P1",
            "Ticket A",
            Money::from_cents(1000),
            CustomerLimit::AtMost(2),
        );

        basket.add_or_increment(&ticket).unwrap();

        let line = basket.get("P1").unwrap();
        assert_eq!(line.amount, 1);
        assert_eq!(line.title, "Ticket A");

        let summary = basket.summarize(&FeeRule::flat(Money::from_cents(35)));
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.subtotal.cents(), 1000);
        assert_eq!(summary.fee.cents(), 35);
        assert_eq!(summary.total.cents(), 1035);
    }

    #[test]
    fn test_add_rejected_at_limit() {
        let mut basket = Basket::new();
        let p1 = offer("P1", 1000, CustomerLimit::AtMost(1));
        basket.add_or_increment(&p1).unwrap();

        let before = basket.clone();
        let err = basket.add_or_increment(&p1).unwrap_err();

        assert_eq!(
            err,
            BasketError::LimitReached {
                key: "P1".to_string(),
                limit: 1
            }
        );
        assert_eq!(basket, before);
    }

    #[test]
    fn test_add_with_zero_limit_is_rejected() {
        let mut basket = Basket::new();
        let err = basket
            .add_or_increment(&offer("P1", 1000, CustomerLimit::AtMost(0)))
            .unwrap_err();

        assert!(matches!(err, BasketError::LimitReached { limit: 0, .. }));
        assert!(basket.is_empty());
    }

    /// Basket holds P1 twice with a limit of 2: increment fails, nothing changes.
    #[test]
    fn test_increment_at_limit_leaves_basket_unchanged() {
        let mut basket = Basket::new();
        let p1 = offer("P1", 1000, CustomerLimit::AtMost(2));
        basket.add_or_increment(&p1).unwrap();
        basket.add_or_increment(&p1).unwrap();

        let before = basket.clone();
        let err = basket.increment("P1").unwrap_err();

        assert!(matches!(err, BasketError::LimitReached { limit: 2, .. }));
        assert_eq!(basket, before);
    }

    #[test]
    fn test_increment_missing_key() {
        let mut basket = Basket::new();
        assert_eq!(
            basket.increment("nope").unwrap_err(),
            BasketError::NotFound {
                key: "nope".to_string()
            }
        );
    }

    /// Basket holds P1 once: decrement removes the line entirely.
    #[test]
    fn test_decrement_last_unit_removes_line() {
        let mut basket = Basket::new();
        basket
            .add_or_increment(&offer("P1", 1000, CustomerLimit::Unlimited))
            .unwrap();

        assert_eq!(basket.decrement("P1").unwrap(), Decremented::Removed);
        assert!(basket.is_empty());

        let summary = basket.summarize(&FeeRule::flat(Money::from_cents(35)));
        assert_eq!(summary, BasketSummary::empty());
    }

    #[test]
    fn test_decrement_reduces_amount() {
        let mut basket = Basket::new();
        let p1 = offer("P1", 1000, CustomerLimit::Unlimited);
        basket.add_or_increment(&p1).unwrap();
        basket.add_or_increment(&p1).unwrap();

        assert_eq!(basket.decrement("P1").unwrap(), Decremented::Reduced(1));
        assert!(matches!(
            basket.decrement("P2"),
            Err(BasketError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove_is_noop_for_missing_key() {
        let mut basket = Basket::new();
        basket
            .add_or_increment(&offer("P1", 1000, CustomerLimit::Unlimited))
            .unwrap();

        assert!(basket.remove("P2").is_none());
        assert_eq!(basket.len(), 1);
        assert_eq!(basket.remove("P1").unwrap().key, "P1");
        assert!(basket.is_empty());
    }

    #[test]
    fn test_position_is_stable_until_removed() {
        let mut basket = Basket::new();
        for key in ["A", "B", "C"] {
            basket
                .add_or_increment(&offer(key, 100, CustomerLimit::Unlimited))
                .unwrap();
        }
        basket.increment("A").unwrap();

        // Down and up again: A keeps its slot.
        basket.decrement("A").unwrap();
        basket.decrement("A").unwrap();
        assert_eq!(keys(&basket), vec!["B", "C"]);

        basket
            .add_or_increment(&offer("A", 100, CustomerLimit::Unlimited))
            .unwrap();
        assert_eq!(keys(&basket), vec!["B", "C", "A"]);

        basket
            .add_or_increment(&offer("B", 100, CustomerLimit::Unlimited))
            .unwrap();
        basket.decrement("B").unwrap();
        assert_eq!(keys(&basket), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_clear() {
        let mut basket = Basket::new();
        basket
            .add_or_increment(&offer("P1", 1000, CustomerLimit::Unlimited))
            .unwrap();
        basket.clear();
        assert!(basket.is_empty());
    }

    /// Drive a long scripted sequence and check the invariants after each step.
    #[test]
    fn test_invariants_hold_over_operation_sequence() {
        let mut basket = Basket::new();
        let offers = [
            offer("A", 1000, CustomerLimit::AtMost(2)),
            offer("B", 250, CustomerLimit::AtMost(1)),
            offer("C", 0, CustomerLimit::Unlimited),
        ];

        for step in 0..300usize {
            let target = &offers[step % offers.len()];
            match (step * 7) % 5 {
                0 | 1 => {
                    let _ = basket.add_or_increment(target);
                }
                2 => {
                    let _ = basket.increment(&target.key);
                }
                3 => {
                    let _ = basket.decrement(&target.key);
                }
                _ => {
                    basket.remove(&target.key);
                }
            }

            for line in basket.lines() {
                assert!(line.amount >= 1, "line {} dropped to zero", line.key);
                assert!(
                    line.customer_limit.permits(line.amount),
                    "line {} exceeds its limit",
                    line.key
                );
            }
            let mut seen: Vec<&str> = keys(&basket);
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), basket.len());
        }
    }

    #[test]
    fn test_summary_is_idempotent() {
        let mut basket = Basket::new();
        basket
            .add_or_increment(&offer("A", 1099, CustomerLimit::Unlimited))
            .unwrap();
        basket
            .add_or_increment(&offer("B", 1, CustomerLimit::Unlimited))
            .unwrap();

        let rule = FeeRule::flat(Money::from_cents(35));
        let first = basket.summarize(&rule);
        let second = basket.summarize(&rule);

        assert_eq!(first, second);
        assert_eq!(first.total, first.subtotal + first.fee);
    }

    #[test]
    fn test_serializes_as_line_list() {
        let mut basket = Basket::new();
        basket
            .add_or_increment(&offer("P1", 1000, CustomerLimit::AtMost(4)))
            .unwrap();

        let json = serde_json::to_string(&basket).unwrap();
        assert_eq!(
            json,
            r#"[{"key":"P1","title":"Product P1","unitCost":1000,"amount":1,"customerLimit":4}]"#
        );

        let back: Basket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, basket);
    }

    #[test]
    fn test_deserialize_rejects_broken_records() {
        let zero = r#"[{"key":"P1","title":"x","unitCost":100,"amount":0}]"#;
        assert!(serde_json::from_str::<Basket>(zero).is_err());

        let duplicate = r#"[{"key":"P1","title":"x","unitCost":100,"amount":1},
                            {"key":"P1","title":"y","unitCost":100,"amount":1}]"#;
        assert!(serde_json::from_str::<Basket>(duplicate).is_err());

        let over_limit = r#"[{"key":"P1","title":"x","unitCost":100,"amount":3,"customerLimit":2}]"#;
        assert!(serde_json::from_str::<Basket>(over_limit).is_err());

        let negative = r#"[{"key":"P1","title":"x","unitCost":-1,"amount":1}]"#;
        assert!(serde_json::from_str::<Basket>(negative).is_err());

        let priceless = r#"[{"key":"P1","title":"x","unitCost":9223372036854775807,"amount":1}]"#;
        assert!(matches!(
            serde_json::from_str::<Basket>(priceless),
            Err(e) if e.to_string().contains("unitCost must be between")
        ));
    }
}
