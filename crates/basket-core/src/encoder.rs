//! # Order Encoder
//!
//! Turns a basket (mode A) or a set of quantity inputs (mode B) into the
//! ordered, uniquely indexed form fields the order endpoint reads.
//!
//! ## Encoding Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Encoding                                    │
//! │                                                                         │
//! │  Mode A: Basket lines          Mode B: quantity inputs                  │
//! │  [P1×2, P7×1]                  [("A","3"), ("B","0"), ("C","1")]        │
//! │       │                                   │                             │
//! │       │                   leading integer, clamp, drop ≤ 0              │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │               expand (Expansion)                                        │
//! │     PerKey:  one entry per key, carrying amount                         │
//! │     PerUnit: one entry per unit, amount 1 each                          │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │         OrderEntry { index 0..N-1, key, amount }                        │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │            render (FieldScheme)                                         │
//! │     products[0].key=A  products[0].amount=3  ...                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Indices are contiguous from 0 and follow input order. No entry ever
//! carries a zero amount.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::basket::Basket;
use crate::error::ValidationError;
use crate::validation::validate_field_pattern;
use crate::MAX_REQUESTED_AMOUNT;

/// Placeholder replaced by the entry index.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Placeholder replaced by the product key.
pub const KEY_PLACEHOLDER: &str = "{key}";

// =============================================================================
// Expansion
// =============================================================================

/// How a requested amount becomes entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    /// Quantity 3 for K gives three consecutive entries carrying K.
    PerUnit,
    /// Quantity 3 for K gives one entry carrying K and the amount.
    #[default]
    PerKey,
}

/// One indexed entry of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderEntry {
    pub index: usize,
    pub key: String,
    pub amount: u32,
}

/// One submitted form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    fn new(name: String, value: impl Into<String>) -> Self {
        FormField {
            name,
            value: value.into(),
        }
    }
}

// =============================================================================
// Field Scheme
// =============================================================================

/// Naming pattern of the submitted fields.
///
/// Patterns may use `{index}` (required) and `{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldScheme {
    /// Field carrying the product key.
    pub key_field: String,

    /// Field carrying the amount. `None` emits keys only.
    #[serde(default)]
    pub amount_field: Option<String>,
}

impl FieldScheme {
    /// `products[<index>]` → key.
    pub fn indexed_list() -> Self {
        FieldScheme {
            key_field: "products[{index}]".to_string(),
            amount_field: None,
        }
    }

    /// `products[<index>].key` / `products[<index>].amount` pairs.
    pub fn key_amount_pairs() -> Self {
        FieldScheme {
            key_field: "products[{index}].key".to_string(),
            amount_field: Some("products[{index}].amount".to_string()),
        }
    }

    /// One hidden `products[<index>].key` field per unit.
    pub fn per_unit_hidden() -> Self {
        FieldScheme {
            key_field: "products[{index}].key".to_string(),
            amount_field: None,
        }
    }

    /// Checks the patterns can encode entries of the given expansion.
    ///
    /// ## Rules
    /// - every pattern contains `{index}`, so field names stay unique
    /// - per-key expansion needs an amount field, or amounts would be lost
    pub fn validate(&self, expansion: Expansion) -> Result<(), ValidationError> {
        validate_field_pattern("key_field", &self.key_field)?;
        if let Some(amount_field) = &self.amount_field {
            validate_field_pattern("amount_field", amount_field)?;
        }

        if expansion == Expansion::PerKey && self.amount_field.is_none() {
            return Err(ValidationError::Required {
                field: "amount_field".to_string(),
            });
        }

        Ok(())
    }

    /// Renders entries into form fields, key field first for each entry.
    pub fn render(&self, entries: &[OrderEntry]) -> Vec<FormField> {
        let per_entry = if self.amount_field.is_some() { 2 } else { 1 };
        let mut fields = Vec::with_capacity(entries.len() * per_entry);

        for entry in entries {
            fields.push(FormField::new(
                fill(&self.key_field, entry),
                entry.key.as_str(),
            ));
            if let Some(amount_field) = &self.amount_field {
                fields.push(FormField::new(
                    fill(amount_field, entry),
                    entry.amount.to_string(),
                ));
            }
        }

        fields
    }
}

impl Default for FieldScheme {
    fn default() -> Self {
        FieldScheme::key_amount_pairs()
    }
}

fn fill(pattern: &str, entry: &OrderEntry) -> String {
    pattern
        .replace(INDEX_PLACEHOLDER, &entry.index.to_string())
        .replace(KEY_PLACEHOLDER, &entry.key)
}

// =============================================================================
// Entry Building
// =============================================================================

/// Reads the integer at the start of `raw`, the way number inputs are read
/// by the page: leading whitespace and an optional sign, then digits up to
/// the first non-digit. `None` when no digit follows.
///
/// ## Example
/// ```rust
/// use basket_core::encoder::leading_integer;
///
/// assert_eq!(leading_integer(" 3abc"), Some(3));
/// assert_eq!(leading_integer("1.5"), Some(1));
/// assert_eq!(leading_integer("-2"), Some(-2));
/// assert_eq!(leading_integer("abc"), None);
/// ```
pub fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: Option<i64> = None;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let next = value
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
        value = Some(next);
    }

    value.map(|v| if negative { -v } else { v })
}

/// Parses a raw quantity leniently.
///
/// The leading integer counts; input without one, and negative input, count
/// as 0. Values above [`MAX_REQUESTED_AMOUNT`] are clamped to it.
///
/// ## Example
/// ```rust
/// use basket_core::encoder::parse_requested;
///
/// assert_eq!(parse_requested(" 3 "), 3);
/// assert_eq!(parse_requested("2.5"), 2);
/// assert_eq!(parse_requested("-2"), 0);
/// assert_eq!(parse_requested("abc"), 0);
/// ```
pub fn parse_requested(raw: &str) -> u32 {
    match leading_integer(raw) {
        Some(value) if value > 0 => {
            u32::try_from(value.min(i64::from(MAX_REQUESTED_AMOUNT))).unwrap_or(MAX_REQUESTED_AMOUNT)
        }
        _ => 0,
    }
}

/// Expands `(key, amount)` pairs into indexed entries, skipping zeros.
pub fn expand<K, I>(pairs: I, expansion: Expansion) -> Vec<OrderEntry>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, u32)>,
{
    let mut entries = Vec::new();

    for (key, amount) in pairs {
        if amount == 0 {
            continue;
        }
        match expansion {
            Expansion::PerKey => entries.push(OrderEntry {
                index: entries.len(),
                key: key.as_ref().to_string(),
                amount,
            }),
            Expansion::PerUnit => {
                for _ in 0..amount {
                    entries.push(OrderEntry {
                        index: entries.len(),
                        key: key.as_ref().to_string(),
                        amount: 1,
                    });
                }
            }
        }
    }

    entries
}

/// Mode A: entries for every basket line, in basket order.
pub fn encode_basket(basket: &Basket, expansion: Expansion) -> Vec<OrderEntry> {
    expand(
        basket
            .lines()
            .iter()
            .map(|line| (line.key.as_str(), line.amount)),
        expansion,
    )
}

/// Mode B: entries for raw quantity inputs, in input order.
///
/// ## Example
/// ```rust
/// use basket_core::encoder::{encode_quantities, Expansion};
///
/// let entries = encode_quantities([("A", "3"), ("B", "0"), ("C", "1")], Expansion::PerUnit);
/// let keys: Vec<_> = entries.iter().map(|e| (e.index, e.key.as_str())).collect();
/// assert_eq!(keys, vec![(0, "A"), (1, "A"), (2, "A"), (3, "C")]);
/// ```
pub fn encode_quantities<K, R, I>(inputs: I, expansion: Expansion) -> Vec<OrderEntry>
where
    K: AsRef<str>,
    R: AsRef<str>,
    I: IntoIterator<Item = (K, R)>,
{
    expand(
        inputs
            .into_iter()
            .map(|(key, raw)| (key, parse_requested(raw.as_ref()))),
        expansion,
    )
}

// =============================================================================
// Order Encoder
// =============================================================================

/// A validated encoding policy: naming scheme plus expansion.
///
/// Each submission endpoint owns one, so the checkout and the quantity form
/// can encode differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEncoder {
    scheme: FieldScheme,
    expansion: Expansion,
}

impl OrderEncoder {
    /// Creates an encoder, rejecting schemes that cannot carry the expansion.
    pub fn new(scheme: FieldScheme, expansion: Expansion) -> Result<Self, ValidationError> {
        scheme.validate(expansion)?;
        Ok(OrderEncoder { scheme, expansion })
    }

    /// Key/amount pairs, one entry per line.
    pub fn checkout() -> Self {
        OrderEncoder {
            scheme: FieldScheme::key_amount_pairs(),
            expansion: Expansion::PerKey,
        }
    }

    /// One hidden key field per unit.
    pub fn per_unit() -> Self {
        OrderEncoder {
            scheme: FieldScheme::per_unit_hidden(),
            expansion: Expansion::PerUnit,
        }
    }

    pub fn scheme(&self) -> &FieldScheme {
        &self.scheme
    }

    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    /// Mode A fields for a basket.
    pub fn encode_basket(&self, basket: &Basket) -> Vec<FormField> {
        self.scheme.render(&encode_basket(basket, self.expansion))
    }

    /// Mode B fields for raw quantity inputs.
    pub fn encode_quantities<K, R, I>(&self, inputs: I) -> Vec<FormField>
    where
        K: AsRef<str>,
        R: AsRef<str>,
        I: IntoIterator<Item = (K, R)>,
    {
        self.scheme
            .render(&encode_quantities(inputs, self.expansion))
    }
}

impl Default for OrderEncoder {
    fn default() -> Self {
        OrderEncoder::checkout()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
