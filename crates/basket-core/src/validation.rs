//! # Validation Module
//!
//! Input checks for data entering the basket from outside: "add" payloads,
//! created-product feeds and configured field patterns.
//!
//! ## Where Checks Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shapes and types                                                  │
//! │  └── Basket records: amount ≥ 1, unique keys, limits (basket.rs)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Product keys and titles                                           │
//! │  ├── Unit costs                                                        │
//! │  └── Field naming patterns                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine transitions                                           │
//! │  └── Customer limits (BasketError)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::validation::{validate_offer, validate_product_key};
//! use basket_core::{CustomerLimit, Money, ProductOffer};
//!
//! validate_product_key("P1").unwrap();
//!
//! let offer = ProductOffer::new("P1", "Ticket A", Money::from_cents(1000), CustomerLimit::AtMost(2));
//! validate_offer(&offer).unwrap();
//! ```

use crate::encoder::INDEX_PLACEHOLDER;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductOffer;
use crate::{MAX_KEY_LENGTH, MAX_TITLE_LENGTH, MAX_UNIT_COST_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product key.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_KEY_LENGTH`] characters
/// - No whitespace and no brackets, so it can sit inside a field name
///
/// ## Example
/// ```rust
/// use basket_core::validation::validate_product_key;
///
/// assert!(validate_product_key("P1").is_ok());
/// assert!(validate_product_key("").is_err());
/// assert!(validate_product_key("a]b").is_err());
/// ```
pub fn validate_product_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "key".to_string(),
        });
    }

    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "key".to_string(),
            max: MAX_KEY_LENGTH,
        });
    }

    if let Some(bad) = key
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '[' | ']'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "key".to_string(),
            reason: format!("contains invalid character {:?}", bad),
        });
    }

    Ok(())
}

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty or whitespace-only
/// - At most [`MAX_TITLE_LENGTH`] characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit cost. Free products (0) are allowed.
///
/// ## Rules
/// - Not negative
/// - At most [`MAX_UNIT_COST_CENTS`]
pub fn validate_unit_cost(cost: Money) -> ValidationResult<()> {
    check_unit_cost("unitCost", cost)
}

/// [`validate_unit_cost`] reporting under a caller-chosen field name.
pub(crate) fn check_unit_cost(field: &str, cost: Money) -> ValidationResult<()> {
    if cost.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    if cost.cents() > MAX_UNIT_COST_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_UNIT_COST_CENTS,
        });
    }
    Ok(())
}

/// Validates everything an "add" payload carries.
pub fn validate_offer(offer: &ProductOffer) -> ValidationResult<()> {
    validate_product_key(&offer.key)?;
    validate_title(&offer.title)?;
    validate_unit_cost(offer.unit_cost)
}

// =============================================================================
// Pattern Validators
// =============================================================================

/// Validates a form field naming pattern.
///
/// The pattern must contain `{index}` so every emitted name is unique.
pub fn validate_field_pattern(field: &str, pattern: &str) -> ValidationResult<()> {
    if pattern.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !pattern.contains(INDEX_PLACEHOLDER) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must contain {}", INDEX_PLACEHOLDER),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
