//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                        │
//! │  ├── CoreError        - Umbrella for everything below                  │
//! │  ├── BasketError      - Rejected engine transitions                    │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  ├── TemplateError    - Template does not fit the form schema          │
//! │  └── AccessError      - Operation needs a role the caller lacks        │
//! │                                                                         │
//! │  basket-store errors (separate crate)                                  │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  webshop errors (in app)                                               │
//! │  └── ApiError         - What the page sees (serialized)                │
//! │                                                                         │
//! │  None of these is fatal to a page: every one is answered by            │
//! │  re-rendering the current basket, plus a toast where relevant.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::template::FieldKind;

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for basket-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A basket transition was rejected.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Template could not be applied.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),
}

// =============================================================================
// Basket Error
// =============================================================================

/// A rejected basket transition. The basket is unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BasketError {
    /// The line already holds the maximum amount one customer may buy.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "add" on a ticket (limit 2, basket holds 2)
    ///      │
    ///      ▼
    /// LimitReached { key: "P1", limit: 2 }
    ///      │
    ///      ▼
    /// Basket button shakes, toast:
    /// "You reached the maximum sold per customer."
    /// ```
    #[error("Limit of {limit} per customer reached for {key}")]
    LimitReached { key: String, limit: u32 },

    /// The operation referenced a key that is not in the basket.
    ///
    /// Usually a stale page element; the presenter answers it with a full
    /// re-render from the persisted basket.
    #[error("Product {key} is not in the basket")]
    NotFound { key: String },
}

impl BasketError {
    /// Returns the product key the error refers to.
    pub fn key(&self) -> &str {
        match self {
            BasketError::LimitReached { key, .. } | BasketError::NotFound { key } => key,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two persisted lines with one key).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Template Error
// =============================================================================

/// A template does not fit the form schema it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// No template with that name.
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    /// The template sets a field the form does not have.
    #[error("Template '{template}' sets unknown field '{field}'")]
    UnknownField { template: String, field: String },

    /// The template value has the wrong kind for the field.
    #[error("Template '{template}' field '{field}' must be {expected}")]
    KindMismatch {
        template: String,
        field: String,
        expected: FieldKind,
    },

    /// A numeric template value is negative.
    #[error("Template '{template}' field '{field}' must not be negative")]
    Negative { template: String, field: String },
}

// =============================================================================
// Access Error
// =============================================================================

/// The caller's role does not allow the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Operation is admin-only.
    #[error("{operation} requires the admin role")]
    AdminRequired { operation: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result of a basket transition.
pub type BasketResult<T> = Result<T, BasketError>;

// =============================================================================
// Unit Tests
// =============================================================================
