//! # API Error Type
//!
//! Unified error type for the webshop routes.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Webshop                            │
//! │                                                                         │
//! │  Page script                  Rust Backend                              │
//! │  ───────────                  ────────────                              │
//! │                                                                         │
//! │  fetch('/basket/items', {method: 'POST', ...})                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Route Handler                                                   │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── StoreError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Bad input? ───── ValidationError::TooLong ────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  if (!response.ok) {                                                    │
//! │    // body.code = "VALIDATION_ERROR"                                    │
//! │    // body.message = "title must be at most 200 characters"             │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Basket rejections (`LimitReached`, `NotFound`) are not errors at this
//! level: the presenter turns them into a re-render plus toast, and the routes
//! answer `200` with the new view.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use basket_core::{AccessError, BasketError, CoreError, TemplateError, ValidationError};
use basket_store::StoreError;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// API error returned from the routes.
///
/// ## Serialization
/// This is what the page receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Template not found: beer"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Per-customer limit reached (409)
    LimitReached,

    /// Template does not fit the product form (422)
    TemplateError,

    /// Missing or invalid identity token (401)
    Unauthorized,

    /// Authenticated, but not an admin (403)
    Forbidden,

    /// Storage operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::LimitReached => StatusCode::CONFLICT,
            ErrorCode::TemplateError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConnectionFailed(_) | StoreError::PoolExhausted => {
                tracing::error!("Basket store unavailable: {}", err);
                ApiError::new(ErrorCode::DatabaseError, "Basket storage unavailable")
            }
            StoreError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            StoreError::QueryFailed(e) | StoreError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            StoreError::Serialization(e) => {
                tracing::error!("Basket serialization failed: {}", e);
                ApiError::internal("Basket could not be saved")
            }
            StoreError::StorageCorrupt { key, .. } => {
                ApiError::new(ErrorCode::DatabaseError, format!("Stored basket '{}' is corrupt", key))
            }
        }
    }
}

impl From<BasketError> for ApiError {
    fn from(err: BasketError) -> Self {
        match err {
            BasketError::LimitReached { .. } => ApiError::new(ErrorCode::LimitReached, err.to_string()),
            BasketError::NotFound { ref key } => ApiError::not_found("Basket line", key),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::UnknownTemplate(name) => ApiError::not_found("Template", &name),
            other => ApiError::new(ErrorCode::TemplateError, other.to_string()),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        ApiError::new(ErrorCode::Forbidden, err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Basket(e) => e.into(),
            CoreError::Validation(e) => e.into(),
            CoreError::Template(e) => e.into(),
            CoreError::Access(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that stop the webshop from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Basket store: {0}")]
    Store(#[from] StoreError),

    #[error("Server I/O: {0}")]
    Io(#[from] std::io::Error),
}
