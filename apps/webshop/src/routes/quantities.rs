//! # Quantity Form Route (mode B)
//!
//! Event pages without a basket show one quantity input per product and post
//! them all at once. The inputs are encoded with the `[quantities]` scheme;
//! nothing is stored.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use basket_core::{FormField, QuantityForm};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// What an input held: typed text, or a number set by the +/− buttons.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(i64),
    Text(String),
}

impl RawQuantity {
    fn into_raw(self) -> String {
        match self {
            RawQuantity::Number(n) => n.to_string(),
            RawQuantity::Text(text) => text,
        }
    }
}

/// One row of the form.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantityInput {
    pub key: String,
    pub value: RawQuantity,
}

/// `POST /orders/quantities` request body, rows in display order.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantitiesRequest {
    pub quantities: Vec<QuantityInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitiesResponse {
    /// Units requested across all rows, after lenient parsing.
    pub unit_count: u32,
    pub fields: Vec<FormField>,
}

/// `POST /orders/quantities`
///
/// Each input counts by its leading integer; inputs without one, and negative
/// ones, count as 0, and zero rows emit no fields. A row above
/// `MAX_REQUESTED_AMOUNT`, or a total above `MAX_ORDER_UNITS`, is a `400`.
pub async fn encode_quantities(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuantitiesRequest>,
) -> ApiResult<Json<QuantitiesResponse>> {
    let mut form = QuantityForm::new(request.quantities.iter().map(|q| q.key.clone()));
    if form.controls().len() != request.quantities.len() {
        return Err(ApiError::validation("quantities lists a product twice"));
    }

    for input in request.quantities {
        form.set_raw(&input.key, input.value.into_raw())?;
    }
    form.check_limits()?;

    let unit_count = form
        .requested()
        .iter()
        .fold(0u32, |sum, (_, amount)| sum.saturating_add(*amount));
    let fields = form.encode(&state.quantity_encoder);

    debug!(units = unit_count, fields = fields.len(), "Encoded quantity form");
    Ok(Json(QuantitiesResponse { unit_count, fields }))
}
