//! # Basket Routes
//!
//! The basket page's controls.
//!
//! ## Basket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Lifecycle                                     │
//! │                                                                         │
//! │  ┌──────────┐  POST /basket/items   ┌──────────┐                       │
//! │  │  Empty   │──────────────────────►│  Filled  │◄──┐ increase          │
//! │  │  basket  │                       │          │───┘ decrease (>1)     │
//! │  └──────────┘◄──────────────────────└──────────┘                       │
//! │        ▲      DELETE /basket, last decrease,   │                        │
//! │        │      last row removed                 │ POST /checkout         │
//! │        │                                       ▼                        │
//! │        │  POST /checkout/confirm        ┌──────────┐                    │
//! │        └────────────────────────────────│ Submitted│ (basket kept)      │
//! │                                         └──────────┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected transition (limit reached, stale row) still answers `200`: the
//! body carries the unchanged view, the toast and an `error` entry.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use basket_core::validation::validate_offer;
use basket_core::{BasketEvent, ProductOffer};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::{AppState, BasketResponse};

/// `GET /basket`
pub async fn get_basket(State(state): State<Arc<AppState>>) -> Json<BasketResponse> {
    Json(state.basket.snapshot().await)
}

/// `POST /basket/items`: the "add to basket" button.
///
/// ## Request
/// ```json
/// { "key": "P1", "title": "Ticket A", "unitCost": 1000, "limit": 2 }
/// ```
/// `limit` may be omitted or `null` for products without a per-customer cap.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(offer): Json<ProductOffer>,
) -> ApiResult<Json<BasketResponse>> {
    validate_offer(&offer)?;
    debug!(key = %offer.key, "add_item");

    let response = state
        .basket
        .dispatch(&state.db, BasketEvent::Add(offer))
        .await?;
    Ok(Json(response))
}

/// `POST /basket/items/{key}/increase`
pub async fn increase_item(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult<Json<BasketResponse>> {
    let response = state
        .basket
        .dispatch(&state.db, BasketEvent::Increase { key })
        .await?;
    Ok(Json(response))
}

/// `POST /basket/items/{key}/decrease`
pub async fn decrease_item(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult<Json<BasketResponse>> {
    let response = state
        .basket
        .dispatch(&state.db, BasketEvent::Decrease { key })
        .await?;
    Ok(Json(response))
}

/// `DELETE /basket/items/{key}`. Removing an absent row is a no-op.
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult<Json<BasketResponse>> {
    let response = state
        .basket
        .dispatch(&state.db, BasketEvent::Remove { key })
        .await?;
    Ok(Json(response))
}

/// `DELETE /basket`
pub async fn empty_basket(State(state): State<Arc<AppState>>) -> ApiResult<Json<BasketResponse>> {
    let response = state.basket.dispatch(&state.db, BasketEvent::Empty).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::StatusCode;
    use basket_core::DEFAULT_BASKET_KEY;
    use serde_json::{json, Value};

    fn ticket(limit: Value) -> Value {
        json!({ "key": "P1", "title": "Ticket A", "unitCost": 1000, "limit": limit })
    }

    #[tokio::test]
    async fn test_empty_basket_renders_empty_state() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, request("GET", "/basket")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["state"], "empty");
        assert_eq!(body["view"]["message"], "Shopping basket is empty!");
        assert_eq!(body["summary"]["total"], 0);
    }

    #[tokio::test]
    async fn test_add_renders_rows_and_totals() {
        let (app, state) = test_app().await;
        let (status, body) =
            send(&app, json_request("POST", "/basket/items", ticket(json!(2)))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["state"], "filled");
        assert_eq!(body["view"]["rows"][0]["title"], "Ticket A");
        assert_eq!(body["view"]["rows"][0]["amount"], 1);
        assert_eq!(body["view"]["rows"][0]["lineTotal"], "€ 10,00");
        assert_eq!(body["view"]["administrationCosts"], "€ 0,35");
        assert_eq!(body["view"]["total"], "€ 10,35");
        assert_eq!(body["summary"]["itemCount"], 1);
        assert_eq!(body["summary"]["subtotal"], 1000);
        assert_eq!(body["summary"]["fee"], 35);
        assert_eq!(body["summary"]["total"], 1035);
        assert_eq!(body["notification"]["effect"], "pulse");
        assert_eq!(
            body["notification"]["message"],
            "Product added to your shopping basket."
        );

        let stored = state.db.baskets().load(DEFAULT_BASKET_KEY).await.unwrap();
        assert_eq!(stored.get("P1").unwrap().amount, 1);
    }

    #[tokio::test]
    async fn test_increase_past_limit_shakes() {
        let (app, _) = test_app().await;
        send(&app, json_request("POST", "/basket/items", ticket(json!(2)))).await;
        send(&app, request("POST", "/basket/items/P1/increase")).await;

        let (status, body) = send(&app, request("POST", "/basket/items/P1/increase")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], "LIMIT_REACHED");
        assert_eq!(body["notification"]["effect"], "shake");
        assert_eq!(
            body["notification"]["message"],
            "You reached the maximum sold per customer."
        );
        assert_eq!(body["view"]["rows"][0]["amount"], 2);
    }

    #[tokio::test]
    async fn test_unlimited_offer_keeps_growing() {
        let (app, _) = test_app().await;
        for _ in 0..5 {
            send(&app, json_request("POST", "/basket/items", ticket(Value::Null))).await;
        }
        let (_, body) = send(&app, request("GET", "/basket")).await;
        assert_eq!(body["summary"]["itemCount"], 5);
    }

    #[tokio::test]
    async fn test_decrease_last_unit_removes_row() {
        let (app, _) = test_app().await;
        send(&app, json_request("POST", "/basket/items", ticket(json!(2)))).await;

        let (status, body) = send(&app, request("POST", "/basket/items/P1/decrease")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["state"], "empty");
        assert_eq!(body["summary"]["itemCount"], 0);
        assert_eq!(body["summary"]["fee"], 0);
        assert_eq!(body["summary"]["total"], 0);
    }

    #[tokio::test]
    async fn test_stale_row_reports_not_found() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, request("POST", "/basket/items/ZZ/decrease")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["view"]["state"], "empty");
    }

    #[tokio::test]
    async fn test_remove_and_empty() {
        let (app, state) = test_app().await;
        send(&app, json_request("POST", "/basket/items", ticket(json!(2)))).await;
        send(
            &app,
            json_request(
                "POST",
                "/basket/items",
                json!({ "key": "B7", "title": "Beer", "unitCost": 250 }),
            ),
        )
        .await;

        let (_, body) = send(&app, request("DELETE", "/basket/items/P1")).await;
        assert_eq!(body["view"]["rows"].as_array().unwrap().len(), 1);
        assert_eq!(body["view"]["rows"][0]["key"], "B7");

        let (status, body) = send(&app, request("DELETE", "/basket")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["state"], "empty");
        assert!(state
            .db
            .baskets()
            .load(DEFAULT_BASKET_KEY)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_invalid_offer_is_rejected() {
        let (app, _) = test_app().await;
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/basket/items",
                json!({ "key": "has space", "title": "Ticket A", "unitCost": 1000 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unit_cost_above_ceiling_is_rejected() {
        let (app, _) = test_app().await;
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/basket/items",
                json!({ "key": "P1", "title": "Gold", "unitCost": i64::MAX }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, request("GET", "/basket")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["state"], "empty");
    }

    #[tokio::test]
    async fn test_failed_save_is_not_served_afterwards() {
        let (app, state) = test_app().await;
        state.db.close().await;

        let (status, body) =
            send(&app, json_request("POST", "/basket/items", ticket(json!(2)))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "DATABASE_ERROR");

        let (status, body) = send(&app, request("GET", "/basket")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["state"], "empty");
        assert_eq!(body["summary"]["total"], 0);
    }
}
