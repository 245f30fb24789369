//! # Checkout Routes (mode A)
//!
//! The basket page posts its order in two steps: `/checkout` hands out the
//! order fields, the page posts them to the order service, then reports the
//! outcome. Only a confirmed order clears the basket.
//!
//! ```text
//!  page                        webshop                     order service
//!   │ POST /checkout ──────────►│ fields (basket kept)
//!   │ ◄──────────────────────────│
//!   │ POST fields ─────────────────────────────────────────►│
//!   │ ◄─────────────────────────────────────────── 2xx / error
//!   │ POST /checkout/confirm ──►│ clear + save
//!   │   or /checkout/failed ───►│ re-render, basket kept
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use basket_core::BasketEvent;
use tracing::info;

use crate::error::ApiResult;
use crate::state::{AppState, BasketResponse};

/// `POST /checkout`: order fields for the current basket.
///
/// An empty basket has nothing to order and is refused with `400`.
pub async fn submit(State(state): State<Arc<AppState>>) -> ApiResult<Json<BasketResponse>> {
    let response = state.basket.dispatch(&state.db, BasketEvent::Submit).await?;
    info!(
        storage_key = %state.basket.storage_key(),
        fields = response.fields.len(),
        "Order fields handed out"
    );
    Ok(Json(response))
}

/// `POST /checkout/confirm`: the order service accepted the order.
///
/// Without a pending `/checkout` the basket is left alone.
pub async fn confirm(State(state): State<Arc<AppState>>) -> ApiResult<Json<BasketResponse>> {
    let response = state
        .basket
        .dispatch(&state.db, BasketEvent::SubmissionSucceeded)
        .await?;
    if response.view.is_empty() {
        info!(storage_key = %state.basket.storage_key(), "Order confirmed, basket cleared");
    }
    Ok(Json(response))
}

/// `POST /checkout/failed`: the order never arrived or was refused.
pub async fn failed(State(state): State<Arc<AppState>>) -> ApiResult<Json<BasketResponse>> {
    let response = state
        .basket
        .dispatch(&state.db, BasketEvent::SubmissionFailed)
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use crate::config::{EncodingConfig, WebshopConfig};
    use crate::routes::test_support::*;
    use axum::http::StatusCode;
    use basket_core::{Expansion, DEFAULT_BASKET_KEY};
    use serde_json::json;

    async fn add(app: &axum::Router, key: &str, title: &str, cost: i64) {
        send(
            app,
            json_request(
                "POST",
                "/basket/items",
                json!({ "key": key, "title": title, "unitCost": cost }),
            ),
        )
        .await;
    }

    #[tokio::test]
    async fn test_submit_encodes_contiguous_pairs() {
        let (app, _) = test_app().await;
        add(&app, "P1", "Ticket A", 1000).await;
        add(&app, "B7", "Beer", 250).await;
        add(&app, "P1", "Ticket A", 1000).await;

        let (status, body) = send(&app, request("POST", "/checkout")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submissionPending"], true);
        assert_eq!(
            body["fields"],
            json!([
                { "name": "products[0].key", "value": "P1" },
                { "name": "products[0].amount", "value": "2" },
                { "name": "products[1].key", "value": "B7" },
                { "name": "products[1].amount", "value": "1" },
            ])
        );
        assert_eq!(body["view"]["state"], "filled");
    }

    #[tokio::test]
    async fn test_submit_uses_configured_scheme() {
        let mut config = WebshopConfig::default();
        config.checkout = EncodingConfig {
            key_field: "products[{index}]".to_string(),
            amount_field: None,
            expansion: Expansion::PerUnit,
        };
        let (app, _) = test_app_with(config).await;
        add(&app, "P1", "Ticket A", 1000).await;
        add(&app, "P1", "Ticket A", 1000).await;

        let (_, body) = send(&app, request("POST", "/checkout")).await;
        assert_eq!(
            body["fields"],
            json!([
                { "name": "products[0]", "value": "P1" },
                { "name": "products[1]", "value": "P1" },
            ])
        );
    }

    #[tokio::test]
    async fn test_empty_basket_cannot_be_submitted() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, request("POST", "/checkout")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Shopping basket is empty!");
    }

    #[tokio::test]
    async fn test_failure_keeps_basket() {
        let (app, state) = test_app().await;
        add(&app, "P1", "Ticket A", 1000).await;
        send(&app, request("POST", "/checkout")).await;

        let (status, body) = send(&app, request("POST", "/checkout/failed")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submissionPending"], false);
        assert_eq!(body["view"]["state"], "filled");
        assert_eq!(
            state
                .db
                .baskets()
                .load(DEFAULT_BASKET_KEY)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_confirm_clears_basket() {
        let (app, state) = test_app().await;
        add(&app, "P1", "Ticket A", 1000).await;
        send(&app, request("POST", "/checkout")).await;

        let (status, body) = send(&app, request("POST", "/checkout/confirm")).await;

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
    async fn test_confirm_without_checkout_keeps_basket() {
        let (app, state) = test_app().await;
        add(&app, "P1", "Ticket A", 1000).await;

        let (status, body) = send(&app, request("POST", "/checkout/confirm")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["state"], "filled");
        assert_eq!(
            state
                .db
                .baskets()
                .load(DEFAULT_BASKET_KEY)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_confirm_after_failure_needs_new_checkout() {
        let (app, _) = test_app().await;
        add(&app, "P1", "Ticket A", 1000).await;
        send(&app, request("POST", "/checkout")).await;
        send(&app, request("POST", "/checkout/failed")).await;

        let (_, body) = send(&app, request("POST", "/checkout/confirm")).await;
        assert_eq!(body["view"]["state"], "filled");
    }
}
