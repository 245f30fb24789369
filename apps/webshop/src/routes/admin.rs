//! # Admin Routes
//!
//! After the admin dashboard creates a product through the product API, it
//! forwards the API's answer here so the new product lands in the basket.
//!
//! ```text
//!  dashboard ── POST /api/products ──► product API
//!            ◄── { product_id, product_key, product_title } ──
//!  dashboard ── POST /admin/products/created (Bearer token) ──► webshop
//!                                       │
//!                 token groups ∩ admin groups? ── no ──► 403
//!                                       │ yes
//!                                       ▼
//!                        addOrIncrement(product) ──► BasketResponse
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use basket_core::validation::validate_offer;
use basket_core::{BasketEvent, CustomerLimit, Money, ProductOffer};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, BasketResponse};

/// The product API's answer for a created product.
///
/// Field names follow the product API's snake_case JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProduct {
    /// Numeric or string id.
    pub product_id: Value,
    pub product_title: String,

    #[serde(default)]
    pub unit_cost: i64,

    #[serde(default)]
    pub max_sold_per_customer: Option<u32>,
}

impl CreatedProduct {
    fn into_offer(self) -> ApiResult<ProductOffer> {
        let key = match self.product_id {
            Value::String(id) => id,
            Value::Number(id) => id.to_string(),
            other => {
                return Err(ApiError::validation(format!(
                    "product_id must be a string or number, got {}",
                    other
                )))
            }
        };

        let offer = ProductOffer::new(
            key,
            self.product_title,
            Money::from_cents(self.unit_cost),
            CustomerLimit::from(self.max_sold_per_customer),
        );
        validate_offer(&offer)?;
        Ok(offer)
    }
}

/// `POST /admin/products/created`
pub async fn product_created(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(created): Json<CreatedProduct>,
) -> ApiResult<Json<BasketResponse>> {
    let role = state.verifier.role_from_headers(&headers)?;
    role.require_admin("add created product")?;

    let offer = created.into_offer()?;
    info!(key = %offer.key, title = %offer.title, "Adding created product to basket");

    let response = state
        .basket
        .dispatch(&state.db, BasketEvent::Add(offer))
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use crate::config::WebshopConfig;
    use crate::routes::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};

    const SECRET: &str = "admin-test-secret";

    async fn app() -> axum::Router {
        let mut config = WebshopConfig::default();
        config.auth.token_secret = Some(SECRET.to_string());
        config.auth.admin_groups = vec!["webshop-admins".to_string()];
        test_app_with(config).await.0
    }

    fn token(groups: &[&str]) -> String {
        encode(
            &Header::default(),
            &json!({
                "sub": "jdoe",
                "exp": (Utc::now() + Duration::hours(1)).timestamp(),
                "ldap_groups": groups,
            }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn created(token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/admin/products/created")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_admin_feeds_product_into_basket() {
        let app = app().await;
        let body = json!({ "product_id": 42, "product_key": "abc-def", "product_title": "Beer" });

        let (status, response) = send(&app, created(Some(&token(&["webshop-admins"])), body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["view"]["rows"][0]["key"], "42");
        assert_eq!(response["view"]["rows"][0]["title"], "Beer");
        assert_eq!(response["summary"]["itemCount"], 1);
    }

    #[tokio::test]
    async fn test_same_product_twice_increments() {
        let app = app().await;
        let admin = token(&["webshop-admins"]);
        let body = json!({ "product_id": "42", "product_title": "Beer", "unit_cost": 250 });

        send(&app, created(Some(&admin), body.clone())).await;
        let (_, response) = send(&app, created(Some(&admin), body)).await;

        assert_eq!(response["view"]["rows"][0]["amount"], 2);
        assert_eq!(response["summary"]["subtotal"], 500);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let app = app().await;
        let body = json!({ "product_id": 42, "product_title": "Beer" });

        let (status, response) = send(&app, created(Some(&token(&["staff"])), body)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(response["code"], "FORBIDDEN");

        let (_, basket) = send(&app, request("GET", "/basket")).await;
        assert_eq!(basket["view"]["state"], "empty");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = app().await;
        let body = json!({ "product_id": 42, "product_title": "Beer" });

        let (status, response) = send(&app, created(None, body)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(response["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_bad_product_id() {
        let app = app().await;
        let body = json!({ "product_id": [1, 2], "product_title": "Beer" });

        let (status, _) = send(&app, created(Some(&token(&["webshop-admins"])), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
