//! # Template Route
//!
//! `GET /templates/{name}` answers the product form with the named template
//! applied to a blank form, ready to prefill the admin's "new product" page.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use basket_core::ProductForm;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /templates/{name}`
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ProductForm>> {
    let mut form = ProductForm::blank(&state.schema);
    state.templates.apply(&name, &state.schema, &mut form)?;

    debug!(template = %name, "Applied product template");
    Ok(Json(form))
}

#[cfg(test)]
mod tests {
    use crate::config::WebshopConfig;
    use crate::routes::test_support::*;
    use axum::http::StatusCode;

    async fn app() -> axum::Router {
        let config = WebshopConfig::from_toml(
            r#"
            [templates.beer]
            title = "Beer"
            cost = 250
            maxSoldPerCustomer = 10
            chOnly = true
            "#,
        )
        .unwrap();
        test_app_with(config).await.0
    }

    #[tokio::test]
    async fn test_template_fills_form() {
        let app = app().await;
        let (status, body) = send(&app, request("GET", "/templates/beer")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Beer");
        assert_eq!(body["cost"], "2.50");
        assert_eq!(body["maxSoldPerCustomer"], "10");
        assert_eq!(body["chOnly"], true);
        assert_eq!(body["reservable"], false);
    }

    #[tokio::test]
    async fn test_unknown_template() {
        let app = app().await;
        let (status, body) = send(&app, request("GET", "/templates/wine")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
