//! `GET /health`: liveness plus a storage round trip.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use basket_store::migrations::migration_status;
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
}

/// `200` when storage answers, `503` otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (migrations_total, migrations_applied) =
        migration_status(state.db.pool()).await.unwrap_or((0, 0));

    let status = if database {
        StatusCode::OK
    } else {
        warn!("Health check failed: basket store unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "unavailable" },
            database,
            migrations_applied,
            migrations_total,
        }),
    )
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_healthy() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, request("GET", "/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], true);
        assert_eq!(body["migrationsApplied"], body["migrationsTotal"]);
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let (app, state) = test_app().await;
        state.db.close().await;

        let (status, body) = send(&app, request("GET", "/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }
}
