//! # Basket Repository
//!
//! Durable key-value persistence for named baskets.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Basket Record Lifecycle                             │
//! │                                                                         │
//! │  load(key)                                                             │
//! │   ├── no row ─────────────────────────────► empty basket               │
//! │   ├── row parses into a valid basket ─────► that basket                │
//! │   └── row is garbage / breaks invariants ─► warn!, empty basket        │
//! │                                                                         │
//! │  save(key, basket)                                                     │
//! │   └── single INSERT .. ON CONFLICT DO UPDATE                           │
//! │       readers see the old record or the new one, never a mix           │
//! │                                                                         │
//! │  Several pages on one key: last writer wins.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::Basket;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Repository for basket records.
#[derive(Debug, Clone)]
pub struct BasketRepository {
    pool: SqlitePool,
}

impl BasketRepository {
    /// Creates a new BasketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BasketRepository { pool }
    }

    /// Loads the basket stored under `storage_key`.
    ///
    /// Missing and corrupt records both come back as an empty basket. Only
    /// database failures are errors.
    pub async fn load(&self, storage_key: &str) -> StoreResult<Basket> {
        match self.load_checked(storage_key).await {
            Ok(Some(basket)) => Ok(basket),
            Ok(None) => Ok(Basket::new()),
            Err(StoreError::StorageCorrupt { key, reason }) => {
                warn!(storage_key = %key, reason = %reason, "Discarding corrupt basket record");
                Ok(Basket::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Loads the basket stored under `storage_key`, reporting corruption.
    ///
    /// ## Returns
    /// * `Ok(None)` - Nothing stored
    /// * `Err(StoreError::StorageCorrupt)` - Record does not parse into a valid basket
    pub async fn load_checked(&self, storage_key: &str) -> StoreResult<Option<Basket>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM basket_storage WHERE storage_key = ?1")
                .bind(storage_key)
                .fetch_optional(&self.pool)
                .await?;

        let Some(payload) = payload else {
            debug!(storage_key = %storage_key, "No stored basket");
            return Ok(None);
        };

        let basket: Basket =
            serde_json::from_str(&payload).map_err(|e| StoreError::StorageCorrupt {
                key: storage_key.to_string(),
                reason: e.to_string(),
            })?;

        debug!(storage_key = %storage_key, lines = basket.len(), "Loaded basket");
        Ok(Some(basket))
    }

    /// Saves `basket` under `storage_key`, replacing any previous record.
    pub async fn save(&self, storage_key: &str, basket: &Basket) -> StoreResult<()> {
        let payload =
            serde_json::to_string(basket).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO basket_storage (storage_key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(storage_key)
        .bind(&payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(
            storage_key = %storage_key,
            lines = basket.len(),
            items = basket.summarize(&basket_core::FeeRule::none()).item_count,
            "Saved basket"
        );
        Ok(())
    }

    /// Deletes the record under `storage_key`.
    ///
    /// ## Returns
    /// Whether a record existed.
    pub async fn delete(&self, storage_key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM basket_storage WHERE storage_key = ?1")
            .bind(storage_key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
