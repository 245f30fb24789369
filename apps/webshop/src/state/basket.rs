//! # Basket State
//!
//! The page's basket presenter, shared by every route.
//!
//! ## Event Round Trip
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Basket Request                                   │
//! │                                                                         │
//! │  HTTP request ──► BasketEvent                                          │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  lock presenter ──► presenter.handle(event, now) ──► Reaction          │
//! │                                                        │                │
//! │           ┌────────────────────────────────────────────┤                │
//! │           ▼                                            ▼                │
//! │  reaction.reload?                             reaction.persist?        │
//! │  load stored basket,                          save basket under        │
//! │  replace the snapshot                         the storage key          │
//! │           │                                            │                │
//! │           └──────────────────┬─────────────────────────┘                │
//! │                              ▼                                          │
//! │                    BasketResponse (view, toast, error, fields)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The presenter sits behind a `tokio::sync::Mutex`, held across the store
//! round trip so two requests never interleave their transitions.
//! Transitions are applied to a copy that is committed only once storage
//! has accepted them.

use std::time::Instant;

use basket_core::presenter::{AddState, Notification, EMPTY_MESSAGE};
use basket_core::{
    Basket, BasketEvent, BasketPresenter, BasketSummary, BasketView, FormField, PresenterSettings,
};
use basket_store::{Database, StoreResult};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};

/// What every basket route answers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketResponse {
    pub view: BasketView,
    pub summary: BasketSummary,
    pub add_state: AddState,
    pub submission_pending: bool,

    /// Toast still visible, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,

    /// The rejected transition (limit reached, stale line).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    /// Order fields, present after a submit.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FormField>,
}

impl BasketResponse {
    fn capture(presenter: &BasketPresenter, now: Instant) -> Self {
        BasketResponse {
            view: presenter.view(),
            summary: presenter.basket().summarize(&presenter.settings().fee),
            add_state: presenter.add_state(),
            submission_pending: presenter.submission_pending(),
            notification: presenter.active_notification(now).cloned(),
            error: None,
            fields: Vec::new(),
        }
    }
}

/// The presenter of the configured basket plus its storage key.
#[derive(Debug)]
pub struct BasketState {
    storage_key: String,
    presenter: Mutex<BasketPresenter>,
}

impl BasketState {
    /// Loads the stored basket once and wraps it in a presenter.
    pub async fn load(
        db: &Database,
        storage_key: impl Into<String>,
        settings: PresenterSettings,
    ) -> StoreResult<Self> {
        let storage_key = storage_key.into();
        let basket = db.baskets().load(&storage_key).await?;

        info!(
            storage_key = %storage_key,
            lines = basket.len(),
            "Basket snapshot loaded"
        );

        Ok(BasketState {
            storage_key,
            presenter: Mutex::new(BasketPresenter::new(settings, basket)),
        })
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Current view, without touching storage.
    pub async fn snapshot(&self) -> BasketResponse {
        let presenter = self.presenter.lock().await;
        BasketResponse::capture(&presenter, Instant::now())
    }

    /// A copy of the current basket.
    pub async fn basket(&self) -> Basket {
        self.presenter.lock().await.basket().clone()
    }

    /// Runs one event through the presenter and carries out its reaction.
    ///
    /// The event runs against a copy of the presenter; the copy replaces the
    /// shared one only after the store round trip succeeded, so a failed save
    /// leaves memory matching storage.
    pub async fn dispatch(&self, db: &Database, event: BasketEvent) -> ApiResult<BasketResponse> {
        let now = Instant::now();
        let mut presenter = self.presenter.lock().await;

        if matches!(event, BasketEvent::Submit) && presenter.basket().is_empty() {
            return Err(ApiError::validation(EMPTY_MESSAGE));
        }

        debug!(storage_key = %self.storage_key, ?event, "Basket event");
        let mut next = presenter.clone();
        let reaction = next.handle(event, now);

        if reaction.reload {
            warn!(storage_key = %self.storage_key, "Stale basket reference, reloading");
            let stored = db.baskets().load(&self.storage_key).await?;
            next.replace_basket(stored);
        }

        if reaction.persist {
            db.baskets().save(&self.storage_key, next.basket()).await?;
        }

        *presenter = next;

        let mut response = BasketResponse::capture(&presenter, now);
        response.error = reaction.error.map(ApiError::from);
        response.fields = reaction.fields;
        Ok(response)
    }
}
