//! # Basket Presenter
//!
//! Owns one basket, maps page events to engine transitions, and builds the
//! view the page renders.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Presenter Flow                                   │
//! │                                                                         │
//! │  BasketEvent ──► handle() ──► engine transition ──► Reaction            │
//! │                                                        │                │
//! │                        ┌───────────────────────────────┤                │
//! │                        ▼               ▼               ▼                │
//! │                   persist?         rerender?      notification?         │
//! │                  (adapter saves)  (view())       (pulse / shake)        │
//! │                                                                         │
//! │  "Add" state machine:                                                   │
//! │                                                                         │
//! │     Idle ──► LimitCheck ──┬──► Added     pulse + "Product added..."     │
//! │                           └──► Rejected  shake + "You reached..."       │
//! │                                                                         │
//! │  Notifications expire by deadline. Nothing waits on them, so the next   │
//! │  event is handled immediately even while a toast is showing.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The presenter performs no I/O. The adapter driving it reads the
//! [`Reaction`] and saves, reloads or renders accordingly.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::basket::Basket;
use crate::encoder::{FormField, OrderEncoder};
use crate::error::BasketError;
use crate::money::{CurrencyFormat, Money};
use crate::summary::FeeRule;
use crate::types::ProductOffer;

/// Toast shown after a successful add.
pub const ADDED_MESSAGE: &str = "Product added to your shopping basket.";

/// Toast shown when the customer limit stops an add.
pub const LIMIT_MESSAGE: &str = "You reached the maximum sold per customer.";

/// Text of the empty basket state.
pub const EMPTY_MESSAGE: &str = "Shopping basket is empty!";

/// Label of the fee row.
pub const ADMINISTRATION_COSTS_LABEL: &str = "Administration costs";

/// How long a toast stays visible.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

// =============================================================================
// Settings
// =============================================================================

/// Deployment-specific presenter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterSettings {
    pub fee: FeeRule,
    pub currency: CurrencyFormat,
    pub encoder: OrderEncoder,
    pub notification_duration: Duration,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        PresenterSettings {
            fee: FeeRule::flat(Money::from_cents(crate::DEFAULT_TRANSACTION_FEE_CENTS)),
            currency: CurrencyFormat::default(),
            encoder: OrderEncoder::checkout(),
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }
}

// =============================================================================
// Events & Reactions
// =============================================================================

/// Something the customer did on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum BasketEvent {
    /// An "add to basket" button.
    Add(ProductOffer),
    /// The "+" control of a row.
    Increase { key: String },
    /// The "−" control of a row.
    Decrease { key: String },
    /// Remove a row entirely.
    Remove { key: String },
    /// The "empty basket" button.
    Empty,
    /// The order form is being submitted.
    Submit,
    /// The server accepted the order.
    SubmissionSucceeded,
    /// The server rejected the order, or it never arrived.
    SubmissionFailed,
}

/// Where the last "add" ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum AddState {
    #[default]
    Idle,
    LimitCheck,
    Added,
    Rejected,
}

/// Animation on the basket button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Effect {
    Pulse,
    Shake,
}

/// A transient toast plus button effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notification {
    pub effect: Effect,
    pub message: String,
    #[serde(skip)]
    #[ts(skip)]
    shown_at: Option<Instant>,
    #[serde(skip)]
    #[ts(skip)]
    duration: Duration,
}

impl Notification {
    fn new(effect: Effect, message: &str, shown_at: Instant, duration: Duration) -> Self {
        Notification {
            effect,
            message: message.to_string(),
            shown_at: Some(shown_at),
            duration,
        }
    }

    /// Whether the toast is still visible at `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        match self.shown_at {
            Some(shown_at) => now.saturating_duration_since(shown_at) < self.duration,
            None => false,
        }
    }

    /// When the toast disappears.
    pub fn expires_at(&self) -> Option<Instant> {
        self.shown_at.map(|shown_at| shown_at + self.duration)
    }
}

/// What the adapter must do after an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reaction {
    /// The basket changed and must be saved.
    pub persist: bool,
    /// The page must be rendered again.
    pub rerender: bool,
    /// The page referenced a stale line: reload the saved basket first.
    pub reload: bool,
    /// Toast to show, if any.
    pub notification: Option<Notification>,
    /// Order fields to submit (only for [`BasketEvent::Submit`]).
    pub fields: Vec<FormField>,
    /// The rejected transition, if any.
    pub error: Option<BasketError>,
}

impl Reaction {
    fn changed() -> Self {
        Reaction {
            persist: true,
            rerender: true,
            ..Reaction::default()
        }
    }

    fn rejected(error: BasketError) -> Self {
        let reload = matches!(error, BasketError::NotFound { .. });
        Reaction {
            rerender: true,
            reload,
            error: Some(error),
            ..Reaction::default()
        }
    }
}

// =============================================================================
// View
// =============================================================================

/// One rendered basket row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ViewRow {
    pub key: String,
    pub title: String,
    pub amount: u32,
    /// Formatted, e.g. `€ 20,00`.
    pub line_total: String,
}

/// The rendered basket: a distinct empty state, or rows plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "state", rename_all = "camelCase")]
#[ts(export)]
pub enum BasketView {
    #[serde(rename_all = "camelCase")]
    Empty { message: String, item_count: u32 },
    #[serde(rename_all = "camelCase")]
    Filled {
        rows: Vec<ViewRow>,
        administration_costs_label: String,
        administration_costs: String,
        item_count: u32,
        total: String,
    },
}

impl BasketView {
    pub fn is_empty(&self) -> bool {
        matches!(self, BasketView::Empty { .. })
    }
}

// =============================================================================
// Presenter
// =============================================================================

/// One page's basket and its interaction state.
#[derive(Debug, Clone)]
pub struct BasketPresenter {
    basket: Basket,
    settings: PresenterSettings,
    add_state: AddState,
    notification: Option<Notification>,
    submission_pending: bool,
}

impl BasketPresenter {
    /// Creates a presenter over a basket loaded by the caller.
    pub fn new(settings: PresenterSettings, basket: Basket) -> Self {
        BasketPresenter {
            basket,
            settings,
            add_state: AddState::Idle,
            notification: None,
            submission_pending: false,
        }
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn settings(&self) -> &PresenterSettings {
        &self.settings
    }

    pub fn add_state(&self) -> AddState {
        self.add_state
    }

    /// Whether fields were handed out and no outcome has arrived yet.
    pub fn submission_pending(&self) -> bool {
        self.submission_pending
    }

    /// Swaps in a freshly loaded basket (after a reload).
    pub fn replace_basket(&mut self, basket: Basket) {
        self.basket = basket;
    }

    /// The toast still visible at `now`, if any.
    pub fn active_notification(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_active(now))
    }

    /// Handles one page event.
    pub fn handle(&mut self, event: BasketEvent, now: Instant) -> Reaction {
        match event {
            BasketEvent::Add(offer) => self.add(&offer, now),
            BasketEvent::Increase { key } => match self.basket.increment(&key) {
                Ok(_) => Reaction::changed(),
                Err(err) => self.reject(err, now),
            },
            BasketEvent::Decrease { key } => match self.basket.decrement(&key) {
                Ok(_) => Reaction::changed(),
                Err(err) => self.reject(err, now),
            },
            BasketEvent::Remove { key } => {
                if self.basket.remove(&key).is_some() {
                    Reaction::changed()
                } else {
                    Reaction::default()
                }
            }
            BasketEvent::Empty => {
                self.basket.clear();
                Reaction::changed()
            }
            BasketEvent::Submit => {
                self.submission_pending = true;
                Reaction {
                    fields: self.settings.encoder.encode_basket(&self.basket),
                    ..Reaction::default()
                }
            }
            // A confirmation without a pending submission changes nothing.
            BasketEvent::SubmissionSucceeded if !self.submission_pending => Reaction::default(),
            BasketEvent::SubmissionSucceeded => {
                self.submission_pending = false;
                self.basket.clear();
                Reaction::changed()
            }
            BasketEvent::SubmissionFailed => {
                self.submission_pending = false;
                Reaction {
                    rerender: true,
                    ..Reaction::default()
                }
            }
        }
    }

    fn add(&mut self, offer: &ProductOffer, now: Instant) -> Reaction {
        self.add_state = AddState::LimitCheck;

        match self.basket.add_or_increment(offer) {
            Ok(_) => {
                self.add_state = AddState::Added;
                let mut reaction = Reaction::changed();
                reaction.notification = Some(self.notify(Effect::Pulse, ADDED_MESSAGE, now));
                reaction
            }
            Err(err) => {
                self.add_state = AddState::Rejected;
                self.reject(err, now)
            }
        }
    }

    fn reject(&mut self, error: BasketError, now: Instant) -> Reaction {
        let notification = match error {
            BasketError::LimitReached { .. } => Some(self.notify(Effect::Shake, LIMIT_MESSAGE, now)),
            BasketError::NotFound { .. } => None,
        };

        Reaction {
            notification,
            ..Reaction::rejected(error)
        }
    }

    fn notify(&mut self, effect: Effect, message: &str, now: Instant) -> Notification {
        let notification = Notification::new(
            effect,
            message,
            now,
            self.settings.notification_duration,
        );
        self.notification = Some(notification.clone());
        notification
    }

    /// Builds the view of the current basket.
    pub fn view(&self) -> BasketView {
        if self.basket.is_empty() {
            return BasketView::Empty {
                message: EMPTY_MESSAGE.to_string(),
                item_count: 0,
            };
        }

        let currency = &self.settings.currency;
        let summary = self.basket.summarize(&self.settings.fee);

        let rows = self
            .basket
            .lines()
            .iter()
            .map(|line| ViewRow {
                key: line.key.clone(),
                title: line.title.clone(),
                amount: line.amount,
                line_total: currency.format(line.line_total()),
            })
            .collect();

        BasketView::Filled {
            rows,
            administration_costs_label: ADMINISTRATION_COSTS_LABEL.to_string(),
            administration_costs: currency.format(summary.fee),
            item_count: summary.item_count,
            total: currency.format(summary.total),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CustomerLimit;

    fn presenter() -> BasketPresenter {
        BasketPresenter::new(PresenterSettings::default(), Basket::new())
    }

    fn ticket(limit: u32) -> ProductOffer {
        ProductOffer::new(
            "P1",
            "Ticket A",
            Money::from_cents(1000),
            CustomerLimit::AtMost(limit),
        )
    }

    #[test]
    fn test_empty_view() {
        let view = presenter().view();
        assert_eq!(
            view,
            BasketView::Empty {
                message: "Shopping basket is empty!".to_string(),
                item_count: 0
            }
        );
    }

    #[test]
    fn test_add_pulses_and_renders() {
        let mut p = presenter();
        let now = Instant::now();

        let reaction = p.handle(BasketEvent::Add(ticket(2)), now);
        assert!(reaction.persist);
        assert!(reaction.rerender);
        assert_eq!(p.add_state(), AddState::Added);

        let toast = reaction.notification.unwrap();
        assert_eq!(toast.effect, Effect::Pulse);
        assert_eq!(toast.message, ADDED_MESSAGE);

        match p.view() {
            BasketView::Filled {
                rows,
                administration_costs,
                item_count,
                total,
                ..
            } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].line_total, "€ 10,00");
                assert_eq!(administration_costs, "€ 0,35");
                assert_eq!(item_count, 1);
                assert_eq!(total, "€ 10,35");
            }
            other => panic!("expected filled view, got {:?}", other),
        }
    }

    #[test]
    fn test_limit_shakes_without_persisting() {
        let mut p = presenter();
        let now = Instant::now();
        p.handle(BasketEvent::Add(ticket(1)), now);

        let reaction = p.handle(BasketEvent::Add(ticket(1)), now);
        assert!(!reaction.persist);
        assert_eq!(p.add_state(), AddState::Rejected);
        assert!(matches!(reaction.error, Some(BasketError::LimitReached { .. })));

        let toast = reaction.notification.unwrap();
        assert_eq!(toast.effect, Effect::Shake);
        assert_eq!(toast.message, LIMIT_MESSAGE);
        assert_eq!(p.basket().get("P1").unwrap().amount, 1);
    }

    #[test]
    fn test_notification_expires_without_blocking() {
        let mut p = presenter();
        let start = Instant::now();
        p.handle(BasketEvent::Add(ticket(1)), start);
        p.handle(BasketEvent::Add(ticket(1)), start);

        assert!(p.active_notification(start + Duration::from_millis(2999)).is_some());
        assert!(p.active_notification(start + Duration::from_millis(3000)).is_none());

        // The toast is still up, yet the next event goes through.
        let reaction = p.handle(
            BasketEvent::Decrease {
                key: "P1".to_string(),
            },
            start + Duration::from_millis(10),
        );
        assert!(reaction.persist);
        assert!(p.basket().is_empty());
    }

    #[test]
    fn test_stale_key_requests_reload() {
        let mut p = presenter();
        let reaction = p.handle(
            BasketEvent::Increase {
                key: "gone".to_string(),
            },
            Instant::now(),
        );

        assert!(reaction.reload);
        assert!(reaction.rerender);
        assert!(!reaction.persist);
        assert!(reaction.notification.is_none());
    }

    #[test]
    fn test_remove_missing_is_quiet() {
        let mut p = presenter();
        let reaction = p.handle(
            BasketEvent::Remove {
                key: "gone".to_string(),
            },
            Instant::now(),
        );
        assert_eq!(reaction, Reaction::default());
    }

    #[test]
    fn test_submit_keeps_basket_until_confirmed() {
        let mut p = presenter();
        let now = Instant::now();
        p.handle(BasketEvent::Add(ticket(4)), now);
        p.handle(BasketEvent::Add(ticket(4)), now);

        let reaction = p.handle(BasketEvent::Submit, now);
        assert!(p.submission_pending());
        assert!(!reaction.persist);
        assert_eq!(reaction.fields.len(), 2);
        assert_eq!(reaction.fields[1].value, "2");

        let reaction = p.handle(BasketEvent::SubmissionFailed, now);
        assert!(!reaction.persist);
        assert_eq!(p.basket().len(), 1);

        p.handle(BasketEvent::Submit, now);
        let reaction = p.handle(BasketEvent::SubmissionSucceeded, now);
        assert!(reaction.persist);
        assert!(p.basket().is_empty());
        assert!(!p.submission_pending());
        assert!(p.view().is_empty());
    }

    #[test]
    fn test_confirmation_without_submit_is_ignored() {
        let mut p = presenter();
        let now = Instant::now();
        p.handle(BasketEvent::Add(ticket(4)), now);

        let reaction = p.handle(BasketEvent::SubmissionSucceeded, now);
        assert_eq!(reaction, Reaction::default());
        assert_eq!(p.basket().len(), 1);

        p.handle(BasketEvent::Submit, now);
        p.handle(BasketEvent::SubmissionFailed, now);
        p.handle(BasketEvent::SubmissionSucceeded, now);
        assert_eq!(p.basket().len(), 1);
    }

    #[test]
    fn test_empty_event_clears() {
        let mut p = presenter();
        let now = Instant::now();
        p.handle(BasketEvent::Add(ticket(4)), now);

        let reaction = p.handle(BasketEvent::Empty, now);
        assert!(reaction.persist);
        assert!(p.basket().is_empty());
    }

    #[test]
    fn test_event_wire_shape() {
        let event: BasketEvent =
            serde_json::from_str(r#"{"type":"increase","key":"P1"}"#).unwrap();
        assert_eq!(
            event,
            BasketEvent::Increase {
                key: "P1".to_string()
            }
        );

        let event: BasketEvent = serde_json::from_str(
            r#"{"type":"add","key":"P1","title":"Ticket A","unitCost":1000,"limit":2}"#,
        )
        .unwrap();
        assert_eq!(event, BasketEvent::Add(ticket(2)));
    }

    #[test]
    fn test_filled_view_wire_shape() {
        let mut p = presenter();
        p.handle(BasketEvent::Add(ticket(2)), Instant::now());

        let json = serde_json::to_value(p.view()).unwrap();
        assert_eq!(json["state"], "filled");
        assert_eq!(json["itemCount"], 1);
        assert_eq!(json["rows"][0]["lineTotal"], "€ 10,00");
        assert_eq!(json["administrationCostsLabel"], "Administration costs");
    }
}
