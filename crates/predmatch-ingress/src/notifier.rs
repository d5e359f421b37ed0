//! Notifier port for market events.
//!
//! Notifications are fire-and-forget: the engine publishes after the
//! market's exclusive section is released and never observes a failure.
//! Implementations must return quickly.

use parking_lot::Mutex;
use predmatch_types::{MarketEvent, MarketId};
use tracing::info;

/// Receiver of engine events.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: &MarketEvent);
}

/// Broadcasts events to every registered notifier.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: &MarketEvent) {
        for notifier in &self.notifiers {
            notifier.notify(event);
        }
    }
}

/// Drops every event.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: &MarketEvent) {}
}

/// Logs every event via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &MarketEvent) {
        match event {
            MarketEvent::OrderAccepted(e) => {
                info!(
                    market_id = %e.market_id,
                    order_id = %e.order.id,
                    status = %e.order.status,
                    balance = %e.remaining_balance,
                    "Order accepted"
                );
            }
            MarketEvent::OrderMatched(e) => {
                info!(
                    market_id = %e.market_id,
                    order_id = %e.order_id,
                    executed = e.executed_quantity,
                    filled = e.filled_quantity,
                    total = e.total_quantity,
                    execution = ?e.execution,
                    "Order matched"
                );
            }
            MarketEvent::DepthChanged(e) => {
                info!(
                    market_id = %e.market_id,
                    yes_levels = e.depth.yes.len(),
                    no_levels = e.depth.no.len(),
                    "Depth changed"
                );
            }
            MarketEvent::QuoteChanged(q) => {
                info!(
                    market_id = %q.market_id,
                    yes = %q.yes_price,
                    no = %q.no_price,
                    live = q.is_live(),
                    "Quote changed"
                );
            }
            MarketEvent::AccountSettled(e) => {
                info!(
                    market_id = %e.market_id,
                    account_id = %e.account_id,
                    winnings = %e.winnings,
                    refunds = %e.refunds,
                    balance = %e.new_balance,
                    "Account settled"
                );
            }
            MarketEvent::MarketResolved(e) => {
                info!(
                    market_id = %e.market_id,
                    resolution = %e.resolution,
                    accounts = e.accounts_paid,
                    winnings = %e.total_winnings,
                    refunds = %e.total_refunds,
                    "Market resolved"
                );
            }
            MarketEvent::HouseExecuted(e) => {
                info!(
                    market_id = %e.market_id,
                    count = e.count,
                    collected = %e.risk.money_collected,
                    max_liability = %e.risk.max_liability,
                    "House executed"
                );
            }
            MarketEvent::AccountFunded(e) => {
                info!(
                    account_id = %e.account_id,
                    amount = %e.amount,
                    balance = %e.new_balance,
                    "Account funded"
                );
            }
        }
    }
}

/// Keeps every event in memory, in publication order.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<MarketEvent>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<MarketEvent> {
        self.events.lock().clone()
    }

    /// Events of one market.
    #[must_use]
    pub fn events_for(&self, market_id: MarketId) -> Vec<MarketEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.market_id() == Some(market_id))
            .cloned()
            .collect()
    }

    /// Number of events with the given name (the serde `type` tag).
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &MarketEvent) {
        self.events.lock().push(event.clone());
    }
}
