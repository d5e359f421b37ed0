//! Persistence port.
//!
//! The engine never talks to a database directly: it calls a
//! [`MarketStore`]. Every method that writes more than one record commits
//! them as a single unit, or not at all, and returns the authoritative
//! post-write state so callers never re-fetch after a mutation.

use predmatch_types::{
    Account, AccountId, Market, MarketId, Order, OrderId, OrderStatus, Outcome, Result,
};
use rust_decimal::Decimal;

/// Selects orders for [`MarketStore::orders`].
///
/// Unset fields match everything. Results are ordered by creation time
/// (store sequence as tie-break), oldest first unless `newest_first`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub market_id: Option<MarketId>,
    pub account_id: Option<AccountId>,
    pub statuses: Option<Vec<OrderStatus>>,
    pub outcome: Option<Outcome>,
    pub price: Option<Decimal>,
    pub newest_first: bool,
}

impl OrderFilter {
    /// All orders of one market.
    #[must_use]
    pub fn market(market_id: MarketId) -> Self {
        Self {
            market_id: Some(market_id),
            ..Self::default()
        }
    }

    /// Restrict to the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, statuses: &[OrderStatus]) -> Self {
        self.statuses = Some(statuses.to_vec());
        self
    }

    /// Restrict to orders that may still take fills.
    #[must_use]
    pub fn resting(self) -> Self {
        self.with_statuses(&[OrderStatus::Pending, OrderStatus::PartlyFilled])
    }

    #[must_use]
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Whether `order` passes every set criterion.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.market_id.is_none_or(|m| order.market_id == m)
            && self.account_id.is_none_or(|a| order.account_id == a)
            && self
                .statuses
                .as_ref()
                .is_none_or(|s| s.contains(&order.status))
            && self.outcome.is_none_or(|o| order.outcome == o)
            && self.price.is_none_or(|p| order.price == p)
    }
}

/// A credit to apply during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceCredit {
    pub account_id: AccountId,
    pub amount: Decimal,
}

/// Persistence collaborator of the engine.
pub trait MarketStore: Send + Sync {
    /// Insert a new market.
    fn insert_market(&self, market: Market) -> Result<Market>;

    /// Fetch a market. `MarketNotFound` if absent.
    fn market(&self, market_id: MarketId) -> Result<Market>;

    /// Replace the stored market fields. `MarketNotFound` if absent.
    fn update_market(&self, market: &Market) -> Result<Market>;

    /// Insert a new account.
    fn insert_account(&self, account: Account) -> Result<Account>;

    /// Fetch an account. `AccountNotFound` if absent.
    fn account(&self, account_id: AccountId) -> Result<Account>;

    /// Apply a signed delta to a balance against its current value.
    /// Rejects (without change) a delta that would make it negative.
    /// Returns the new balance.
    fn apply_balance_delta(&self, account_id: AccountId, delta: Decimal) -> Result<Decimal>;

    /// Like [`MarketStore::apply_balance_delta`], but only when the balance
    /// still equals `expected`; otherwise `WriteConflict` and no change.
    fn apply_balance_delta_if(
        &self,
        account_id: AccountId,
        expected: Decimal,
        delta: Decimal,
    ) -> Result<Decimal>;

    /// Fetch an order. `OrderNotFound` if absent.
    fn order(&self, order_id: OrderId) -> Result<Order>;

    /// Orders matching `filter`, in creation order.
    fn orders(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Record a placement as one unit: debit the new order's notional from
    /// its owner, insert it (assigning the insertion sequence), overwrite the
    /// makers it matched and replace the market. `order` and `makers` carry
    /// their post-match fills. Returns the stored order and the owner's new
    /// balance.
    fn commit_placement(
        &self,
        market: &Market,
        order: Order,
        makers: &[Order],
    ) -> Result<(Order, Decimal)>;

    /// Overwrite existing orders and their market as one unit.
    /// `OrderNotFound` (and no write) if any order is unknown.
    fn commit_orders(&self, market: &Market, orders: &[Order]) -> Result<Vec<Order>>;

    /// Apply settlement credits, overwrite the market's orders and the market
    /// itself, as one unit. Returns each credited account's new balance.
    fn commit_resolution(
        &self,
        market: &Market,
        orders: &[Order],
        credits: &[BalanceCredit],
    ) -> Result<Vec<(AccountId, Decimal)>>;
}
