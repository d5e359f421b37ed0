//! In-memory [`MarketStore`].
//!
//! All state sits behind one `RwLock`, so every multi-record write is
//! trivially atomic: validation happens first, and only when every check
//! passes is anything written. Used by tests and single-process deployments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use predmatch_types::{
    Account, AccountId, Market, MarketId, Order, OrderId, PredmatchError, Result,
};
use rust_decimal::Decimal;

use crate::store::{BalanceCredit, MarketStore, OrderFilter};

#[derive(Debug, Default)]
struct Inner {
    markets: HashMap<MarketId, Market>,
    accounts: HashMap<AccountId, Account>,
    orders: HashMap<OrderId, Order>,
    next_sequence: u64,
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    /// When set, every write fails with `StorageUnavailable`.
    unavailable: AtomicBool,
    /// Writes left before the store starts failing; `None` is unlimited.
    write_budget: Mutex<Option<u64>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a storage outage for subsequent writes.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Let the next `writes` writes through, then fail every later one with
    /// `StorageUnavailable`. `None` lifts the limit.
    pub fn fail_writes_after(&self, writes: Option<u64>) {
        *self.write_budget.lock() = writes;
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PredmatchError::StorageUnavailable {
                reason: "memory store marked unavailable".to_string(),
            });
        }
        let mut budget = self.write_budget.lock();
        match *budget {
            Some(0) => Err(PredmatchError::StorageUnavailable {
                reason: "memory store write budget exhausted".to_string(),
            }),
            Some(left) => {
                *budget = Some(left - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Sum of every account balance.
    #[must_use]
    pub fn total_balances(&self) -> Decimal {
        self.inner.read().accounts.values().map(|a| a.balance).sum()
    }
}

impl MarketStore for MemoryStore {
    fn insert_market(&self, market: Market) -> Result<Market> {
        self.check_available()?;
        let mut inner = self.inner.write();
        if inner.markets.contains_key(&market.id) {
            return Err(PredmatchError::WriteConflict {
                reason: format!("market {} already exists", market.id),
            });
        }
        inner.markets.insert(market.id, market.clone());
        Ok(market)
    }

    fn market(&self, market_id: MarketId) -> Result<Market> {
        self.inner
            .read()
            .markets
            .get(&market_id)
            .cloned()
            .ok_or(PredmatchError::MarketNotFound(market_id))
    }

    fn update_market(&self, market: &Market) -> Result<Market> {
        self.check_available()?;
        let mut inner = self.inner.write();
        let stored = inner
            .markets
            .get_mut(&market.id)
            .ok_or(PredmatchError::MarketNotFound(market.id))?;
        *stored = market.clone();
        Ok(stored.clone())
    }

    fn insert_account(&self, account: Account) -> Result<Account> {
        self.check_available()?;
        if account.balance < Decimal::ZERO {
            return Err(PredmatchError::InvalidRequest {
                reason: format!("opening balance {} is negative", account.balance),
            });
        }
        let mut inner = self.inner.write();
        if inner.accounts.contains_key(&account.id) {
            return Err(PredmatchError::WriteConflict {
                reason: format!("account {} already exists", account.id),
            });
        }
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn account(&self, account_id: AccountId) -> Result<Account> {
        self.inner
            .read()
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or(PredmatchError::AccountNotFound(account_id))
    }

    fn apply_balance_delta(&self, account_id: AccountId, delta: Decimal) -> Result<Decimal> {
        self.check_available()?;
        let mut inner = self.inner.write();
        inner
            .accounts
            .get_mut(&account_id)
            .ok_or(PredmatchError::AccountNotFound(account_id))?
            .apply_delta(delta)
    }

    fn apply_balance_delta_if(
        &self,
        account_id: AccountId,
        expected: Decimal,
        delta: Decimal,
    ) -> Result<Decimal> {
        self.check_available()?;
        let mut inner = self.inner.write();
        let account = inner
            .accounts
            .get_mut(&account_id)
            .ok_or(PredmatchError::AccountNotFound(account_id))?;
        if account.balance != expected {
            return Err(PredmatchError::WriteConflict {
                reason: format!(
                    "balance of {account_id} is {}, expected {expected}",
                    account.balance
                ),
            });
        }
        account.apply_delta(delta)
    }

    fn order(&self, order_id: OrderId) -> Result<Order> {
        self.inner
            .read()
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(PredmatchError::OrderNotFound(order_id))
    }

    fn orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let inner = self.inner.read();
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by_key(Order::time_priority);
        if filter.newest_first {
            orders.reverse();
        }
        Ok(orders)
    }

    fn commit_placement(
        &self,
        market: &Market,
        mut order: Order,
        makers: &[Order],
    ) -> Result<(Order, Decimal)> {
        self.check_available()?;
        let mut inner = self.inner.write();

        // Validate everything before the first write.
        if !inner.markets.contains_key(&market.id) {
            return Err(PredmatchError::MarketNotFound(market.id));
        }
        if inner.orders.contains_key(&order.id) {
            return Err(PredmatchError::WriteConflict {
                reason: format!("order {} already exists", order.id),
            });
        }
        if let Some(missing) = makers.iter().find(|o| !inner.orders.contains_key(&o.id)) {
            return Err(PredmatchError::OrderNotFound(missing.id));
        }
        let needed = order.notional();
        let account = inner
            .accounts
            .get(&order.account_id)
            .ok_or(PredmatchError::AccountNotFound(order.account_id))?;
        if account.balance < needed {
            return Err(PredmatchError::InsufficientBalance {
                needed,
                available: account.balance,
            });
        }

        let balance = inner
            .accounts
            .get_mut(&order.account_id)
            .ok_or(PredmatchError::AccountNotFound(order.account_id))?
            .apply_delta(-needed)?;
        order.sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.orders.insert(order.id, order.clone());
        for maker in makers {
            inner.orders.insert(maker.id, maker.clone());
        }
        inner.markets.insert(market.id, market.clone());
        Ok((order, balance))
    }

    fn commit_orders(&self, market: &Market, orders: &[Order]) -> Result<Vec<Order>> {
        self.check_available()?;
        let mut inner = self.inner.write();
        if !inner.markets.contains_key(&market.id) {
            return Err(PredmatchError::MarketNotFound(market.id));
        }
        if let Some(missing) = orders.iter().find(|o| !inner.orders.contains_key(&o.id)) {
            return Err(PredmatchError::OrderNotFound(missing.id));
        }
        for order in orders {
            inner.orders.insert(order.id, order.clone());
        }
        inner.markets.insert(market.id, market.clone());
        Ok(orders.to_vec())
    }

    fn commit_resolution(
        &self,
        market: &Market,
        orders: &[Order],
        credits: &[BalanceCredit],
    ) -> Result<Vec<(AccountId, Decimal)>> {
        self.check_available()?;
        let mut inner = self.inner.write();

        // Validate everything before the first write.
        if !inner.markets.contains_key(&market.id) {
            return Err(PredmatchError::MarketNotFound(market.id));
        }
        if let Some(missing) = orders.iter().find(|o| !inner.orders.contains_key(&o.id)) {
            return Err(PredmatchError::OrderNotFound(missing.id));
        }
        if let Some(missing) = credits
            .iter()
            .find(|c| !inner.accounts.contains_key(&c.account_id))
        {
            return Err(PredmatchError::AccountNotFound(missing.account_id));
        }
        if let Some(negative) = credits.iter().find(|c| c.amount < Decimal::ZERO) {
            return Err(PredmatchError::InvalidRequest {
                reason: format!(
                    "settlement credit {} for {} is negative",
                    negative.amount, negative.account_id
                ),
            });
        }

        let mut balances = Vec::with_capacity(credits.len());
        for credit in credits {
            if let Some(account) = inner.accounts.get_mut(&credit.account_id) {
                let balance = account.apply_delta(credit.amount)?;
                balances.push((credit.account_id, balance));
            }
        }
        for order in orders {
            inner.orders.insert(order.id, order.clone());
        }
        inner.markets.insert(market.id, market.clone());
        Ok(balances)
    }
}
