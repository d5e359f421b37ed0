//! Market resolution.
//!
//! Resolution is the single place where money leaves a market. Under the
//! market's exclusive section it:
//! 1. Rejects a market that is already resolved (no payout, no change)
//! 2. Settles every non-terminal order: winnings on the filled part,
//!    refund on the unfilled part
//! 3. Aggregates the credits per account
//! 4. Checks money conservation
//! 5. Commits credits, resolved orders and the resolved market as one unit
//!
//! Events are published once the section is released.

use std::collections::BTreeMap;

use chrono::Utc;
use predmatch_ingress::{BalanceCredit, EngineContext, OrderFilter};
use predmatch_types::{
    AccountId, AccountSettledEvent, MarketEvent, MarketId, MarketResolvedEvent, OrderPayout,
    OrderStatus, Outcome, PredmatchError, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::conservation::MoneyConservation;
use crate::payout::order_payout;
use crate::payout_root::payout_root_hex;

/// Outcome of a resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub market_id: MarketId,
    pub resolution: Outcome,
    pub resolved_at: chrono::DateTime<Utc>,
    /// Stakes held by the settled orders.
    pub collected: Decimal,
    pub total_winnings: Decimal,
    pub total_refunds: Decimal,
    /// `collected - winnings - refunds`.
    pub platform_retained: Decimal,
    /// One entry per credited account, ordered by account id.
    pub accounts: Vec<AccountSettledEvent>,
    /// Per-order payouts in time priority.
    pub payouts: Vec<OrderPayout>,
    /// Hex SHA-256 over `payouts`.
    pub payout_root: String,
}

impl SettlementReport {
    /// The settlement of one account, if it held orders in the market.
    #[must_use]
    pub fn account(&self, account_id: AccountId) -> Option<&AccountSettledEvent> {
        self.accounts.iter().find(|a| a.account_id == account_id)
    }
}

/// Resolve a market and pay out.
///
/// # Errors
/// - `MarketNotFound` if the market does not exist
/// - `MarketAlreadyResolved` on a second resolution (nothing changes)
/// - `ConservationViolation` if credits would exceed collected stakes
/// - persistence errors from the store (nothing is credited in that case)
pub fn resolve_market(
    ctx: &EngineContext<'_>,
    market_id: MarketId,
    resolution: Outcome,
) -> Result<SettlementReport> {
    let report = ctx
        .locks
        .with_market(market_id, || resolve_locked(ctx, market_id, resolution))?;

    let mut events: Vec<MarketEvent> = report
        .accounts
        .iter()
        .cloned()
        .map(MarketEvent::AccountSettled)
        .collect();
    events.push(MarketEvent::MarketResolved(MarketResolvedEvent {
        market_id,
        resolution,
        resolved_at: report.resolved_at,
        accounts_paid: report.accounts.len(),
        total_winnings: report.total_winnings,
        total_refunds: report.total_refunds,
    }));
    ctx.publish(events);
    Ok(report)
}

fn resolve_locked(
    ctx: &EngineContext<'_>,
    market_id: MarketId,
    resolution: Outcome,
) -> Result<SettlementReport> {
    let mut market = ctx.store.market(market_id)?;
    let resolved_at = Utc::now();
    market.resolve(resolution, resolved_at)?;

    let share = ctx.config.winner_upside_share;
    let orders = ctx.store.orders(&OrderFilter::market(market_id))?;

    let mut conservation = MoneyConservation::new();
    let mut payouts = Vec::with_capacity(orders.len());
    let mut settled = Vec::with_capacity(orders.len());
    let mut per_account: BTreeMap<AccountId, Vec<OrderPayout>> = BTreeMap::new();

    for mut order in orders {
        if order.status.is_terminal() {
            continue;
        }
        let payout = order_payout(&order, resolution, share);
        conservation.record_stake(&order);
        conservation.record_payout(&payout);
        per_account
            .entry(order.account_id)
            .or_default()
            .push(payout.clone());
        payouts.push(payout);

        order.status = OrderStatus::Resolved;
        order.updated_at = resolved_at;
        settled.push(order);
    }

    if let Err(e) = conservation.verify() {
        error!(%market_id, error = %e, "Resolution aborted");
        return Err(e);
    }

    let credits: Vec<BalanceCredit> = per_account
        .iter()
        .map(|(account_id, orders)| BalanceCredit {
            account_id: *account_id,
            amount: orders.iter().map(OrderPayout::total).sum(),
        })
        .collect();
    let balances: BTreeMap<AccountId, Decimal> = ctx
        .store
        .commit_resolution(&market, &settled, &credits)?
        .into_iter()
        .collect();

    let mut accounts = Vec::with_capacity(per_account.len());
    for (account_id, orders) in per_account {
        let new_balance = balances.get(&account_id).copied().ok_or_else(|| {
            PredmatchError::Internal(format!("no post-credit balance for {account_id}"))
        })?;
        let winnings: Decimal = orders.iter().map(|p| p.winnings).sum();
        let refunds: Decimal = orders.iter().map(|p| p.refund).sum();
        accounts.push(AccountSettledEvent {
            market_id,
            account_id,
            resolution,
            winnings,
            refunds,
            total: winnings + refunds,
            new_balance,
            orders,
        });
    }

    let payout_root = payout_root_hex(market_id, resolution, &payouts);
    info!(
        %market_id,
        %resolution,
        accounts = accounts.len(),
        orders = payouts.len(),
        collected = %conservation.collected(),
        winnings = %conservation.total_winnings(),
        refunds = %conservation.total_refunds(),
        %payout_root,
        "Market resolved"
    );

    Ok(SettlementReport {
        market_id,
        resolution,
        resolved_at,
        collected: conservation.collected(),
        total_winnings: conservation.total_winnings(),
        total_refunds: conservation.total_refunds(),
        platform_retained: conservation.platform_retained(),
        accounts,
        payouts,
        payout_root,
    })
}

#[cfg(test)]
mod tests {
    use predmatch_ingress::{MarketLocks, MarketStore, MemoryStore, RecordingNotifier};
    use predmatch_types::{Account, EngineConfig, ErrorKind, Market, MarketStatus, Order};

    use super::*;

    fn dec(mantissa: i64, scale: u32) -> Decimal {
        Decimal::new(mantissa, scale)
    }

    struct Fixture {
        store: MemoryStore,
        notifier: RecordingNotifier,
        locks: MarketLocks,
        config: EngineConfig,
        market: Market,
    }

    impl Fixture {
        fn new() -> Self {
            let store = MemoryStore::new();
            let market = store.insert_market(Market::dummy()).unwrap();
            Self {
                store,
                notifier: RecordingNotifier::new(),
                locks: MarketLocks::new(),
                config: EngineConfig::default(),
                market,
            }
        }

        fn ctx(&self) -> EngineContext<'_> {
            EngineContext::new(&self.store, &self.notifier, &self.locks, &self.config)
        }

        fn account(&self, balance: i64) -> AccountId {
            self.store
                .insert_account(Account::new(dec(balance, 0)))
                .unwrap()
                .id
        }

        /// Insert an order with the given fill, bypassing the matcher.
        fn order(&self, account: AccountId, outcome: Outcome, price: Decimal, qty: u64, filled: u64) -> Order {
            let order = Order::dummy_for(self.market.id, account, outcome, price, qty);
            let market = self.store.market(self.market.id).unwrap();
            let (mut order, _) = self.store.commit_placement(&market, order, &[]).unwrap();
            if filled > 0 {
                order.apply_fill(filled).unwrap();
                self.store.commit_orders(&market, &[order.clone()]).unwrap();
            }
            order
        }

        fn balance(&self, account: AccountId) -> Decimal {
            self.store.account(account).unwrap().balance
        }
    }

    #[test]
    fn matched_pair_winner_paid_loser_not() {
        let fx = Fixture::new();
        let (a, b) = (fx.account(100), fx.account(100));
        fx.order(a, Outcome::Yes, dec(6, 0), 10, 10);
        fx.order(b, Outcome::No, dec(4, 0), 10, 10);

        let report = resolve_market(&fx.ctx(), fx.market.id, Outcome::Yes).unwrap();
        assert_eq!(fx.balance(a), dec(136, 0));
        assert_eq!(fx.balance(b), dec(60, 0));
        assert_eq!(report.collected, dec(100, 0));
        assert_eq!(report.total_winnings, dec(96, 0));
        assert_eq!(report.platform_retained, dec(4, 0));
        assert_eq!(report.account(a).unwrap().total, dec(96, 0));
        assert_eq!(report.account(b).unwrap().total, Decimal::ZERO);
    }

    #[test]
    fn every_order_and_the_market_end_resolved() {
        let fx = Fixture::new();
        let a = fx.account(100);
        let pending = fx.order(a, Outcome::Yes, dec(2, 0), 5, 0);
        let mut cancelled = fx.order(a, Outcome::No, dec(1, 0), 5, 0);
        cancelled.status = OrderStatus::Cancelled;
        fx.store.commit_orders(&fx.market, &[cancelled.clone()]).unwrap();

        resolve_market(&fx.ctx(), fx.market.id, Outcome::No).unwrap();

        let market = fx.store.market(fx.market.id).unwrap();
        assert_eq!(market.status, MarketStatus::Resolved);
        assert_eq!(market.resolution, Some(Outcome::No));
        assert!(market.resolved_at.is_some());
        assert_eq!(fx.store.order(pending.id).unwrap().status, OrderStatus::Resolved);
        // Cancelled orders are neither paid nor touched.
        assert_eq!(fx.store.order(cancelled.id).unwrap().status, OrderStatus::Cancelled);
        // 100 - 10 - 5 + 10 refund.
        assert_eq!(fx.balance(a), dec(95, 0));
    }

    #[test]
    fn second_resolution_is_illegal_and_pays_nothing() {
        let fx = Fixture::new();
        let (a, b) = (fx.account(100), fx.account(100));
        fx.order(a, Outcome::Yes, dec(6, 0), 10, 10);
        fx.order(b, Outcome::No, dec(4, 0), 10, 10);
        resolve_market(&fx.ctx(), fx.market.id, Outcome::Yes).unwrap();
        let events = fx.notifier.events().len();

        for resolution in [Outcome::Yes, Outcome::No] {
            let err = resolve_market(&fx.ctx(), fx.market.id, resolution).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IllegalState);
        }
        assert_eq!(fx.balance(a), dec(136, 0));
        assert_eq!(fx.balance(b), dec(60, 0));
        assert_eq!(fx.notifier.events().len(), events);
        assert_eq!(
            fx.store.market(fx.market.id).unwrap().resolution,
            Some(Outcome::Yes)
        );
    }

    #[test]
    fn conservation_violation_aborts_without_mutation() {
        let fx = Fixture::new();
        let a = fx.account(100);
        // A filled Yes with no counterparty stake behind it.
        let order = fx.order(a, Outcome::Yes, dec(6, 0), 10, 10);

        let err = resolve_market(&fx.ctx(), fx.market.id, Outcome::Yes).unwrap_err();
        assert!(matches!(err, PredmatchError::ConservationViolation { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(fx.balance(a), dec(40, 0));
        assert_eq!(fx.store.order(order.id).unwrap().status, OrderStatus::Filled);
        assert!(!fx.store.market(fx.market.id).unwrap().is_resolved());
        assert!(fx.notifier.events().is_empty());
    }

    #[test]
    fn storage_outage_leaves_market_unresolved() {
        let fx = Fixture::new();
        let a = fx.account(100);
        fx.order(a, Outcome::Yes, dec(5, 0), 2, 0);
        fx.store.set_unavailable(true);

        let err = resolve_market(&fx.ctx(), fx.market.id, Outcome::No).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        fx.store.set_unavailable(false);
        assert!(!fx.store.market(fx.market.id).unwrap().is_resolved());
        assert_eq!(fx.balance(a), dec(90, 0));

        // A later attempt goes through.
        resolve_market(&fx.ctx(), fx.market.id, Outcome::No).unwrap();
        assert_eq!(fx.balance(a), dec(100, 0));
    }

    #[test]
    fn unknown_market() {
        let fx = Fixture::new();
        let err = resolve_market(&fx.ctx(), MarketId::new(), Outcome::Yes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn events_one_per_account_then_summary() {
        let fx = Fixture::new();
        let (a, b) = (fx.account(100), fx.account(100));
        fx.order(a, Outcome::Yes, dec(6, 0), 10, 10);
        fx.order(a, Outcome::Yes, dec(5, 0), 2, 0);
        fx.order(b, Outcome::No, dec(4, 0), 10, 10);

        let report = resolve_market(&fx.ctx(), fx.market.id, Outcome::No).unwrap();
        assert_eq!(fx.notifier.count("account_settled"), 2);
        assert_eq!(fx.notifier.count("market_resolved"), 1);
        let last = fx.notifier.events().pop().unwrap();
        assert_eq!(last.name(), "market_resolved");

        let settled_a = report.account(a).unwrap();
        assert_eq!(settled_a.orders.len(), 2);
        assert_eq!(settled_a.winnings, Decimal::ZERO);
        assert_eq!(settled_a.refunds, dec(10, 0));
        assert_eq!(settled_a.new_balance, dec(40, 0));
        assert_eq!(report.account(b).unwrap().winnings, dec(94, 0));
    }

    #[test]
    fn report_serializes_for_callers() {
        let fx = Fixture::new();
        let a = fx.account(100);
        fx.order(a, Outcome::No, dec(3, 0), 4, 0);

        let report = resolve_market(&fx.ctx(), fx.market.id, Outcome::Yes).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["resolution"], "Yes");
        assert_eq!(json["payout_root"], report.payout_root.as_str());
        assert_eq!(json["accounts"].as_array().unwrap().len(), 1);
    }
}
