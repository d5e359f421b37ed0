//! End-to-end integration tests across the three engines.
//!
//! These tests exercise the full market lifecycle:
//! starter grant -> order placement and matching -> house execution -> resolution
//!
//! They verify that the engines work together in realistic scenarios:
//! complement matching, partial fills with refunds, house liquidity,
//! single payout under concurrent resolution, and money conservation.

use predmatch_ingress::{
    EngineContext, MarketLocks, MarketStore, MemoryStore, OrderFilter, RecordingNotifier,
    claim_starter_grant,
};
use predmatch_matchcore::{HouseOutcome, PlacementReport, execute_all_pending, market_view, place_order};
use predmatch_settlement::{SettlementReport, resolve_market, verify_payout_root};
use predmatch_types::*;
use rust_decimal::Decimal;

fn dec(mantissa: i64, scale: u32) -> Decimal {
    Decimal::new(mantissa, scale)
}

/// Helper: a whole engine over one in-memory store.
struct MarketPipeline {
    store: MemoryStore,
    notifier: RecordingNotifier,
    locks: MarketLocks,
    config: EngineConfig,
}

impl MarketPipeline {
    fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            notifier: RecordingNotifier::new(),
            locks: MarketLocks::new(),
            config: EngineConfig::default(),
        }
    }

    fn ctx(&self) -> EngineContext<'_> {
        EngineContext::new(&self.store, &self.notifier, &self.locks, &self.config)
    }

    fn list_market(&self) -> MarketId {
        self.store
            .insert_market(Market::dummy())
            .expect("Market insert should succeed")
            .id
    }

    fn fund(&self, balance: i64) -> AccountId {
        self.store
            .insert_account(Account::new(dec(balance, 0)))
            .expect("Account insert should succeed")
            .id
    }

    fn place(
        &self,
        market_id: MarketId,
        account_id: AccountId,
        outcome: Outcome,
        price: Decimal,
        quantity: u64,
    ) -> PlacementReport {
        let request = OrderRequest {
            market_id,
            account_id,
            outcome,
            price,
            quantity,
        };
        place_order(&self.ctx(), &request).expect("Order placement should succeed")
    }

    fn resolve(&self, market_id: MarketId, resolution: Outcome) -> Result<SettlementReport> {
        resolve_market(&self.ctx(), market_id, resolution)
    }

    fn balance(&self, account_id: AccountId) -> Decimal {
        self.store
            .account(account_id)
            .expect("Account should exist")
            .balance
    }

    fn order(&self, order_id: OrderId) -> Order {
        self.store.order(order_id).expect("Order should exist")
    }
}

// =============================================================================
// Test: full complement match, Yes wins
// =============================================================================
#[test]
fn e2e_full_match_winner_takes_upside_share() {
    let pipeline = MarketPipeline::new();
    let market = pipeline.list_market();
    let alice = pipeline.fund(100);
    let bob = pipeline.fund(100);

    // Bob rests No @ 4, Alice takes it with Yes @ 6.
    let resting = pipeline.place(market, bob, Outcome::No, dec(4, 0), 10);
    assert!(resting.fills.is_empty());
    let taker = pipeline.place(market, alice, Outcome::Yes, dec(6, 0), 10);
    assert_eq!(taker.matched_quantity(), 10);
    assert_eq!(taker.order.status, OrderStatus::Filled);
    assert_eq!(pipeline.order(resting.order.id).status, OrderStatus::Filled);

    assert_eq!(pipeline.balance(alice), dec(40, 0));
    assert_eq!(pipeline.balance(bob), dec(60, 0));

    let report = pipeline.resolve(market, Outcome::Yes).unwrap();

    // 60 + (100 - 60) × 0.9 = 96
    assert_eq!(report.account(alice).unwrap().winnings, dec(96, 0));
    assert_eq!(report.account(bob).unwrap().total, Decimal::ZERO);
    assert_eq!(pipeline.balance(alice), dec(136, 0));
    assert_eq!(pipeline.balance(bob), dec(60, 0));
    assert_eq!(report.collected, dec(100, 0));
    assert_eq!(report.platform_retained, dec(4, 0));

    let stored = pipeline.store.market(market).unwrap();
    assert_eq!(stored.status, MarketStatus::Resolved);
    assert_eq!(stored.volume, 10);
}

// =============================================================================
// Test: partial fill, filled shares win, pending shares refunded
// =============================================================================
#[test]
fn e2e_partial_fill_then_refund() {
    let pipeline = MarketPipeline::new();
    let market = pipeline.list_market();
    let alice = pipeline.fund(100);
    let bob = pipeline.fund(100);

    let a = pipeline.place(market, alice, Outcome::Yes, dec(6, 0), 10);
    let b = pipeline.place(market, bob, Outcome::No, dec(4, 0), 4);
    assert_eq!(b.order.status, OrderStatus::Filled);

    let a_stored = pipeline.order(a.order.id);
    assert_eq!(a_stored.status, OrderStatus::PartlyFilled);
    assert_eq!(a_stored.filled_quantity, 4);
    assert_eq!(a_stored.remaining(), 6);

    // Alice's remaining 6 shares still rest: No liquidity at 4.
    let view = market_view(&pipeline.ctx(), market).unwrap();
    assert_eq!(view.depth.no.len(), 1);
    assert_eq!(view.depth.no[0].price, dec(4, 0));
    assert_eq!(view.depth.no[0].quantity, 6);

    let report = pipeline.resolve(market, Outcome::Yes).unwrap();
    let settled = report.account(alice).unwrap();
    // 24 + (40 - 24) × 0.9 = 38.4 on the filled part, 6 × 6 = 36 refunded.
    assert_eq!(settled.winnings, dec(384, 1));
    assert_eq!(settled.refunds, dec(36, 0));
    assert_eq!(pipeline.balance(alice), dec(1144, 1));
    assert_eq!(pipeline.balance(bob), dec(84, 0));
    assert_eq!(report.collected, dec(76, 0));
    assert_eq!(report.platform_retained, dec(16, 1));

    for id in [a.order.id, b.order.id] {
        assert_eq!(pipeline.order(id).status, OrderStatus::Resolved);
    }
}

// =============================================================================
// Test: a market pays out once
// =============================================================================
#[test]
fn e2e_resolution_is_final() {
    let pipeline = MarketPipeline::new();
    let market = pipeline.list_market();
    let alice = pipeline.fund(100);
    let bob = pipeline.fund(100);
    pipeline.place(market, alice, Outcome::Yes, dec(3, 0), 5);
    pipeline.place(market, bob, Outcome::No, dec(7, 0), 5);

    let first = pipeline.resolve(market, Outcome::No).unwrap();
    let balances = (pipeline.balance(alice), pipeline.balance(bob));

    let err = pipeline.resolve(market, Outcome::Yes).unwrap_err();
    assert!(matches!(err, PredmatchError::MarketAlreadyResolved(id) if id == market));
    assert_eq!((pipeline.balance(alice), pipeline.balance(bob)), balances);
    assert_eq!(pipeline.notifier.count("market_resolved"), 1);

    // A resolved market takes no more orders.
    let request = OrderRequest {
        market_id: market,
        account_id: alice,
        outcome: Outcome::Yes,
        price: dec(5, 0),
        quantity: 1,
    };
    let err = place_order(&pipeline.ctx(), &request).unwrap_err();
    assert!(matches!(err, PredmatchError::MarketNotOpen { .. }));

    // The published root can be replayed from the reported payouts.
    assert!(verify_payout_root(
        market,
        Outcome::No,
        &first.payouts,
        &first.payout_root
    ));
}

// =============================================================================
// Test: house force fill, then settlement
// =============================================================================
#[test]
fn e2e_house_execution_then_settlement() {
    let pipeline = MarketPipeline::new();
    let market = pipeline.list_market();
    let alice = pipeline.fund(100);
    let bob = pipeline.fund(100);

    // 7 + 5 is not a complement pair, so nothing matches peer to peer.
    let yes = pipeline.place(market, alice, Outcome::Yes, dec(7, 0), 10);
    let no = pipeline.place(market, bob, Outcome::No, dec(5, 0), 10);
    assert!(no.fills.is_empty());

    let outcome = execute_all_pending(&pipeline.ctx(), market).unwrap();
    let HouseOutcome::Executed { risk, .. } = outcome else {
        panic!("House should execute a book collecting 120 against 100");
    };
    assert_eq!(risk.platform_profit, dec(20, 0));
    assert_eq!(pipeline.order(yes.order.id).status, OrderStatus::Filled);
    assert_eq!(pipeline.order(no.order.id).status, OrderStatus::Filled);

    // Nothing rests after a house execution.
    let again = execute_all_pending(&pipeline.ctx(), market).unwrap();
    assert!(!again.is_executed());

    let report = pipeline.resolve(market, Outcome::No).unwrap();
    // 50 + (100 - 50) × 0.9 = 95
    assert_eq!(report.account(bob).unwrap().winnings, dec(95, 0));
    assert_eq!(pipeline.balance(bob), dec(145, 0));
    assert_eq!(pipeline.balance(alice), dec(30, 0));
    assert_eq!(report.platform_retained, dec(25, 0));
}

// =============================================================================
// Test: concurrent resolutions pay out exactly once
// =============================================================================
#[test]
fn e2e_concurrent_resolution_pays_once() {
    let pipeline = MarketPipeline::new();
    let market = pipeline.list_market();
    let alice = pipeline.fund(100);
    let bob = pipeline.fund(100);
    pipeline.place(market, alice, Outcome::Yes, dec(6, 0), 10);
    pipeline.place(market, bob, Outcome::No, dec(4, 0), 10);
    let initial = dec(200, 0);

    let results: Vec<Result<SettlementReport>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pipeline = &pipeline;
                let resolution = if i % 2 == 0 { Outcome::Yes } else { Outcome::No };
                s.spawn(move || pipeline.resolve(market, resolution))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let reports: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(reports.len(), 1, "Exactly one resolution must win");
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(err, PredmatchError::MarketAlreadyResolved(_)));
    }

    let report = reports[0];
    assert_eq!(
        pipeline.store.total_balances(),
        initial - report.platform_retained
    );
    assert_eq!(pipeline.notifier.count("market_resolved"), 1);
    assert_eq!(pipeline.notifier.count("account_settled"), 2);
    assert_eq!(
        pipeline.store.market(market).unwrap().resolution,
        Some(report.resolution)
    );
}

// =============================================================================
// Test: markets trade and settle independently in parallel
// =============================================================================
#[test]
fn e2e_parallel_markets_are_independent() {
    let pipeline = MarketPipeline::new();
    let markets = [pipeline.list_market(), pipeline.list_market()];
    let traders: Vec<(AccountId, AccountId)> = markets
        .iter()
        .map(|_| (pipeline.fund(1_000), pipeline.fund(1_000)))
        .collect();

    std::thread::scope(|s| {
        for (market, (yes_trader, no_trader)) in markets.iter().zip(&traders) {
            let pipeline = &pipeline;
            s.spawn(move || {
                for _ in 0..20 {
                    pipeline.place(*market, *yes_trader, Outcome::Yes, dec(6, 0), 1);
                    pipeline.place(*market, *no_trader, Outcome::No, dec(4, 0), 1);
                }
            });
        }
    });

    for market in markets {
        let stored = pipeline.store.market(market).unwrap();
        assert_eq!(stored.volume, 20);
        assert_eq!(stored.risk.matched_count, 20);
        let resting = pipeline
            .store
            .orders(&OrderFilter::market(market).resting())
            .unwrap();
        assert!(resting.is_empty());
    }

    pipeline.resolve(markets[0], Outcome::Yes).unwrap();
    assert!(!pipeline.store.market(markets[1]).unwrap().is_resolved());
    pipeline.resolve(markets[1], Outcome::No).unwrap();

    // Market 0: Yes at 6 wins 20 × 9.6; market 1: No at 4 wins 20 × 9.4.
    let (m0_yes, m0_no) = traders[0];
    let (m1_yes, m1_no) = traders[1];
    assert_eq!(pipeline.balance(m0_yes), dec(1_072, 0));
    assert_eq!(pipeline.balance(m0_no), dec(920, 0));
    assert_eq!(pipeline.balance(m1_yes), dec(880, 0));
    assert_eq!(pipeline.balance(m1_no), dec(1_108, 0));
}

// =============================================================================
// Test: starter grant funds a first trade
// =============================================================================
#[test]
fn e2e_starter_grant_trade_and_settle() {
    let pipeline = MarketPipeline::new();
    let market = pipeline.list_market();
    let carol = pipeline.fund(0);
    let dave = pipeline.fund(0);

    // Nothing can be placed before the grant.
    let request = OrderRequest {
        market_id: market,
        account_id: carol,
        outcome: Outcome::Yes,
        price: dec(25, 1),
        quantity: 100,
    };
    let err = place_order(&pipeline.ctx(), &request).unwrap_err();
    assert!(matches!(err, PredmatchError::InsufficientBalance { .. }));

    for account in [carol, dave] {
        let granted = claim_starter_grant(&pipeline.ctx(), account).unwrap();
        assert_eq!(granted, dec(1_100, 0));
    }
    // A funded account cannot claim again.
    assert!(claim_starter_grant(&pipeline.ctx(), carol).is_err());
    assert_eq!(pipeline.notifier.count("account_funded"), 2);

    place_order(&pipeline.ctx(), &request).unwrap();
    let taker = pipeline.place(market, dave, Outcome::No, dec(75, 1), 100);
    assert_eq!(taker.matched_quantity(), 100);
    assert_eq!(taker.fills[0].maker_account_id, carol);

    pipeline.resolve(market, Outcome::No).unwrap();
    // 750 + (1000 - 750) × 0.9 = 975
    assert_eq!(pipeline.balance(dave), dec(1_325, 0));
    assert_eq!(pipeline.balance(carol), dec(850, 0));
}

// =============================================================================
// Test: random order flow never creates money
// =============================================================================
#[test]
fn e2e_random_flow_conserves_money() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    for round in 0..10 {
        let pipeline = MarketPipeline::new();
        let market = pipeline.list_market();
        let accounts: Vec<AccountId> = (0..4).map(|_| pipeline.fund(10_000)).collect();
        let initial = pipeline.store.total_balances();

        for _ in 0..60 {
            let account = accounts[rng.gen_range(0..accounts.len())];
            let outcome = if rng.gen_bool(0.5) { Outcome::Yes } else { Outcome::No };
            let price = dec(rng.gen_range(1..=9), 0);
            let quantity = rng.gen_range(1..=20);
            pipeline.place(market, account, outcome, price, quantity);
        }
        if round % 2 == 0 {
            execute_all_pending(&pipeline.ctx(), market).unwrap();
        }

        let resolution = if rng.gen_bool(0.5) { Outcome::Yes } else { Outcome::No };
        let report = pipeline.resolve(market, resolution).unwrap();

        assert!(report.platform_retained >= Decimal::ZERO);
        assert_eq!(
            report.collected,
            report.total_winnings + report.total_refunds + report.platform_retained
        );
        assert_eq!(
            pipeline.store.total_balances(),
            initial - report.platform_retained
        );
        let unresolved = pipeline
            .store
            .orders(&OrderFilter::market(market).resting())
            .unwrap();
        assert!(unresolved.is_empty());
    }
}
