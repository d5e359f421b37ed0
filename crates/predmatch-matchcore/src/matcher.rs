//! Continuous complement-price matcher.
//!
//! A new order for outcome `X` at price `p` pairs with resting orders for the
//! opposite outcome at exactly `10 - p`, oldest first:
//!
//! ```text
//! place_order(OrderRequest) -> PlacementReport
//! ```
//!
//! ## Algorithm
//!
//! 1. Validate the request (nothing is written on failure)
//! 2. Inside the market's exclusive section, walk the counterparties in time
//!    priority; each step fills `min(taker remaining, maker remaining)` on
//!    both sides and bumps the market's volume and match counter
//! 3. Commit the debit of `price × quantity`, the new order, every touched
//!    maker and the market as one store unit; a failed commit leaves no trace
//! 4. After the section is released, publish the events
//!
//! The full notional stays reserved: the unmatched remainder is refunded only
//! at settlement.

use chrono::Utc;
use predmatch_ingress::{EngineContext, OrderFilter, OrderValidator};
use predmatch_types::{
    AccountId, DepthChangedEvent, ExecutionKind, MarketEvent, MarketId, Order,
    OrderAcceptedEvent, OrderId, OrderMatchedEvent, OrderRequest, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::book::OrderBook;
use crate::pricing::quote_from_book;

/// One match step, seen from the incoming order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub maker_order_id: OrderId,
    pub maker_account_id: AccountId,
    pub maker_price: Decimal,
    pub quantity: u64,
}

/// Result of a placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementReport {
    /// The order as stored after matching.
    pub order: Order,
    pub fills: Vec<Fill>,
    /// Owner's balance after the reservation.
    pub remaining_balance: Decimal,
}

impl PlacementReport {
    /// Shares matched by this placement.
    #[must_use]
    pub fn matched_quantity(&self) -> u64 {
        self.fills.iter().map(|f| f.quantity).sum()
    }
}

/// Place an order and match it against resting complements.
///
/// # Errors
/// - `MarketNotFound` / `AccountNotFound` for unknown ids
/// - `MarketNotOpen` when the market is resolved, cancelled or past close
/// - `InvalidPrice` / `InvalidQuantity` for out-of-range values, or values
///   off a configured tick or above a configured cap
/// - `InsufficientBalance` when the account cannot cover the notional
/// - persistence errors from the store
pub fn place_order(ctx: &EngineContext<'_>, request: &OrderRequest) -> Result<PlacementReport> {
    let validator = OrderValidator::new(ctx.config);
    let checked = ctx.store.market(request.market_id).and_then(|market| {
        validator.check_request(&market, request, Utc::now())?;
        let account = ctx.store.account(request.account_id)?;
        validator.check_funds(&account, request)
    });
    if let Err(e) = checked {
        warn!(
            market_id = %request.market_id,
            account_id = %request.account_id,
            error = %e,
            "Order rejected"
        );
        return Err(e);
    }

    let (report, events) = ctx
        .locks
        .with_market(request.market_id, || place_locked(ctx, request))?;

    ctx.publish(events);
    Ok(report)
}

fn place_locked(
    ctx: &EngineContext<'_>,
    request: &OrderRequest,
) -> Result<(PlacementReport, Vec<MarketEvent>)> {
    // The market may have been resolved while we waited for the section.
    let mut market = ctx.store.market(request.market_id)?;
    OrderValidator::new(ctx.config).check_market(&market, Utc::now())?;

    let mut taker = Order::from_request(request);
    let resting = ctx.store.orders(
        &OrderFilter::market(market.id)
            .resting()
            .outcome(taker.outcome.opposite())
            .price(taker.complement_price()),
    )?;
    let book = OrderBook::from_orders(market.id, &resting);
    debug!(
        market_id = %market.id,
        candidates = book.order_count(),
        "Loaded complement candidates"
    );

    let mut makers = Vec::new();
    let mut fills = Vec::new();
    let mut events = Vec::new();
    for candidate in book.counterparties(taker.outcome, taker.price) {
        if taker.remaining() == 0 {
            break;
        }
        let executed = taker.remaining().min(candidate.remaining());
        if executed == 0 {
            debug!(order_id = %candidate.id, "Skipping exhausted candidate");
            continue;
        }

        let mut maker = candidate.clone();
        maker.apply_fill(executed)?;
        taker.apply_fill(executed)?;
        events.push(MarketEvent::OrderMatched(OrderMatchedEvent::for_order(
            &taker,
            executed,
            ExecutionKind::Peer,
        )));
        events.push(MarketEvent::OrderMatched(OrderMatchedEvent::for_order(
            &maker,
            executed,
            ExecutionKind::Peer,
        )));
        fills.push(Fill {
            maker_order_id: maker.id,
            maker_account_id: maker.account_id,
            maker_price: maker.price,
            quantity: executed,
        });
        market.volume += executed;
        market.risk.matched_count += 1;
        makers.push(maker);
    }

    // Debit, order insert, maker fills and market counters land together.
    let (taker, remaining_balance) = ctx.store.commit_placement(&market, taker, &makers)?;
    info!(
        market_id = %market.id,
        order_id = %taker.id,
        outcome = %taker.outcome,
        price = %taker.price,
        quantity = taker.quantity,
        matched = taker.filled_quantity,
        "Order placed"
    );
    for fill in &fills {
        info!(
            market_id = %market.id,
            taker = %taker.id,
            maker = %fill.maker_order_id,
            quantity = fill.quantity,
            "Orders matched"
        );
    }

    let book = OrderBook::from_orders(
        market.id,
        &ctx.store.orders(&OrderFilter::market(market.id).resting())?,
    );
    events.push(MarketEvent::OrderAccepted(OrderAcceptedEvent {
        market_id: market.id,
        order: taker.clone(),
        remaining_balance,
    }));
    events.push(MarketEvent::DepthChanged(DepthChangedEvent {
        market_id: market.id,
        depth: book.depth(),
    }));
    events.push(MarketEvent::QuoteChanged(quote_from_book(&market, &book)));

    let report = PlacementReport {
        order: taker,
        fills,
        remaining_balance,
    };
    Ok((report, events))
}

/// An account's orders in one market, newest first.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn orders_for_account(
    ctx: &EngineContext<'_>,
    market_id: MarketId,
    account_id: AccountId,
) -> Result<Vec<Order>> {
    ctx.store.market(market_id)?;
    ctx.store.orders(
        &OrderFilter::market(market_id)
            .account(account_id)
            .newest_first(),
    )
}
