//! House liquidity.
//!
//! The platform can take the other side of every resting order at once,
//! but only when doing so can never cost it money: the stakes it would hold
//! must cover the payout of whichever outcome wins. Execution is
//! all-or-nothing; there is no partial house fill.

use predmatch_ingress::{EngineContext, OrderFilter};
use predmatch_types::{
    DepthChangedEvent, ExecutionKind, HouseExecutedEvent, MarketEvent, MarketId, MarketStatus,
    Order, OrderMatchedEvent, OrderStatus, PredmatchError, Result, RiskAggregates, RiskMetrics,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::book::OrderBook;
use crate::pricing::quote_from_book;

const NO_RESTING_ORDERS: &str = "no resting orders";

/// Whether the house should fill everything that rests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseDecision {
    pub market_id: MarketId,
    /// Set only when something rests and the metrics are profitable. An
    /// empty book is trivially profitable (0 ≥ 0) but never executed.
    pub should_execute: bool,
    pub metrics: RiskMetrics,
    /// Orders the house would fill.
    pub resting: Vec<Order>,
    pub reason: String,
}

/// Result of [`execute_all_pending`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HouseOutcome {
    Executed {
        /// The force-filled orders, as stored.
        orders: Vec<Order>,
        metrics: RiskMetrics,
        risk: RiskAggregates,
    },
    Skipped {
        reason: String,
        metrics: RiskMetrics,
    },
}

impl HouseOutcome {
    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }
}

fn statuses(include_pending: bool) -> &'static [OrderStatus] {
    if include_pending {
        &[OrderStatus::Filled, OrderStatus::Pending, OrderStatus::PartlyFilled]
    } else {
        &[OrderStatus::Filled]
    }
}

/// Platform exposure of a market, each order counted at full quantity.
///
/// With `include_pending` the resting orders are modelled as if filled.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn evaluate_metrics(
    ctx: &EngineContext<'_>,
    market_id: MarketId,
    include_pending: bool,
) -> Result<RiskMetrics> {
    ctx.store.market(market_id)?;
    let orders = ctx
        .store
        .orders(&OrderFilter::market(market_id).with_statuses(statuses(include_pending)))?;
    Ok(RiskMetrics::from_orders(&orders))
}

fn decide(ctx: &EngineContext<'_>, market_id: MarketId) -> Result<HouseDecision> {
    let metrics = evaluate_metrics(ctx, market_id, true)?;
    let resting: Vec<Order> = ctx
        .store
        .orders(&OrderFilter::market(market_id).resting())?
        .into_iter()
        .filter(Order::is_resting)
        .collect();

    let (should_execute, reason) = if resting.is_empty() {
        (false, NO_RESTING_ORDERS.to_string())
    } else if metrics.is_profitable() {
        (
            true,
            format!(
                "collected {} covers max liability {}",
                metrics.total_collected, metrics.max_liability
            ),
        )
    } else {
        (
            false,
            format!(
                "collected {} below max liability {}",
                metrics.total_collected, metrics.max_liability
            ),
        )
    };

    Ok(HouseDecision {
        market_id,
        should_execute,
        metrics,
        resting,
        reason,
    })
}

/// Decide whether filling every resting order is safe for the house.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn should_execute_all_pending(
    ctx: &EngineContext<'_>,
    market_id: MarketId,
) -> Result<HouseDecision> {
    decide(ctx, market_id)
}

/// Fill every resting order of a market if the house decision allows it.
///
/// # Errors
/// - `MarketNotFound` if the market does not exist
/// - `MarketAlreadyResolved` / `MarketNotOpen` for settled or cancelled markets
/// - persistence errors from the store (no order is filled in that case)
pub fn execute_all_pending(ctx: &EngineContext<'_>, market_id: MarketId) -> Result<HouseOutcome> {
    let (outcome, events) = ctx
        .locks
        .with_market(market_id, || execute_locked(ctx, market_id))?;
    ctx.publish(events);
    Ok(outcome)
}

fn execute_locked(
    ctx: &EngineContext<'_>,
    market_id: MarketId,
) -> Result<(HouseOutcome, Vec<MarketEvent>)> {
    let mut market = ctx.store.market(market_id)?;
    match market.status {
        MarketStatus::Open => {}
        MarketStatus::Resolved => return Err(PredmatchError::MarketAlreadyResolved(market_id)),
        MarketStatus::Cancelled => {
            return Err(PredmatchError::MarketNotOpen {
                market_id,
                status: market.status,
            });
        }
    }

    let decision = decide(ctx, market_id)?;
    if !decision.should_execute {
        info!(%market_id, reason = %decision.reason, "House execution skipped");
        return Ok((
            HouseOutcome::Skipped {
                reason: decision.reason,
                metrics: decision.metrics,
            },
            Vec::new(),
        ));
    }

    let mut filled = Vec::with_capacity(decision.resting.len());
    let mut executed = Vec::with_capacity(decision.resting.len());
    for mut order in decision.resting {
        executed.push(order.fill_remaining()?);
        filled.push(order);
    }

    let already_filled = ctx
        .store
        .orders(&OrderFilter::market(market_id).with_statuses(statuses(false)))?;
    let metrics = RiskMetrics::from_orders(already_filled.iter().chain(&filled));
    market.risk.absorb(&metrics);
    market.risk.house_executed_count += filled.len() as u64;
    // Fills and the market's risk aggregates commit together.
    let filled = ctx.store.commit_orders(&market, &filled)?;
    info!(
        %market_id,
        count = filled.len(),
        collected = %metrics.total_collected,
        max_liability = %metrics.max_liability,
        "House executed all resting orders"
    );

    let mut events: Vec<MarketEvent> = filled
        .iter()
        .zip(&executed)
        .map(|(order, &qty)| {
            MarketEvent::OrderMatched(OrderMatchedEvent::for_order(order, qty, ExecutionKind::House))
        })
        .collect();
    let book = OrderBook::from_orders(
        market_id,
        &ctx.store.orders(&OrderFilter::market(market_id).resting())?,
    );
    events.push(MarketEvent::HouseExecuted(HouseExecutedEvent {
        market_id,
        count: filled.len(),
        risk: market.risk.clone(),
    }));
    events.push(MarketEvent::DepthChanged(DepthChangedEvent {
        market_id,
        depth: book.depth(),
    }));
    events.push(MarketEvent::QuoteChanged(quote_from_book(&market, &book)));

    Ok((
        HouseOutcome::Executed {
            orders: filled,
            metrics,
            risk: market.risk,
        },
        events,
    ))
}
