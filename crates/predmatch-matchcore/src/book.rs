//! The resting-order book of a single market.
//!
//! The book is a snapshot built from the store, not a long-lived structure:
//! orders live in the store and every read rebuilds the view under the
//! same filter. Levels are keyed by the orders' own price:
//! - **Yes** and **No**: `BTreeMap<Decimal, PriceLevel>`, lowest price first
//!
//! A resting order is liquidity for the opposite outcome at the complement
//! price, so [`OrderBook::depth`] flips each level into the taker's view.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use predmatch_ingress::{EngineContext, OrderFilter};
use predmatch_types::{
    Depth, DepthLevel, DominantBucket, MarketId, Order, Outcome, Result, complement_price,
};
use rust_decimal::Decimal;

use crate::price_level::PriceLevel;

/// Snapshot of a market's resting orders.
#[derive(Debug)]
pub struct OrderBook {
    pub market_id: MarketId,
    yes: BTreeMap<Decimal, PriceLevel>,
    no: BTreeMap<Decimal, PriceLevel>,
}

impl OrderBook {
    /// Create a new empty book for the given market.
    #[must_use]
    pub fn new(market_id: MarketId) -> Self {
        Self {
            market_id,
            yes: BTreeMap::new(),
            no: BTreeMap::new(),
        }
    }

    /// Build a book from `orders`, keeping only resting orders of
    /// `market_id`. Levels are filled in time priority.
    #[must_use]
    pub fn from_orders<'a>(
        market_id: MarketId,
        orders: impl IntoIterator<Item = &'a Order>,
    ) -> Self {
        let mut resting: Vec<&Order> = orders
            .into_iter()
            .filter(|o| o.market_id == market_id && o.is_resting())
            .collect();
        resting.sort_by_key(|o| o.time_priority());

        let mut book = Self::new(market_id);
        for order in resting {
            book.insert_order(order.clone());
        }
        book
    }

    fn side_mut(&mut self, outcome: Outcome) -> &mut BTreeMap<Decimal, PriceLevel> {
        match outcome {
            Outcome::Yes => &mut self.yes,
            Outcome::No => &mut self.no,
        }
    }

    fn side(&self, outcome: Outcome) -> &BTreeMap<Decimal, PriceLevel> {
        match outcome {
            Outcome::Yes => &self.yes,
            Outcome::No => &self.no,
        }
    }

    /// Append a resting order to the back of its level.
    pub fn insert_order(&mut self, order: Order) {
        let (outcome, price) = (order.outcome, order.price);
        self.side_mut(outcome)
            .entry(price)
            .or_insert_with(|| PriceLevel::new(outcome, price))
            .push_back(order);
    }

    // =================================================================
    // Queries
    // =================================================================

    /// The level holding `outcome` orders at `price`.
    #[must_use]
    pub fn level(&self, outcome: Outcome, price: Decimal) -> Option<&PriceLevel> {
        self.side(outcome).get(&price)
    }

    /// Orders a taker of `outcome` at `price` would pair with, oldest first.
    pub fn counterparties(&self, outcome: Outcome, price: Decimal) -> impl Iterator<Item = &Order> {
        self.level(outcome.opposite(), complement_price(price))
            .into_iter()
            .flat_map(|level| level.orders.iter())
    }

    /// Total number of resting orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.yes
            .values()
            .chain(self.no.values())
            .map(PriceLevel::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yes.is_empty() && self.no.is_empty()
    }

    /// Taker-side depth: each level appears on the opposite outcome at the
    /// complement price. Yes levels highest price first, No lowest first.
    #[must_use]
    pub fn depth(&self) -> Depth {
        // Resting No at p is Yes liquidity at 10 - p, and vice versa.
        let mut yes: BTreeMap<Reverse<Decimal>, u64> = BTreeMap::new();
        for level in self.no.values() {
            *yes.entry(Reverse(complement_price(level.price))).or_default() +=
                level.total_quantity();
        }
        let mut no: BTreeMap<Decimal, u64> = BTreeMap::new();
        for level in self.yes.values() {
            *no.entry(complement_price(level.price)).or_default() += level.total_quantity();
        }

        Depth {
            yes: yes
                .into_iter()
                .filter(|(_, q)| *q > 0)
                .map(|(Reverse(price), quantity)| DepthLevel { price, quantity })
                .collect(),
            no: no
                .into_iter()
                .filter(|(_, q)| *q > 0)
                .map(|(price, quantity)| DepthLevel { price, quantity })
                .collect(),
        }
    }

    /// The (outcome, price) level with the most unfilled quantity.
    ///
    /// Levels are visited Yes before No, each by ascending price, and only a
    /// strictly larger total replaces the current best, so the first level
    /// to reach the maximum wins ties.
    #[must_use]
    pub fn dominant(&self) -> Option<DominantBucket> {
        let mut best: Option<DominantBucket> = None;
        for level in self.yes.values().chain(self.no.values()) {
            let quantity = level.total_quantity();
            if quantity == 0 {
                continue;
            }
            if best.as_ref().is_none_or(|b| quantity > b.quantity) {
                best = Some(DominantBucket {
                    outcome: level.outcome,
                    price: level.price,
                    quantity,
                });
            }
        }
        best
    }
}

/// Load the resting-order book of a market.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn load_book(ctx: &EngineContext<'_>, market_id: MarketId) -> Result<OrderBook> {
    ctx.store.market(market_id)?;
    let orders = ctx.store.orders(&OrderFilter::market(market_id).resting())?;
    Ok(OrderBook::from_orders(market_id, &orders))
}

/// Current taker-side depth of a market.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn compute_depth(ctx: &EngineContext<'_>, market_id: MarketId) -> Result<Depth> {
    Ok(load_book(ctx, market_id)?.depth())
}
