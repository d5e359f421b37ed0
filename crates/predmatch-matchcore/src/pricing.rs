//! Display pricing derived from resting liquidity.
//!
//! The quote is advisory: it is what clients show, never what the matcher
//! checks. Matching only ever pairs exact complement prices.

use chrono::Utc;
use predmatch_ingress::EngineContext;
use predmatch_types::{
    Depth, DominantBucket, Market, MarketId, Outcome, Quote, Result, complement_price,
};
use serde::{Deserialize, Serialize};

use crate::book::{OrderBook, load_book};

/// The dominant resting level of a market, if anything rests.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn compute_dominant_price(
    ctx: &EngineContext<'_>,
    market_id: MarketId,
) -> Result<Option<DominantBucket>> {
    Ok(load_book(ctx, market_id)?.dominant())
}

/// Quote a market from an already loaded book.
///
/// With a dominant level at price `p` its outcome is quoted at `p` and the
/// other at `10 - p`; otherwise the market's baseline Yes price is used.
#[must_use]
pub fn quote_from_book(market: &Market, book: &OrderBook) -> Quote {
    let dominant = book.dominant();
    let yes_price = match &dominant {
        Some(d) if d.outcome == Outcome::Yes => d.price,
        Some(d) => complement_price(d.price),
        None => market.baseline_price,
    };
    Quote {
        market_id: market.id,
        yes_price,
        no_price: complement_price(yes_price),
        dominant,
        quoted_at: Utc::now(),
    }
}

/// Current quote of a market.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn quote(ctx: &EngineContext<'_>, market_id: MarketId) -> Result<Quote> {
    let market = ctx.store.market(market_id)?;
    let book = load_book(ctx, market_id)?;
    Ok(quote_from_book(&market, &book))
}

/// A market together with its live quote and depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketView {
    pub market: Market,
    pub quote: Quote,
    pub depth: Depth,
}

/// Read a market for display.
///
/// # Errors
/// `MarketNotFound` if the market does not exist.
pub fn market_view(ctx: &EngineContext<'_>, market_id: MarketId) -> Result<MarketView> {
    let market = ctx.store.market(market_id)?;
    let book = load_book(ctx, market_id)?;
    Ok(MarketView {
        quote: quote_from_book(&market, &book),
        depth: book.depth(),
        market,
    })
}
