//! Order book view and quote types.
//!
//! These are the read-side shapes published to clients. They are computed
//! by `predmatch-matchcore` from the resting orders of a market.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MarketId, Outcome};

/// Aggregated resting quantity available at one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Decimal,
    pub quantity: u64,
}

/// Depth of a market as seen by a taker.
///
/// A resting Yes order at price `p` is liquidity for a No taker at `10 - p`
/// (and vice versa), so each side lists the complemented view, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depth {
    /// Yes levels, highest price first.
    pub yes: Vec<DepthLevel>,
    /// No levels, lowest price first.
    pub no: Vec<DepthLevel>,
}

impl Depth {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yes.is_empty() && self.no.is_empty()
    }

    /// Total resting quantity across both sides.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.yes
            .iter()
            .chain(self.no.iter())
            .map(|l| l.quantity)
            .sum()
    }
}

/// The (outcome, price) bucket holding the most resting quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantBucket {
    pub outcome: Outcome,
    pub price: Decimal,
    pub quantity: u64,
}

/// Advisory display price of a market. Never gates matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub market_id: MarketId,
    pub yes_price: Decimal,
    pub no_price: Decimal,
    /// `None` when the quote falls back to the baseline price.
    pub dominant: Option<DominantBucket>,
    pub quoted_at: DateTime<Utc>,
}

impl Quote {
    /// Whether the quote is derived from resting liquidity.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.dominant.is_some()
    }

    /// Price of the given outcome.
    #[must_use]
    pub fn price_of(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::Yes => self.yes_price,
            Outcome::No => self.no_price,
        }
    }
}
