//! Market (yes/no question) types.
//!
//! The market is the aggregate root for its orders: every order-state
//! transition happens under the market's exclusive section, and once the
//! market is resolved neither it nor its orders change again.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASELINE_PRICE, MAX_BASELINE_PRICE, MIN_BASELINE_PRICE};
use crate::{MarketId, Outcome, PredmatchError, Result, RiskMetrics};

/// Lifecycle status of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketStatus {
    Open,
    Resolved,
    Cancelled,
}

impl std::fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Resolved => write!(f, "RESOLVED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Persisted platform-risk aggregates of a market.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAggregates {
    pub money_collected: Decimal,
    pub max_liability: Decimal,
    pub platform_profit: Decimal,
    pub yes_notional: Decimal,
    pub no_notional: Decimal,
    /// Orders force-filled by the house.
    pub house_executed_count: u64,
    /// Peer match steps executed.
    pub matched_count: u64,
}

impl RiskAggregates {
    /// Overwrite the money fields from freshly computed metrics, keeping counters.
    pub fn absorb(&mut self, metrics: &RiskMetrics) {
        self.money_collected = metrics.total_collected;
        self.max_liability = metrics.max_liability;
        self.platform_profit = metrics.platform_profit;
        self.yes_notional = metrics.yes_notional;
        self.no_notional = metrics.no_notional;
    }
}

/// A single yes/no question with its own order book and lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub question: String,
    pub category: String,
    /// Advisory Yes price shown when no liquidity rests.
    pub baseline_price: Decimal,
    /// Shares exchanged through peer matches.
    pub volume: u64,
    pub close_time: DateTime<Utc>,
    pub status: MarketStatus,
    pub resolution: Option<Outcome>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub risk: RiskAggregates,
    pub created_at: DateTime<Utc>,
}

impl Market {
    /// Create an open market with the default baseline price.
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        category: impl Into<String>,
        close_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MarketId::new(),
            question: question.into(),
            category: category.into(),
            baseline_price: DEFAULT_BASELINE_PRICE,
            volume: 0,
            close_time,
            status: MarketStatus::Open,
            resolution: None,
            resolved_at: None,
            risk: RiskAggregates::default(),
            created_at: Utc::now(),
        }
    }

    /// Set the baseline Yes price.
    ///
    /// # Errors
    /// Returns `InvalidBaselinePrice` outside [0.5, 9.5].
    pub fn with_baseline_price(mut self, price: Decimal) -> Result<Self> {
        if price < MIN_BASELINE_PRICE || price > MAX_BASELINE_PRICE {
            return Err(PredmatchError::InvalidBaselinePrice(price));
        }
        self.baseline_price = price;
        Ok(self)
    }

    /// Whether new orders are accepted at `now`.
    #[must_use]
    pub fn accepts_orders(&self, now: DateTime<Utc>) -> bool {
        self.status == MarketStatus::Open && now < self.close_time
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status == MarketStatus::Resolved
    }

    /// Mark the market resolved.
    ///
    /// # Errors
    /// Returns `MarketAlreadyResolved` if it already is.
    pub fn resolve(&mut self, resolution: Outcome, at: DateTime<Utc>) -> Result<()> {
        if self.is_resolved() {
            return Err(PredmatchError::MarketAlreadyResolved(self.id));
        }
        self.status = MarketStatus::Resolved;
        self.resolution = Some(resolution);
        self.resolved_at = Some(at);
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Market {
    pub fn dummy() -> Self {
        Self::new(
            "Will it rain tomorrow?",
            "weather",
            Utc::now() + chrono::Duration::days(1),
        )
    }
}
