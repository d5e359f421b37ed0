//! Money conservation check for a resolution.
//!
//! Invariant enforced before any credit is written:
//! ```text
//! Σ(winnings + refunds) ≤ Σ(price × quantity)   over the settled orders
//! ```
//!
//! Every order reserved its full notional when it was placed, so the market
//! holds exactly the stakes on the right-hand side. Paying out more than
//! that would create money; the resolution is refused instead.

use predmatch_types::{Order, OrderPayout, PredmatchError, Result};
use rust_decimal::Decimal;

/// Running totals of one market's resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoneyConservation {
    collected: Decimal,
    winnings: Decimal,
    refunds: Decimal,
}

impl MoneyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the stake reserved by a settled order.
    pub fn record_stake(&mut self, order: &Order) {
        self.collected += order.notional();
    }

    /// Record what a settled order pays back.
    pub fn record_payout(&mut self, payout: &OrderPayout) {
        self.winnings += payout.winnings;
        self.refunds += payout.refund;
    }

    #[must_use]
    pub fn collected(&self) -> Decimal {
        self.collected
    }

    #[must_use]
    pub fn total_winnings(&self) -> Decimal {
        self.winnings
    }

    #[must_use]
    pub fn total_refunds(&self) -> Decimal {
        self.refunds
    }

    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.winnings + self.refunds
    }

    /// What the platform keeps once every credit is paid.
    #[must_use]
    pub fn platform_retained(&self) -> Decimal {
        self.collected - self.total_credits()
    }

    /// Verify that credits never exceed the collected stakes.
    ///
    /// # Errors
    /// Returns [`PredmatchError::ConservationViolation`] otherwise.
    pub fn verify(&self) -> Result<()> {
        if self.total_credits() > self.collected {
            return Err(PredmatchError::ConservationViolation {
                reason: format!(
                    "credits {} exceed collected stakes {} (winnings={}, refunds={})",
                    self.total_credits(),
                    self.collected,
                    self.winnings,
                    self.refunds,
                ),
            });
        }
        Ok(())
    }
}
