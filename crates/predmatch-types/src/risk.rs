//! Platform risk metrics for a market.
//!
//! The platform is the ultimate counterparty of every filled share, so its
//! exposure is measured against the worst case: whichever outcome wins, each
//! share of that outcome pays the full face value.
//!
//! ```text
//! collected        = Σ price × quantity
//! liability_if_yes = Σ FACE_VALUE × quantity   (Yes orders)
//! liability_if_no  = Σ FACE_VALUE × quantity   (No orders)
//! profitable       ⇔ collected ≥ max(liability_if_yes, liability_if_no)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Order, Outcome};

/// Exposure snapshot over a set of orders, each counted at full quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub total_collected: Decimal,
    pub yes_notional: Decimal,
    pub no_notional: Decimal,
    pub liability_if_yes: Decimal,
    pub liability_if_no: Decimal,
    pub max_liability: Decimal,
    pub platform_profit: Decimal,
    pub order_count: usize,
}

impl RiskMetrics {
    /// Compute metrics over `orders`, modelling a full execution of each.
    #[must_use]
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut metrics = Self::default();
        for order in orders {
            let notional = order.notional();
            metrics.total_collected += notional;
            match order.outcome {
                Outcome::Yes => {
                    metrics.yes_notional += notional;
                    metrics.liability_if_yes += order.max_payout();
                }
                Outcome::No => {
                    metrics.no_notional += notional;
                    metrics.liability_if_no += order.max_payout();
                }
            }
            metrics.order_count += 1;
        }
        metrics.max_liability = metrics.liability_if_yes.max(metrics.liability_if_no);
        metrics.platform_profit = metrics.total_collected - metrics.max_liability;
        metrics
    }

    /// Collected stakes cover the worst-case payout.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.total_collected >= self.max_liability
    }
}
