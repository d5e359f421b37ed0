//! Order types for the PredMatch engine.
//!
//! An order buys `quantity` shares of one [`Outcome`] at a fixed `price`.
//! Two orders pair up only when their outcomes differ and their prices are
//! exact complements (`p1 + p2 == FACE_VALUE`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::FACE_VALUE;
use crate::{AccountId, MarketId, OrderId, PredmatchError, Result};

/// One side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// The other outcome.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// Lifecycle status of an order.
///
/// `Pending`, `PartlyFilled` and `Filled` are derived from the fill ratio;
/// `Cancelled` and `Resolved` are terminal marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    PartlyFilled,
    Filled,
    Cancelled,
    Resolved,
}

impl OrderStatus {
    /// Status implied by a fill ratio.
    #[must_use]
    pub fn derive(filled_quantity: u64, quantity: u64) -> Self {
        if filled_quantity == 0 {
            Self::Pending
        } else if filled_quantity >= quantity {
            Self::Filled
        } else {
            Self::PartlyFilled
        }
    }

    /// Whether an order in this status may still take fills.
    #[must_use]
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Pending | Self::PartlyFilled)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Resolved)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::PartlyFilled => write!(f, "PARTLY_FILLED"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

/// Price of the opposite outcome that pairs with `price`.
#[must_use]
pub fn complement_price(price: Decimal) -> Decimal {
    FACE_VALUE - price
}

/// A caller's request to place an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub market_id: MarketId,
    pub account_id: AccountId,
    pub outcome: Outcome,
    pub price: Decimal,
    pub quantity: u64,
}

/// Core order struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub market_id: MarketId,
    pub account_id: AccountId,
    pub outcome: Outcome,
    pub price: Decimal,
    pub quantity: u64,
    pub filled_quantity: u64,
    pub status: OrderStatus,
    /// Insertion sequence assigned by the store; breaks `created_at` ties.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A fresh, unfilled order for the given request.
    #[must_use]
    pub fn from_request(request: &OrderRequest) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            market_id: request.market_id,
            account_id: request.account_id,
            outcome: request.outcome,
            price: request.price,
            quantity: request.quantity,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            sequence: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.filled_quantity)
    }

    /// Stake reserved at placement: `price × quantity`.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Stake attached to the filled shares.
    #[must_use]
    pub fn filled_notional(&self) -> Decimal {
        self.price * Decimal::from(self.filled_quantity)
    }

    /// Stake attached to the shares that never matched.
    #[must_use]
    pub fn unfilled_notional(&self) -> Decimal {
        self.price * Decimal::from(self.remaining())
    }

    /// Worst-case payout owed on this order if its outcome wins.
    #[must_use]
    pub fn max_payout(&self) -> Decimal {
        FACE_VALUE * Decimal::from(self.quantity)
    }

    /// Resting means the order can still take fills.
    #[must_use]
    pub fn is_resting(&self) -> bool {
        self.status.is_resting() && self.remaining() > 0
    }

    #[must_use]
    pub fn complement_price(&self) -> Decimal {
        complement_price(self.price)
    }

    /// Two orders pair iff outcomes differ and prices sum to the face value.
    #[must_use]
    pub fn is_complement_of(&self, other: &Order) -> bool {
        self.market_id == other.market_id
            && self.outcome != other.outcome
            && self.price + other.price == FACE_VALUE
    }

    /// Record `quantity` more filled shares and re-derive the status.
    ///
    /// # Errors
    /// - `OrderNotMatchable` if the order is not resting
    /// - `InvalidQuantity` if `quantity` is zero or exceeds the remainder
    pub fn apply_fill(&mut self, quantity: u64) -> Result<()> {
        if !self.status.is_resting() {
            return Err(PredmatchError::OrderNotMatchable {
                order_id: self.id,
                status: self.status,
            });
        }
        if quantity == 0 || quantity > self.remaining() {
            return Err(PredmatchError::InvalidQuantity {
                quantity,
                reason: format!("fill must be in 1..={}", self.remaining()),
            });
        }
        self.filled_quantity += quantity;
        self.status = OrderStatus::derive(self.filled_quantity, self.quantity);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Fill whatever remains. Returns the number of shares filled.
    ///
    /// # Errors
    /// Same as [`Order::apply_fill`].
    pub fn fill_remaining(&mut self) -> Result<u64> {
        let remaining = self.remaining();
        self.apply_fill(remaining)?;
        Ok(remaining)
    }

    /// Creation-time priority key: oldest first, store sequence as tie-break.
    #[must_use]
    pub fn time_priority(&self) -> (DateTime<Utc>, u64) {
        (self.created_at, self.sequence)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(outcome: Outcome, price: Decimal, quantity: u64) -> Self {
        Self::dummy_for(MarketId::from_bytes([0; 16]), AccountId::new(), outcome, price, quantity)
    }

    pub fn dummy_for(
        market_id: MarketId,
        account_id: AccountId,
        outcome: Outcome,
        price: Decimal,
        quantity: u64,
    ) -> Self {
        Self::from_request(&OrderRequest {
            market_id,
            account_id,
            outcome,
            price,
            quantity,
        })
    }
}
