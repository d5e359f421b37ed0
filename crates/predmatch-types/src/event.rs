//! Notification events emitted by the engine.
//!
//! The set is closed: transports route on [`MarketEvent::market_id`] and the
//! serde `type` tag, and every variant carries a fixed, typed field set.
//! Account funding is the one notice that belongs to no market.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AccountId, Depth, MarketId, Order, OrderId, OrderStatus, Outcome, Quote, RiskAggregates,
};

/// Who took the other side of a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionKind {
    /// Paired against a resting complement order.
    Peer,
    /// Force-filled by the house.
    House,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAcceptedEvent {
    pub market_id: MarketId,
    /// The order as it stands after matching.
    pub order: Order,
    pub remaining_balance: Decimal,
}

/// One side of a fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMatchedEvent {
    pub market_id: MarketId,
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub outcome: Outcome,
    pub price: Decimal,
    pub executed_quantity: u64,
    pub filled_quantity: u64,
    pub total_quantity: u64,
    pub status: OrderStatus,
    pub execution: ExecutionKind,
}

impl OrderMatchedEvent {
    /// Describe `executed` shares just filled on `order`.
    #[must_use]
    pub fn for_order(order: &Order, executed: u64, execution: ExecutionKind) -> Self {
        Self {
            market_id: order.market_id,
            order_id: order.id,
            account_id: order.account_id,
            outcome: order.outcome,
            price: order.price,
            executed_quantity: executed,
            filled_quantity: order.filled_quantity,
            total_quantity: order.quantity,
            status: order.status,
            execution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChangedEvent {
    pub market_id: MarketId,
    pub depth: Depth,
}

/// Settlement result of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayout {
    pub order_id: OrderId,
    pub outcome: Outcome,
    pub price: Decimal,
    pub filled_quantity: u64,
    pub unfilled_quantity: u64,
    /// `outcome == resolution`.
    pub won: bool,
    pub winnings: Decimal,
    pub refund: Decimal,
}

impl OrderPayout {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.winnings + self.refund
    }
}

/// Per-account settlement notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSettledEvent {
    pub market_id: MarketId,
    pub account_id: AccountId,
    pub resolution: Outcome,
    pub winnings: Decimal,
    pub refunds: Decimal,
    pub total: Decimal,
    pub new_balance: Decimal,
    pub orders: Vec<OrderPayout>,
}

/// Market-wide resolution summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketResolvedEvent {
    pub market_id: MarketId,
    pub resolution: Outcome,
    pub resolved_at: DateTime<Utc>,
    pub accounts_paid: usize,
    pub total_winnings: Decimal,
    pub total_refunds: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseExecutedEvent {
    pub market_id: MarketId,
    pub count: usize,
    pub risk: RiskAggregates,
}

/// A credit to an account outside of trading, such as the starter grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFundedEvent {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub new_balance: Decimal,
}

/// Every notification the engine can publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    OrderAccepted(OrderAcceptedEvent),
    OrderMatched(OrderMatchedEvent),
    DepthChanged(DepthChangedEvent),
    QuoteChanged(Quote),
    AccountSettled(AccountSettledEvent),
    MarketResolved(MarketResolvedEvent),
    HouseExecuted(HouseExecutedEvent),
    AccountFunded(AccountFundedEvent),
}

impl MarketEvent {
    /// Market this event belongs to (routing key); `None` for account funding.
    #[must_use]
    pub fn market_id(&self) -> Option<MarketId> {
        match self {
            Self::OrderAccepted(e) => Some(e.market_id),
            Self::OrderMatched(e) => Some(e.market_id),
            Self::DepthChanged(e) => Some(e.market_id),
            Self::QuoteChanged(q) => Some(q.market_id),
            Self::AccountSettled(e) => Some(e.market_id),
            Self::MarketResolved(e) => Some(e.market_id),
            Self::HouseExecuted(e) => Some(e.market_id),
            Self::AccountFunded(_) => None,
        }
    }

    /// Account the event is addressed to, if it is account-scoped.
    #[must_use]
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::OrderAccepted(e) => Some(e.order.account_id),
            Self::OrderMatched(e) => Some(e.account_id),
            Self::AccountSettled(e) => Some(e.account_id),
            Self::AccountFunded(e) => Some(e.account_id),
            Self::DepthChanged(_)
            | Self::QuoteChanged(_)
            | Self::MarketResolved(_)
            | Self::HouseExecuted(_) => None,
        }
    }

    /// Stable event name, matching the serde tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrderAccepted(_) => "order_accepted",
            Self::OrderMatched(_) => "order_matched",
            Self::DepthChanged(_) => "depth_changed",
            Self::QuoteChanged(_) => "quote_changed",
            Self::AccountSettled(_) => "account_settled",
            Self::MarketResolved(_) => "market_resolved",
            Self::HouseExecuted(_) => "house_executed",
            Self::AccountFunded(_) => "account_funded",
        }
    }
}
