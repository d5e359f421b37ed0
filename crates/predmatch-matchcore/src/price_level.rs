//! A single (outcome, price) level of the book.
//!
//! Orders at the same level are kept in time priority using a
//! [`VecDeque`]: the front is the oldest order and is filled first.

use std::collections::VecDeque;

use predmatch_types::{Order, Outcome};
use rust_decimal::Decimal;

/// All resting orders of one outcome at one price.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    pub outcome: Outcome,
    /// The orders' own price (not the complemented taker view).
    pub price: Decimal,
    /// Orders in time-priority order (front = oldest = highest priority).
    pub orders: VecDeque<Order>,
}

impl PriceLevel {
    #[must_use]
    pub fn new(outcome: Outcome, price: Decimal) -> Self {
        Self {
            outcome,
            price,
            orders: VecDeque::new(),
        }
    }

    /// Add an order to the back of this level (lowest time priority).
    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Total unfilled quantity across all orders at this level.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.orders.iter().map(Order::remaining).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }
}
