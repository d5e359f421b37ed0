//! Account balance model.
//!
//! A balance is never overwritten: every change is a signed delta applied
//! against the current value, and a delta that would take the balance
//! below zero is rejected as a whole.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, PredmatchError, Result};

/// A trading account and its spendable balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Decimal,
}

impl Account {
    /// Create an account with an opening balance.
    #[must_use]
    pub fn new(balance: Decimal) -> Self {
        Self {
            id: AccountId::new(),
            balance,
        }
    }

    /// Apply a signed delta. Returns the new balance.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the result would be negative; the
    /// balance is left unchanged.
    pub fn apply_delta(&mut self, delta: Decimal) -> Result<Decimal> {
        let next = self.balance + delta;
        if next < Decimal::ZERO {
            return Err(PredmatchError::InsufficientBalance {
                needed: -delta,
                available: self.balance,
            });
        }
        self.balance = next;
        Ok(next)
    }
}
