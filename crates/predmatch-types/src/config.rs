//! Engine configuration.
//!
//! Defaults come from [`crate::constants`]. A config can be loaded from JSON
//! and must pass [`EngineConfig::validate`] before an engine uses it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PredmatchError, Result, constants};

/// Tunable parameters of the matching, house and settlement engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Optional price increment. `None` accepts any price; complements stay
    /// exact either way since `Decimal` subtraction is exact.
    pub price_tick: Option<Decimal>,
    /// Highest accepted order price (inclusive).
    pub max_price: Decimal,
    /// Optional cap on a single order's quantity. `None` means no cap.
    pub max_order_quantity: Option<u64>,
    /// Share of a winner's upside credited at settlement.
    pub winner_upside_share: Decimal,
    /// Amount credited by a starter grant.
    pub starter_grant: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price_tick: None,
            max_price: constants::FACE_VALUE,
            max_order_quantity: None,
            winner_upside_share: constants::WINNER_UPSIDE_SHARE,
            starter_grant: constants::DEFAULT_STARTER_GRANT,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `Configuration` for inconsistent values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are mutually consistent.
    ///
    /// # Errors
    /// Returns `Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if let Some(tick) = self.price_tick {
            if tick <= Decimal::ZERO {
                return Err(PredmatchError::Configuration(format!(
                    "price_tick must be positive, got {tick}"
                )));
            }
            if !(constants::FACE_VALUE % tick).is_zero() {
                return Err(PredmatchError::Configuration(format!(
                    "price_tick {tick} must divide the face value {}",
                    constants::FACE_VALUE
                )));
            }
        }
        if self.max_price <= Decimal::ZERO || self.max_price > constants::FACE_VALUE {
            return Err(PredmatchError::Configuration(format!(
                "max_price must be in (0, {}], got {}",
                constants::FACE_VALUE,
                self.max_price
            )));
        }
        if self.max_order_quantity == Some(0) {
            return Err(PredmatchError::Configuration(
                "max_order_quantity must be positive".to_string(),
            ));
        }
        if self.winner_upside_share < Decimal::ZERO || self.winner_upside_share > Decimal::ONE {
            return Err(PredmatchError::Configuration(format!(
                "winner_upside_share must be in [0, 1], got {}",
                self.winner_upside_share
            )));
        }
        if self.starter_grant < Decimal::ZERO {
            return Err(PredmatchError::Configuration(format!(
                "starter_grant must not be negative, got {}",
                self.starter_grant
            )));
        }
        Ok(())
    }

    /// Whether `price` lies on the configured tick (always, without one).
    #[must_use]
    pub fn is_on_tick(&self, price: Decimal) -> bool {
        self.price_tick.is_none_or(|tick| (price % tick).is_zero())
    }
}
