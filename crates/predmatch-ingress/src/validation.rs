//! Order admission checks.
//!
//! Every order passes through [`OrderValidator`] before the store is touched.
//! Checks run in a fixed order and the first failure rejects the order, so
//! a rejected order leaves no trace.

use chrono::{DateTime, Utc};
use predmatch_types::{
    Account, EngineConfig, Market, OrderRequest, PredmatchError, Result,
};
use rust_decimal::Decimal;

/// Stateless gate in front of order placement.
#[derive(Debug, Clone, Copy)]
pub struct OrderValidator<'a> {
    config: &'a EngineConfig,
}

impl<'a> OrderValidator<'a> {
    #[must_use]
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// The market accepts orders at `now`.
    pub fn check_market(&self, market: &Market, now: DateTime<Utc>) -> Result<()> {
        if market.accepts_orders(now) {
            Ok(())
        } else {
            Err(PredmatchError::MarketNotOpen {
                market_id: market.id,
                status: market.status,
            })
        }
    }

    /// Price lies in `(0, max_price]`, and on the tick when one is configured.
    pub fn check_price(&self, price: Decimal) -> Result<()> {
        if price <= Decimal::ZERO || price > self.config.max_price {
            return Err(PredmatchError::InvalidPrice {
                price,
                reason: format!("must be in (0, {}]", self.config.max_price),
            });
        }
        if let Some(tick) = self.config.price_tick {
            if !self.config.is_on_tick(price) {
                return Err(PredmatchError::InvalidPrice {
                    price,
                    reason: format!("must be a multiple of {tick}"),
                });
            }
        }
        Ok(())
    }

    /// Quantity is positive and within the optional cap.
    pub fn check_quantity(&self, quantity: u64) -> Result<()> {
        if quantity == 0 {
            return Err(PredmatchError::InvalidQuantity {
                quantity,
                reason: "must be positive".to_string(),
            });
        }
        if let Some(max) = self.config.max_order_quantity {
            if quantity > max {
                return Err(PredmatchError::InvalidQuantity {
                    quantity,
                    reason: format!("exceeds maximum {max}"),
                });
            }
        }
        Ok(())
    }

    /// The account can cover `price × quantity`.
    pub fn check_funds(&self, account: &Account, request: &OrderRequest) -> Result<()> {
        let needed = request.price * Decimal::from(request.quantity);
        if account.balance < needed {
            return Err(PredmatchError::InsufficientBalance {
                needed,
                available: account.balance,
            });
        }
        Ok(())
    }

    /// Request-only checks (market state, price, quantity), in admission order.
    pub fn check_request(
        &self,
        market: &Market,
        request: &OrderRequest,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if request.market_id != market.id {
            return Err(PredmatchError::InvalidRequest {
                reason: format!("request targets {}, not {}", request.market_id, market.id),
            });
        }
        self.check_market(market, now)?;
        self.check_price(request.price)?;
        self.check_quantity(request.quantity)
    }
}

#[cfg(test)]
mod tests {
    use predmatch_types::{AccountId, MarketStatus, Outcome};

    use super::*;

    fn request(market: &Market, price: Decimal, quantity: u64) -> OrderRequest {
        OrderRequest {
            market_id: market.id,
            account_id: AccountId::new(),
            outcome: Outcome::Yes,
            price,
            quantity,
        }
    }

    #[test]
    fn valid_request_passes() {
        let cfg = EngineConfig::default();
        let v = OrderValidator::new(&cfg);
        let market = Market::dummy();
        v.check_request(&market, &request(&market, Decimal::new(65, 1), 10), Utc::now())
            .unwrap();
    }

    #[test]
    fn price_bounds() {
        let cfg = EngineConfig::default();
        let v = OrderValidator::new(&cfg);
        assert!(v.check_price(Decimal::ZERO).is_err());
        assert!(v.check_price(Decimal::new(-1, 0)).is_err());
        assert!(v.check_price(Decimal::new(101, 1)).is_err());
        assert!(v.check_price(Decimal::TEN).is_ok());
        assert!(v.check_price(Decimal::new(1, 1)).is_ok());
    }

    #[test]
    fn off_tick_price_rejected_when_tick_configured() {
        let cfg = EngineConfig {
            price_tick: Some(Decimal::new(1, 1)),
            ..EngineConfig::default()
        };
        let v = OrderValidator::new(&cfg);
        let err = v.check_price(Decimal::new(655, 2)).unwrap_err();
        assert!(matches!(err, PredmatchError::InvalidPrice { .. }));
        assert!(v.check_price(Decimal::new(65, 1)).is_ok());
    }

    #[test]
    fn defaults_accept_fine_prices_and_large_quantities() {
        let cfg = EngineConfig::default();
        let v = OrderValidator::new(&cfg);
        let market = Market::dummy();
        v.check_request(&market, &request(&market, Decimal::new(655, 2), 100_001), Utc::now())
            .unwrap();
        assert!(v.check_price(Decimal::new(1, 3)).is_ok());
        assert!(v.check_quantity(u64::MAX).is_ok());
    }

    #[test]
    fn quantity_bounds() {
        let cfg = EngineConfig {
            max_order_quantity: Some(50),
            ..EngineConfig::default()
        };
        let v = OrderValidator::new(&cfg);
        assert!(v.check_quantity(0).is_err());
        assert!(v.check_quantity(51).is_err());
        assert!(v.check_quantity(50).is_ok());
    }

    #[test]
    fn resolved_market_rejected_before_price() {
        let cfg = EngineConfig::default();
        let v = OrderValidator::new(&cfg);
        let mut market = Market::dummy();
        market.status = MarketStatus::Resolved;
        // Bad price too: the market check must win.
        let err = v
            .check_request(&market, &request(&market, Decimal::ZERO, 1), Utc::now())
            .unwrap_err();
        assert!(matches!(err, PredmatchError::MarketNotOpen { .. }));
    }

    #[test]
    fn funds_check() {
        let cfg = EngineConfig::default();
        let v = OrderValidator::new(&cfg);
        let market = Market::dummy();
        let account = Account::new(Decimal::new(59, 0));
        let err = v
            .check_funds(&account, &request(&market, Decimal::new(6, 0), 10))
            .unwrap_err();
        assert!(matches!(err, PredmatchError::InsufficientBalance { .. }));
        let account = Account::new(Decimal::new(60, 0));
        assert!(v.check_funds(&account, &request(&market, Decimal::new(6, 0), 10)).is_ok());
    }
}
