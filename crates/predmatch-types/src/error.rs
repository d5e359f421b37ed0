//! Error types for the PredMatch engine.
//!
//! All errors use the `PM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors (rejected before any mutation)
//! - 2xx: Not-found errors
//! - 3xx: Funds errors
//! - 4xx: Illegal state errors
//! - 5xx: Persistence errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, MarketId, MarketStatus, OrderId, OrderStatus};

/// Coarse classification of an error, as seen by the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InsufficientFunds,
    IllegalState,
    Persistence,
    Internal,
}

/// Central error enum for all PredMatch operations.
#[derive(Debug, Error)]
pub enum PredmatchError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Price outside (0, 10] or off the price tick.
    #[error("PM_ERR_100: Invalid price {price}: {reason}")]
    InvalidPrice { price: Decimal, reason: String },

    /// Quantity is zero or above the configured maximum.
    #[error("PM_ERR_101: Invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: u64, reason: String },

    /// Baseline price outside [0.5, 9.5].
    #[error("PM_ERR_102: Invalid baseline price {0}")]
    InvalidBaselinePrice(Decimal),

    /// A caller-supplied value failed validation.
    #[error("PM_ERR_103: Invalid request: {reason}")]
    InvalidRequest { reason: String },

    // =================================================================
    // Not-Found Errors (2xx)
    // =================================================================
    #[error("PM_ERR_200: Market not found: {0}")]
    MarketNotFound(MarketId),

    #[error("PM_ERR_201: Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("PM_ERR_202: Order not found: {0}")]
    OrderNotFound(OrderId),

    // =================================================================
    // Funds Errors (3xx)
    // =================================================================
    /// Balance below the required reservation (or a delta would go negative).
    #[error("PM_ERR_300: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    // =================================================================
    // Illegal State Errors (4xx)
    // =================================================================
    /// The market does not accept orders (resolved, cancelled or past close).
    #[error("PM_ERR_400: Market {market_id} is not open for trading ({status})")]
    MarketNotOpen {
        market_id: MarketId,
        status: MarketStatus,
    },

    /// Resolution was requested on an already-resolved market.
    #[error("PM_ERR_401: Market {0} already resolved")]
    MarketAlreadyResolved(MarketId),

    /// A fill was attempted against an order that cannot take it.
    #[error("PM_ERR_402: Order {order_id} not matchable in status {status}")]
    OrderNotMatchable {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// Starter grant requested on an account with a non-zero balance.
    #[error("PM_ERR_403: Starter grant unavailable: balance is {balance}")]
    GrantUnavailable { balance: Decimal },

    // =================================================================
    // Persistence Errors (5xx)
    // =================================================================
    /// Backing storage could not be reached.
    #[error("PM_ERR_500: Storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// A concurrent writer changed the record first.
    #[error("PM_ERR_501: Write conflict: {reason}")]
    WriteConflict { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Credits would exceed collected stakes; the resolution is aborted.
    #[error("PM_ERR_900: Conservation violation: {reason}")]
    ConservationViolation { reason: String },

    /// Unrecoverable internal error.
    #[error("PM_ERR_901: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("PM_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, inconsistent values, etc.).
    #[error("PM_ERR_903: Configuration error: {0}")]
    Configuration(String),
}

impl PredmatchError {
    /// Classify this error into one of the caller-facing categories.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPrice { .. }
            | Self::InvalidQuantity { .. }
            | Self::InvalidBaselinePrice(_)
            | Self::InvalidRequest { .. } => ErrorKind::Validation,
            Self::MarketNotFound(_) | Self::AccountNotFound(_) | Self::OrderNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientFunds,
            Self::MarketNotOpen { .. }
            | Self::MarketAlreadyResolved(_)
            | Self::OrderNotMatchable { .. }
            | Self::GrantUnavailable { .. } => ErrorKind::IllegalState,
            Self::StorageUnavailable { .. } | Self::WriteConflict { .. } => {
                ErrorKind::Persistence
            }
            Self::ConservationViolation { .. }
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Configuration(_) => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PredmatchError>;

impl From<serde_json::Error> for PredmatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
