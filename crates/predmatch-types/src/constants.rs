//! System-wide constants for the PredMatch engine.
//!
//! Monetary constants are expressed as `(mantissa, scale)` pairs so they can
//! be turned into exact [`rust_decimal::Decimal`] values in `const` context.

use rust_decimal::Decimal;

/// Payout of one winning share. Complementary prices always sum to this.
pub const FACE_VALUE: Decimal = Decimal::TEN;

/// Share of a winner's upside (face value minus stake) that is credited.
/// The rest is retained as the platform fee.
pub const WINNER_UPSIDE_SHARE: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

/// Lowest baseline Yes price a market can carry (0.5).
pub const MIN_BASELINE_PRICE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Highest baseline Yes price a market can carry (9.5).
pub const MAX_BASELINE_PRICE: Decimal = Decimal::from_parts(95, 0, 0, false, 1);

/// Baseline Yes price of a freshly listed market (5.0).
pub const DEFAULT_BASELINE_PRICE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// One-time grant credited to an account whose balance is exactly zero.
pub const DEFAULT_STARTER_GRANT: Decimal = Decimal::from_parts(1100, 0, 0, false, 0);
