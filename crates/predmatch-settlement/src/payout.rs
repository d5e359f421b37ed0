//! Per-order settlement arithmetic.
//!
//! ```text
//! cost     = price × filled
//! winnings = cost + (FACE_VALUE × filled − cost) × upside_share   (winner)
//!          = 0                                                    (loser)
//! refund   = price × (quantity − filled)
//! ```
//!
//! The filled and unfilled parts of one order are settled independently, so a
//! partly filled winner collects winnings on its filled shares and a refund
//! on the rest.

use predmatch_types::constants::FACE_VALUE;
use predmatch_types::{Order, OrderPayout, Outcome};
use rust_decimal::Decimal;

/// Winnings owed on `filled` winning shares bought at `price`.
#[must_use]
pub fn winner_payout(price: Decimal, filled: u64, upside_share: Decimal) -> Decimal {
    let filled = Decimal::from(filled);
    let cost = price * filled;
    cost + (FACE_VALUE * filled - cost) * upside_share
}

/// Settle one order against the resolved outcome.
#[must_use]
pub fn order_payout(order: &Order, resolution: Outcome, upside_share: Decimal) -> OrderPayout {
    let won = order.outcome == resolution;
    let winnings = if won {
        winner_payout(order.price, order.filled_quantity, upside_share)
    } else {
        Decimal::ZERO
    };
    OrderPayout {
        order_id: order.id,
        outcome: order.outcome,
        price: order.price,
        filled_quantity: order.filled_quantity,
        unfilled_quantity: order.remaining(),
        won,
        winnings,
        refund: order.unfilled_notional(),
    }
}
