//! Payout root for auditing a resolution.
//!
//! The payout root is a SHA-256 over the ordered per-order payouts of a
//! market. Replaying the same resolution over the same orders always yields
//! the same root, so an auditor can check a published result without
//! comparing full payloads.

use predmatch_types::{MarketId, OrderPayout, Outcome};
use sha2::{Digest, Sha256};

/// Compute the payout root of a resolution.
///
/// Depends on the market, the resolution, and for each payout (in order) the
/// order id, fill split, winnings and refund.
#[must_use]
pub fn compute_payout_root(
    market_id: MarketId,
    resolution: Outcome,
    payouts: &[OrderPayout],
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"predmatch:payout_root:v1:");
    hasher.update(market_id.0.as_bytes());
    hasher.update(resolution.to_string().as_bytes());
    hasher.update((payouts.len() as u64).to_le_bytes());

    for payout in payouts {
        hasher.update(payout.order_id.0.as_bytes());
        hasher.update(payout.price.normalize().to_string().as_bytes());
        hasher.update(payout.filled_quantity.to_le_bytes());
        hasher.update(payout.unfilled_quantity.to_le_bytes());
        hasher.update(payout.winnings.normalize().to_string().as_bytes());
        hasher.update(payout.refund.normalize().to_string().as_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Hex form of [`compute_payout_root`].
#[must_use]
pub fn payout_root_hex(market_id: MarketId, resolution: Outcome, payouts: &[OrderPayout]) -> String {
    hex::encode(compute_payout_root(market_id, resolution, payouts))
}

/// Recompute the root and compare with a published hex value.
#[must_use]
pub fn verify_payout_root(
    market_id: MarketId,
    resolution: Outcome,
    payouts: &[OrderPayout],
    expected_hex: &str,
) -> bool {
    hex::decode(expected_hex)
        .is_ok_and(|bytes| bytes == compute_payout_root(market_id, resolution, payouts))
}
