//! # predmatch-settlement
//!
//! **Resolution**: the one place where money leaves a market.
//!
//! ## Architecture
//!
//! Resolving a market with an outcome:
//! 1. Refuses a second resolution (nothing is paid twice)
//! 2. Settles every non-terminal order: winnings on filled shares of the
//!    winning outcome, a refund on shares that never matched
//! 3. Checks money conservation against the collected stakes
//! 4. Credits accounts and resolves orders and market in one store commit
//! 5. Publishes a payout root so the result can be audited by replay
//!
//! ## Winner payout
//!
//! ```text
//! cost     = price × filled
//! winnings = cost + (10 × filled − cost) × upside_share
//! ```

pub mod conservation;
pub mod payout;
pub mod payout_root;
pub mod resolver;

pub use conservation::MoneyConservation;
pub use payout::{order_payout, winner_payout};
pub use payout_root::{compute_payout_root, payout_root_hex, verify_payout_root};
pub use resolver::{SettlementReport, resolve_market};
