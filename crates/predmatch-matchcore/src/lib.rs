//! # predmatch-matchcore
//!
//! **Complement-price matching engine for PredMatch.**
//!
//! A binary market has two outcomes whose prices always sum to the face
//! value. A Yes order at `p` and a No order at `10 - p` together fully fund
//! one winning share, so that is the only pairing the matcher accepts.
//!
//! - **Matcher**: continuous, time-priority matching of exact complements
//! - **Book**: depth and dominant level built from resting orders
//! - **Pricing**: advisory quote, with the market baseline as fallback
//! - **House**: all-or-nothing force fill when it cannot lose money
//! - **Market sharding**: every mutation runs in its market's exclusive section

pub mod book;
pub mod house;
pub mod matcher;
pub mod price_level;
pub mod pricing;

pub use book::{OrderBook, compute_depth, load_book};
pub use house::{
    HouseDecision, HouseOutcome, evaluate_metrics, execute_all_pending,
    should_execute_all_pending,
};
pub use matcher::{Fill, PlacementReport, orders_for_account, place_order};
pub use price_level::PriceLevel;
pub use pricing::{MarketView, compute_dominant_price, market_view, quote, quote_from_book};
