//! # predmatch-types
//!
//! Shared types, errors, and configuration for the **PredMatch** engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`MarketId`], [`OrderId`], [`AccountId`]
//! - **Market model**: [`Market`], [`MarketStatus`], [`RiskAggregates`]
//! - **Order model**: [`Order`], [`OrderRequest`], [`Outcome`], [`OrderStatus`]
//! - **Account model**: [`Account`]
//! - **Book view**: [`Depth`], [`DepthLevel`], [`DominantBucket`], [`Quote`]
//! - **Risk**: [`RiskMetrics`]
//! - **Events**: [`MarketEvent`] and its payloads
//! - **Configuration**: [`EngineConfig`], [`telemetry::LoggingConfig`]
//! - **Errors**: [`PredmatchError`] with `PM_ERR_` prefix codes
//! - **Constants**: face value, fee share, price bounds

pub mod account;
pub mod book;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod market;
pub mod order;
pub mod risk;
pub mod telemetry;

// Re-export all primary types at crate root for ergonomic imports:
//   use predmatch_types::{Order, Outcome, Market, ...};

pub use account::*;
pub use book::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use market::*;
pub use order::*;
pub use risk::*;

// Constants are accessed via `predmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).
