//! # predmatch-ingress
//!
//! **Engine collaborators**: everything the matching, house and settlement
//! engines touch that is not pure market logic.
//!
//! ## Architecture
//!
//! 1. **MarketStore**: persistence port; multi-record writes are single units
//! 2. **MemoryStore**: in-memory store for tests and single-process use
//! 3. **MarketLocks**: per-market exclusive sections
//! 4. **OrderValidator**: admission checks, run before anything is written
//! 5. **Notifier**: fire-and-forget event sinks
//! 6. **EngineContext**: the borrowed bundle passed to every operation
//!
//! ## Order Flow
//!
//! ```text
//! API → OrderValidator → MarketLocks.with_market(
//!           matching in memory → MarketStore.commit_placement)
//!     → Notifier
//! ```

pub mod context;
pub mod ledger;
pub mod locks;
pub mod memory_store;
pub mod notifier;
pub mod store;
pub mod validation;

pub use context::EngineContext;
pub use ledger::claim_starter_grant;
pub use locks::MarketLocks;
pub use memory_store::MemoryStore;
pub use notifier::{LogNotifier, Notifier, NotifierRegistry, NullNotifier, RecordingNotifier};
pub use store::{BalanceCredit, MarketStore, OrderFilter};
pub use validation::OrderValidator;
