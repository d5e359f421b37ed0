//! Per-market exclusive sections.
//!
//! Placement with matching, house execution and resolution of one market
//! must never interleave. Each market gets its own mutex, created on first
//! use, so independent markets never contend.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use predmatch_types::MarketId;

/// Registry of per-market mutexes.
#[derive(Debug, Default)]
pub struct MarketLocks {
    locks: DashMap<MarketId, Arc<Mutex<()>>>,
}

impl MarketLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, market_id: MarketId) -> Arc<Mutex<()>> {
        // Clone the Arc out so the shard guard is dropped before locking.
        self.locks
            .entry(market_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` inside the exclusive section of `market_id`.
    pub fn with_market<T>(&self, market_id: MarketId, f: impl FnOnce() -> T) -> T {
        let handle = self.handle(market_id);
        let _guard = handle.lock();
        f()
    }

    /// Number of markets that have been locked at least once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
