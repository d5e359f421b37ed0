//! Collaborators injected into every engine operation.

use predmatch_types::{EngineConfig, MarketEvent};

use crate::locks::MarketLocks;
use crate::notifier::Notifier;
use crate::store::MarketStore;

/// Borrowed bundle of the engine's collaborators.
///
/// Engine operations are free functions over this context, so any store or
/// notifier implementation can be plugged in.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    pub store: &'a dyn MarketStore,
    pub notifier: &'a dyn Notifier,
    pub locks: &'a MarketLocks,
    pub config: &'a EngineConfig,
}

impl<'a> EngineContext<'a> {
    #[must_use]
    pub fn new(
        store: &'a dyn MarketStore,
        notifier: &'a dyn Notifier,
        locks: &'a MarketLocks,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            locks,
            config,
        }
    }

    /// Publish events in order.
    pub fn publish(&self, events: impl IntoIterator<Item = MarketEvent>) {
        for event in events {
            self.notifier.notify(&event);
        }
    }
}
