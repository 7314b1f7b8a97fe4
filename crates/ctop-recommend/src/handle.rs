//! Shared, swappable reference to the live recommender.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::recommender::Recommender;

/// Holds the recommender the process is serving.
///
/// Readers take a cheap `Arc` snapshot and score against it without holding
/// any lock. A reload builds a complete new [`Recommender`] and swaps the
/// reference in one step, so in-flight calls keep the catalog they started
/// with.
#[derive(Debug)]
pub struct RecommenderHandle {
    inner: RwLock<Arc<Recommender>>,
}

impl RecommenderHandle {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            inner: RwLock::new(Arc::new(recommender)),
        }
    }

    /// Snapshot of the current recommender.
    pub fn current(&self) -> Arc<Recommender> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install `recommender`, returning the one it replaced.
    pub fn replace(&self, recommender: Recommender) -> Arc<Recommender> {
        let next = Arc::new(recommender);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, next);
        info!(
            previous_entries = previous.len(),
            entries = guard.len(),
            "Recommender catalog swapped"
        );
        previous
    }
}
