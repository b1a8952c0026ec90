//! The pass-scoped lifecycle join primitive.
//!
//! A [`Barrier`] collects the per-instance wait handles of one mount pass
//! and resolves once all of them have resolved. The semantics the manager
//! depends on:
//!
//! - zero collected handles → resolves immediately
//! - a handle that never resolves (a stub instance) → the barrier stalls,
//!   and with it the pass-level event behind it; this is deliberate
//!
//! Barriers are pass-scoped: every `process` call builds fresh ones, so a
//! stalled pass never contaminates a later one.

use futures::future;
use graft_core::event::EventWait;

/// A join over an arbitrary number of lifecycle waits.
#[derive(Default)]
pub struct Barrier {
    waits: Vec<EventWait>,
}

impl Barrier {
    /// Creates an empty barrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one wait handle to the join set.
    pub fn add(&mut self, wait: EventWait) {
        self.waits.push(wait);
    }

    /// Number of collected handles.
    pub fn len(&self) -> usize {
        self.waits.len()
    }

    /// Whether no handles were collected.
    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }

    /// Resolves once every collected handle has resolved.
    pub async fn wait(self) {
        future::join_all(self.waits).await;
    }
}
