//! Routes tree mutations to the mount manager.
//!
//! The [`MutationRouter`] owns one tree observation at a time and a task that
//! drains its mutation stream: inserted subtrees go through a mount pass,
//! removed subtrees through teardown. Attribute mutations on the declaration
//! attribute are received but deliberately not acted on.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use graft_core::tree::{Mutation, NodeId, ObserverId, Tree};

use crate::manager::MountManager;

/// Bridges one [`Tree`] observation to a [`MountManager`].
pub struct MutationRouter {
    tree: Tree,
    observer: Option<ObserverId>,
    cancel: Option<CancellationToken>,
}

impl MutationRouter {
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            observer: None,
            cancel: None,
        }
    }

    /// Begins observing `root`'s subtree and routing its mutations to
    /// `manager`. Replaces any observation already in place.
    pub fn observe(&mut self, manager: Arc<MountManager>, root: NodeId) {
        self.disconnect();

        let filter = vec![manager.mount_attribute().to_string()];
        let (observer, mut mutations) = self.tree.observe(root, filter);
        let cancel = CancellationToken::new();
        let guard = cancel.clone();
        // Held weakly: the router lives inside the manager, and its task
        // must not keep the manager alive on its own.
        let manager = Arc::downgrade(&manager);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = guard.cancelled() => break,
                    mutation = mutations.recv() => {
                        let Some(mutation) = mutation else { break };
                        let Some(manager) = manager.upgrade() else { break };
                        route(&manager, mutation).await;
                    }
                }
            }
            debug!("Mutation routing stopped");
        });

        self.observer = Some(observer);
        self.cancel = Some(cancel);
    }

    /// Stops routing and disconnects the observation. Idempotent; safe to
    /// call without a prior [`observe`](Self::observe).
    pub fn disconnect(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(observer) = self.observer.take() {
            self.tree.disconnect(observer);
        }
    }
}

impl Drop for MutationRouter {
    fn drop(&mut self) {
        self.disconnect();
    }
}

async fn route(manager: &Arc<MountManager>, mutation: Mutation) {
    match mutation {
        Mutation::ChildList { added, removed, .. } => {
            for node in added {
                debug!(node = %node, "Subtree inserted — running mount pass");
                manager.process(node).await;
            }
            for node in removed {
                debug!(node = %node, "Subtree removed — tearing down");
                manager.unmount_subtree(node);
            }
        }
        // Extension point: a changed declaration neither remounts nor tears
        // down existing instances.
        Mutation::Attribute { .. } => {}
    }
}
