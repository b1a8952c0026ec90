//! Stable node identity.
//!
//! The manager files component instances under a process-local integer
//! identity rather than under the node id itself. The identity is written
//! back onto the node as a dedicated attribute the first time the node is
//! mounted, so it survives until the node is detached and follows the node
//! through re-scans. A node without any mounted component never receives one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use graft_core::error::TreeResult;
use graft_core::tree::{NodeId, Tree};

/// The manager-assigned stable identity of a mounted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdentity(u64);

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assigns and looks up node identities.
pub struct IdentityRegistry {
    id_attribute: String,
    next: AtomicU64,
}

impl IdentityRegistry {
    /// Creates a registry storing identities under `id_attribute`
    /// (already in its `data-` form, e.g. `data-mid`).
    pub fn new(id_attribute: impl Into<String>) -> Self {
        Self {
            id_attribute: id_attribute.into(),
            next: AtomicU64::new(1),
        }
    }

    /// The attribute identities are stored under.
    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// Returns the node's identity, allocating and storing the next integer
    /// on first use.
    pub fn ensure(&self, tree: &Tree, node: NodeId) -> TreeResult<NodeIdentity> {
        if let Some(identity) = self.identity_of(tree, node) {
            return Ok(identity);
        }
        let identity = NodeIdentity(self.next.fetch_add(1, Ordering::SeqCst));
        tree.set_attribute(node, &self.id_attribute, &identity.0.to_string())?;
        Ok(identity)
    }

    /// Read-only identity lookup. Never allocates.
    pub fn identity_of(&self, tree: &Tree, node: NodeId) -> Option<NodeIdentity> {
        tree.attribute(node, &self.id_attribute)
            .and_then(|value| value.parse().ok())
            .map(NodeIdentity)
    }
}
