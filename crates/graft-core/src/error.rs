//! Unified error types for the Graft core layer.
//!
//! Framework-level errors (load and component failures) are defined in
//! `graft-framework`.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors that can occur when mutating the attribute tree.
#[derive(Debug, Clone, Error)]
pub enum TreeError {
    /// The node id does not name a node of this tree.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// The node is already attached to a parent.
    #[error("node {node} is already attached to {parent}")]
    AlreadyAttached {
        /// The node that was about to be attached.
        node: NodeId,
        /// Its current parent.
        parent: NodeId,
    },

    /// The node is not a child of the given parent.
    #[error("node {node} is not a child of {parent}")]
    NotAChild {
        /// The node that was about to be detached.
        node: NodeId,
        /// The alleged parent.
        parent: NodeId,
    },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
