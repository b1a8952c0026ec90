//! The mutable attribute tree and its mutation notification source.
//!
//! [`Tree`] is the in-memory structure the mount manager operates over: a
//! rooted tree of nodes, each carrying a tag and a string attribute map.
//! Structural and attribute mutations are delivered as batched [`Mutation`]
//! records to observers registered with [`Tree::observe`], scoped to the
//! subtree of the observed root.
//!
//! # Detached subtrees
//!
//! Removing a child detaches its subtree but keeps the node records alive, so
//! consumers can still enumerate a removed subtree (the unmount path depends
//! on this). Node ids are never reused.
//!
//! # Example
//!
//! ```rust
//! use graft_core::Tree;
//!
//! let tree = Tree::new();
//! let node = tree.create_node("section");
//! tree.set_attribute(node, "data-mount", "hider").unwrap();
//! tree.append_child(tree.root(), node).unwrap();
//! assert_eq!(tree.attribute(node, "data-mount").as_deref(), Some("hider"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::{TreeError, TreeResult};

/// Handle to a node of a [`Tree`].
///
/// Ids are arena indices: cheap to copy, stable for the lifetime of the tree,
/// and never reused. A `NodeId` is only meaningful for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a mutation observer registered with [`Tree::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// A batched tree-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// One or more nodes were inserted into or removed from `target`'s
    /// child list. Each entry in `added` / `removed` is the root of the
    /// inserted / detached subtree.
    ChildList {
        /// The parent whose child list changed.
        target: NodeId,
        /// Subtree roots inserted in this batch.
        added: Vec<NodeId>,
        /// Subtree roots detached in this batch.
        removed: Vec<NodeId>,
    },
    /// An attribute named in the observer's filter changed on `node`.
    Attribute {
        /// The node whose attribute changed.
        node: NodeId,
        /// The attribute name.
        name: String,
    },
}

struct NodeRecord {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
}

struct ObserverEntry {
    id: ObserverId,
    root: NodeId,
    /// Attribute names this observer wants [`Mutation::Attribute`] records
    /// for. Child-list mutations are always delivered.
    attribute_filter: Vec<String>,
    sender: UnboundedSender<Mutation>,
}

struct TreeInner {
    nodes: RwLock<Vec<NodeRecord>>,
    observers: Mutex<Vec<ObserverEntry>>,
    next_observer: AtomicU64,
}

/// The mutable attribute tree.
///
/// `Tree` is a cheap clone — all handles share the same underlying storage.
#[derive(Clone)]
pub struct Tree {
    inner: Arc<TreeInner>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree containing only its root node.
    pub fn new() -> Self {
        let root = NodeRecord {
            tag: "root".to_string(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
        };
        Self {
            inner: Arc::new(TreeInner {
                nodes: RwLock::new(vec![root]),
                observers: Mutex::new(Vec::new()),
                next_observer: AtomicU64::new(1),
            }),
        }
    }

    /// The root node. Always valid, never detachable.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates a new detached node with the given tag.
    pub fn create_node(&self, tag: &str) -> NodeId {
        let mut nodes = self.inner.nodes.write();
        let id = NodeId(nodes.len());
        nodes.push(NodeRecord {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
        });
        id
    }

    /// Returns the tag of `node`, or `None` for an unknown id.
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.nodes.read().get(node.0).map(|n| n.tag.clone())
    }

    /// Returns the parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.nodes.read().get(node.0).and_then(|n| n.parent)
    }

    /// Returns the children of `node` in insertion order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .nodes
            .read()
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Reads an attribute value from `node`.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .nodes
            .read()
            .get(node.0)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    /// Sets an attribute on `node` and notifies interested observers.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> TreeResult<()> {
        {
            let mut nodes = self.inner.nodes.write();
            let record = nodes.get_mut(node.0).ok_or(TreeError::UnknownNode(node))?;
            record.attributes.insert(name.to_string(), value.to_string());
        }
        self.notify_attribute(node, name);
        Ok(())
    }

    /// Removes an attribute from `node` and notifies interested observers.
    /// Removing an absent attribute is a no-op.
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> TreeResult<()> {
        let existed = {
            let mut nodes = self.inner.nodes.write();
            let record = nodes.get_mut(node.0).ok_or(TreeError::UnknownNode(node))?;
            record.attributes.remove(name).is_some()
        };
        if existed {
            self.notify_attribute(node, name);
        }
        Ok(())
    }

    /// Appends the detached node `child` to `parent`'s child list.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        {
            let mut nodes = self.inner.nodes.write();
            if nodes.get(parent.0).is_none() {
                return Err(TreeError::UnknownNode(parent));
            }
            let record = nodes.get(child.0).ok_or(TreeError::UnknownNode(child))?;
            if let Some(current) = record.parent {
                return Err(TreeError::AlreadyAttached {
                    node: child,
                    parent: current,
                });
            }
            nodes[child.0].parent = Some(parent);
            nodes[parent.0].children.push(child);
        }
        self.notify_child_list(parent, vec![child], Vec::new());
        Ok(())
    }

    /// Detaches `child` (and its whole subtree) from `parent`.
    ///
    /// The detached records stay alive, so the subtree remains enumerable via
    /// [`descendants`](Self::descendants) after removal.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        // Observer interest is decided while the subtree is still attached.
        let interested = self.interested_in_subtree(parent);
        {
            let mut nodes = self.inner.nodes.write();
            if nodes.get(parent.0).is_none() {
                return Err(TreeError::UnknownNode(parent));
            }
            if nodes.get(child.0).is_none() {
                return Err(TreeError::UnknownNode(child));
            }
            if nodes[child.0].parent != Some(parent) {
                return Err(TreeError::NotAChild {
                    node: child,
                    parent,
                });
            }
            nodes[parent.0].children.retain(|&c| c != child);
            nodes[child.0].parent = None;
        }
        self.deliver(
            &interested,
            Mutation::ChildList {
                target: parent,
                added: Vec::new(),
                removed: vec![child],
            },
        );
        Ok(())
    }

    /// Returns `root` and every node below it, in document (preorder) order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.inner.nodes.read();
        if nodes.get(root.0).is_none() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            // Push in reverse so the leftmost child is visited first.
            for &child in nodes[node.0].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Returns whether `node` is `root` or lies within `root`'s subtree.
    pub fn contains(&self, root: NodeId, node: NodeId) -> bool {
        let nodes = self.inner.nodes.read();
        Self::contains_locked(&nodes, root, node)
    }

    fn contains_locked(nodes: &[NodeRecord], root: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == root {
                return true;
            }
            current = nodes.get(n.0).and_then(|r| r.parent);
        }
        false
    }

    // ─── Observation ─────────────────────────────────────────────────────────

    /// Begins observing mutations within `root`'s subtree.
    ///
    /// Child-list mutations whose target lies inside the subtree are always
    /// delivered; attribute mutations only for names in `attribute_filter`.
    /// The returned receiver yields mutations in the order they occurred.
    pub fn observe(
        &self,
        root: NodeId,
        attribute_filter: Vec<String>,
    ) -> (ObserverId, UnboundedReceiver<Mutation>) {
        let id = ObserverId(self.inner.next_observer.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = unbounded_channel();
        self.inner.observers.lock().push(ObserverEntry {
            id,
            root,
            attribute_filter,
            sender,
        });
        (id, receiver)
    }

    /// Stops the given observer. Safe to call repeatedly or for an id that
    /// was never registered.
    pub fn disconnect(&self, id: ObserverId) {
        self.inner.observers.lock().retain(|o| o.id != id);
    }

    /// Collects the senders of observers whose root subtree covers `node`.
    fn interested_in_subtree(&self, node: NodeId) -> Vec<UnboundedSender<Mutation>> {
        let nodes = self.inner.nodes.read();
        self.inner
            .observers
            .lock()
            .iter()
            .filter(|o| Self::contains_locked(&nodes, o.root, node))
            .map(|o| o.sender.clone())
            .collect()
    }

    fn notify_child_list(&self, target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) {
        let interested = self.interested_in_subtree(target);
        self.deliver(
            &interested,
            Mutation::ChildList {
                target,
                added,
                removed,
            },
        );
    }

    fn notify_attribute(&self, node: NodeId, name: &str) {
        let interested: Vec<UnboundedSender<Mutation>> = {
            let nodes = self.inner.nodes.read();
            self.inner
                .observers
                .lock()
                .iter()
                .filter(|o| {
                    o.attribute_filter.iter().any(|f| f == name)
                        && Self::contains_locked(&nodes, o.root, node)
                })
                .map(|o| o.sender.clone())
                .collect()
        };
        self.deliver(
            &interested,
            Mutation::Attribute {
                node,
                name: name.to_string(),
            },
        );
    }

    fn deliver(&self, senders: &[UnboundedSender<Mutation>], mutation: Mutation) {
        let mut dropped = false;
        for sender in senders {
            if sender.send(mutation.clone()).is_err() {
                dropped = true;
            }
        }
        if dropped {
            // Prune observers whose receiver has gone away.
            self.inner.observers.lock().retain(|o| !o.sender.is_closed());
        }
    }
}
