//! Declaration discovery.
//!
//! [`DeclarationScanner`] finds the nodes of a subtree that carry the mount
//! declaration attribute and extracts, per node, the declared component
//! names and their option payloads.
//!
//! Names come back exactly as written between the commas — untrimmed. The
//! mount pass trims them before the disabled check, the load set, and the
//! implementation lookup. Keeping the raw form here preserves the
//! declaration for logging and keeps discovery free of normalization
//! decisions.

use graft_core::options::{self, Options};
use graft_core::tree::{NodeId, Tree};

use crate::component::ComponentName;

/// Scans subtrees for component declarations.
pub struct DeclarationScanner {
    mount_attribute: String,
}

impl DeclarationScanner {
    /// Creates a scanner looking for the given declaration attribute
    /// (already in its `data-` form, e.g. `data-mount`).
    pub fn new(mount_attribute: impl Into<String>) -> Self {
        Self {
            mount_attribute: mount_attribute.into(),
        }
    }

    /// The declaration attribute this scanner looks for.
    pub fn mount_attribute(&self) -> &str {
        &self.mount_attribute
    }

    /// Returns every node within `root`'s subtree (root inclusive) carrying
    /// the declaration attribute, in document order.
    pub fn find_declaring(&self, tree: &Tree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .into_iter()
            .filter(|&node| tree.attribute(node, &self.mount_attribute).is_some())
            .collect()
    }

    /// Returns the component names declared on `node`, split on commas.
    /// An absent or empty attribute yields an empty sequence.
    pub fn declared(&self, tree: &Tree, node: NodeId) -> Vec<String> {
        match tree.attribute(node, &self.mount_attribute) {
            Some(value) if !value.is_empty() => value.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Reads and parses the option payload for `name` on `node`. An absent
    /// options attribute yields an empty mapping.
    pub fn options_for(&self, tree: &Tree, node: NodeId, name: &ComponentName) -> Options {
        let raw = tree
            .attribute(node, &name.options_attribute())
            .unwrap_or_default();
        options::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> DeclarationScanner {
        DeclarationScanner::new("data-mount")
    }

    #[test]
    fn declaring_nodes_come_back_in_document_order() {
        let tree = Tree::new();
        let a = tree.create_node("a");
        let b = tree.create_node("b");
        let c = tree.create_node("c");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(tree.root(), c).unwrap();
        tree.set_attribute(b, "data-mount", "x").unwrap();
        tree.set_attribute(c, "data-mount", "y").unwrap();

        assert_eq!(scanner().find_declaring(&tree, tree.root()), vec![b, c]);
    }

    #[test]
    fn the_scan_root_itself_is_a_candidate() {
        let tree = Tree::new();
        let a = tree.create_node("a");
        tree.append_child(tree.root(), a).unwrap();
        tree.set_attribute(a, "data-mount", "x").unwrap();

        assert_eq!(scanner().find_declaring(&tree, a), vec![a]);
    }

    #[test]
    fn declared_names_are_split_untrimmed() {
        let tree = Tree::new();
        let a = tree.create_node("a");
        tree.append_child(tree.root(), a).unwrap();
        tree.set_attribute(a, "data-mount", "hider, widget/tabs").unwrap();

        assert_eq!(
            scanner().declared(&tree, a),
            vec!["hider".to_string(), " widget/tabs".to_string()]
        );
    }

    #[test]
    fn empty_declaration_yields_no_names() {
        let tree = Tree::new();
        let a = tree.create_node("a");
        tree.append_child(tree.root(), a).unwrap();
        tree.set_attribute(a, "data-mount", "").unwrap();

        assert!(scanner().declared(&tree, a).is_empty());
        assert!(scanner().declared(&tree, tree.root()).is_empty());
    }

    #[test]
    fn options_are_read_from_the_normalized_attribute() {
        let tree = Tree::new();
        let a = tree.create_node("a");
        tree.append_child(tree.root(), a).unwrap();
        tree.set_attribute(a, "data-widget-tabs", "'active': 2").unwrap();

        let name = ComponentName::new("widget/tabs");
        let options = scanner().options_for(&tree, a, &name);
        assert_eq!(options.get("active"), Some(&serde_json::Value::from(2)));

        let missing = scanner().options_for(&tree, a, &ComponentName::new("hider"));
        assert!(missing.is_empty());
    }
}
