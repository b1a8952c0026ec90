//! The instance registry.
//!
//! Maps node identity → component name → live instance. An identity key
//! exists iff at least one instance is currently filed under it: removing
//! the last instance for an identity removes the identity's entry entirely,
//! so no empty placeholders persist.
//!
//! The registry is the one piece of state shared across mount passes and
//! router callbacks; all mutations happen in the synchronous sections of
//! mount/unmount, under the internal lock.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::component::{Component, ComponentName};
use crate::identity::NodeIdentity;

type InstanceMap = HashMap<NodeIdentity, HashMap<ComponentName, Box<dyn Component>>>;

/// Owns every mounted component instance.
#[derive(Default)]
pub struct InstanceRegistry {
    entries: Mutex<InstanceMap>,
}

impl InstanceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `instance` under `(identity, name)`, replacing any previous
    /// instance filed under the same key.
    pub fn insert(
        &self,
        identity: NodeIdentity,
        name: ComponentName,
        instance: Box<dyn Component>,
    ) {
        self.entries
            .lock()
            .entry(identity)
            .or_default()
            .insert(name, instance);
    }

    /// Removes and returns the instance filed under `(identity, name)`.
    /// Drops the identity entry when its last instance goes.
    pub fn remove(&self, identity: NodeIdentity, name: &ComponentName) -> Option<Box<dyn Component>> {
        let mut entries = self.entries.lock();
        let components = entries.get_mut(&identity)?;
        let instance = components.remove(name);
        if components.is_empty() {
            entries.remove(&identity);
        }
        instance
    }

    /// The component names currently filed under `identity`.
    pub fn component_names(&self, identity: NodeIdentity) -> Vec<ComponentName> {
        self.entries
            .lock()
            .get(&identity)
            .map(|components| components.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of instances filed under `identity`.
    pub fn count_for(&self, identity: NodeIdentity) -> usize {
        self.entries
            .lock()
            .get(&identity)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Whether any instance is filed under `identity`.
    pub fn contains(&self, identity: NodeIdentity) -> bool {
        self.entries.lock().contains_key(&identity)
    }

    /// Number of identities with at least one instance.
    pub fn identity_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the registry holds no instances at all.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
