//! Engine bootstrap: configuration applied to a running manager.
//!
//! [`Bootstrap`] owns the tree, the component source, and the current
//! [`MountManager`], and knows how to apply a [`ManagerConfig`] to all
//! three. Reconfiguration runs three named steps:
//!
//! 1. toggle log output (`logging_enabled`)
//! 2. repoint the component source (`base_url`)
//! 3. rebuild the manager with the derived [`MountSettings`]
//!
//! [`MountSettings`]: graft_framework::MountSettings

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use graft_core::tree::Tree;
use graft_framework::{ComponentSource, MountManager};

use crate::config::ManagerConfig;
use crate::logging;

/// Wires a tree, a component source, and a configuration into a running
/// mount engine.
pub struct Bootstrap {
    tree: Tree,
    source: Arc<dyn ComponentSource>,
    manager: Mutex<Arc<MountManager>>,
    config: Mutex<ManagerConfig>,
}

impl Bootstrap {
    /// Creates a bootstrap over `tree` and `source` with the default
    /// configuration.
    pub fn new(tree: Tree, source: Arc<dyn ComponentSource>) -> Self {
        let config = ManagerConfig::default();
        let manager = MountManager::new(tree.clone(), Arc::clone(&source), config.settings());
        Self {
            tree,
            source,
            manager: Mutex::new(manager),
            config: Mutex::new(config),
        }
    }

    /// The currently active manager. Replaced by
    /// [`reconfigure`](Self::reconfigure); callers should not hold onto the
    /// returned handle across reconfigurations.
    pub fn manager(&self) -> Arc<MountManager> {
        Arc::clone(&self.manager.lock())
    }

    /// The currently applied configuration.
    pub fn config(&self) -> ManagerConfig {
        self.config.lock().clone()
    }

    /// Applies `config`: toggles logging, repoints the source, and rebuilds
    /// the manager with the derived settings.
    ///
    /// Instances mounted by the previous manager stay mounted under it;
    /// reconfigure before [`start`](Self::start) to avoid split ownership.
    pub fn reconfigure(&self, config: ManagerConfig) {
        info!(
            mount_point = %config.mount_point,
            load_from = %config.load_from,
            "Applying configuration"
        );
        logging::set_enabled(config.logging_enabled);
        if !config.base_url.is_empty() {
            self.source.set_base(&config.base_url);
        }
        let manager =
            MountManager::new(self.tree.clone(), Arc::clone(&self.source), config.settings());
        *self.manager.lock() = manager;
        *self.config.lock() = config;
    }

    /// Mounts the engine at the tree root.
    pub async fn start(&self) {
        let manager = self.manager();
        manager.mount(self.tree.root()).await;
    }

    /// Unmounts the engine from the tree root.
    pub async fn shutdown(&self) {
        let manager = self.manager();
        manager.unmount(self.tree.root()).await;
    }
}
