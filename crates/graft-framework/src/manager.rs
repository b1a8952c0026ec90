//! Mount orchestration and the lifecycle facade.
//!
//! [`MountManager`] is the central owner of everything mounted. It:
//!
//! - Runs the mount pass: scan the subtree for declaring nodes, resolve the
//!   de-duplicated set of declared component names through the
//!   [`ComponentLoader`] (stub fallback on load failure), then instantiate
//!   and file every non-disabled component under its node's identity.
//! - Synchronizes pass completion over two [`Barrier`]s: `prepared` fires
//!   synchronously once every instantiation was attempted, `ready` once all
//!   `initialized` waits resolved, `pluginsexecuted` once all `executed`
//!   waits resolved. The two joins run concurrently and never block
//!   `prepared`.
//! - Isolates per-component failures: a constructor error (or a teardown
//!   error on the way out) is logged and skipped; siblings always proceed.
//! - Tears instances down on subtree removal or explicit unmount, dropping
//!   identity entries together with their last instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use graft_framework::{ComponentRegistry, MountManager, MountSettings};
//!
//! let registry = Arc::new(ComponentRegistry::new());
//! registry.register("hider", Arc::new(HiderFactory));
//! let manager = MountManager::new(tree.clone(), registry, MountSettings::default());
//! manager.mount(tree.root()).await;
//! // …later…
//! manager.unmount(tree.root()).await;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, error};

use graft_core::event::Emitter;
use graft_core::tree::{NodeId, Tree};

use crate::barrier::Barrier;
use crate::component::{ComponentFactory, ComponentName, MountContext};
use crate::identity::{IdentityRegistry, NodeIdentity};
use crate::loader::{ComponentLoader, ComponentSource};
use crate::registry::InstanceRegistry;
use crate::router::MutationRouter;
use crate::scanner::DeclarationScanner;

/// Fired synchronously once every instantiation attempt of a pass completed.
pub const PREPARED: &str = "prepared";

/// Fired once every instance of a pass fired `initialized`.
pub const READY: &str = "ready";

/// Fired once every instance of a pass fired `executed`.
pub const ALL_EXECUTED: &str = "pluginsexecuted";

// =============================================================================
// MountSettings
// =============================================================================

/// Static settings the manager operates with.
///
/// Attribute names arrive pre-normalized to their `data-` form; the
/// configuration layer in `graft-runtime` takes care of that.
#[derive(Debug, Clone)]
pub struct MountSettings {
    /// The declaration attribute, e.g. `data-mount`.
    pub mount_point: String,
    /// The attribute node identities are stored under, e.g. `data-mid`.
    pub id_property: String,
    /// Load-path prefix joined onto every component name (empty for none).
    pub load_from: String,
    /// Component names that must never be instantiated.
    pub disabled: HashSet<String>,
}

impl Default for MountSettings {
    fn default() -> Self {
        Self {
            mount_point: "data-mount".to_string(),
            id_property: "data-mid".to_string(),
            load_from: String::new(),
            disabled: HashSet::new(),
        }
    }
}

// =============================================================================
// MountManager
// =============================================================================

/// The component mount manager.
///
/// All synchronous steps of a pass (scanning, identity assignment, registry
/// mutation) run without suspension points between them; concurrency enters
/// only through awaited loads and the spawned lifecycle joins. The instance
/// registry is therefore mutated exclusively from synchronous sections.
pub struct MountManager {
    tree: Tree,
    emitter: Emitter,
    scanner: DeclarationScanner,
    identities: IdentityRegistry,
    instances: InstanceRegistry,
    loader: ComponentLoader,
    disabled: HashSet<String>,
    router: Mutex<MutationRouter>,
    self_ref: Weak<MountManager>,
}

impl MountManager {
    /// Creates a manager over `tree`, resolving implementations through
    /// `source`.
    pub fn new(
        tree: Tree,
        source: Arc<dyn ComponentSource>,
        settings: MountSettings,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            emitter: Emitter::new(),
            scanner: DeclarationScanner::new(settings.mount_point),
            identities: IdentityRegistry::new(settings.id_property),
            instances: InstanceRegistry::new(),
            loader: ComponentLoader::new(source, settings.load_from),
            disabled: settings.disabled,
            router: Mutex::new(MutationRouter::new(tree.clone())),
            self_ref: self_ref.clone(),
            tree,
        })
    }

    /// The tree this manager operates over.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The emitter the pass events (`prepared`, `ready`, `pluginsexecuted`)
    /// are fired on.
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Read access to the instance registry.
    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    /// The identity assigned to `node`, if it was ever mounted.
    pub fn identity_of(&self, node: NodeId) -> Option<NodeIdentity> {
        self.identities.identity_of(&self.tree, node)
    }

    pub(crate) fn mount_attribute(&self) -> &str {
        self.scanner.mount_attribute()
    }

    // ─── Lifecycle facade ────────────────────────────────────────────────────

    /// Mounts the manager to `root`: begins observing the subtree for
    /// mutations, then runs one mount pass over it.
    pub async fn mount(&self, root: NodeId) {
        debug!(root = %root, "MOUNT");
        if let Some(manager) = self.self_ref.upgrade() {
            self.router.lock().observe(manager, root);
        }
        self.process(root).await;
    }

    /// Unmounts the manager from `root`: stops observation, then unmounts
    /// every instance within the subtree.
    ///
    /// Lifecycle waits of passes still mid-initialization are not retired
    /// here; a pass whose instances disappear before completing keeps its
    /// `ready` pending. Accepted as a latent-leak risk.
    pub async fn unmount(&self, root: NodeId) {
        debug!(root = %root, "UNMOUNT");
        self.router.lock().disconnect();
        self.unmount_subtree(root);
    }

    /// Runs one mount pass over `root`'s subtree. A no-op when no node in
    /// the subtree declares components.
    pub async fn process(&self, root: NodeId) {
        let nodes = self.scanner.find_declaring(&self.tree, root);
        if nodes.is_empty() {
            return;
        }

        debug!(nodes = nodes.len(), "Processing declaring nodes");
        let names = self.determine_used_components(&nodes);
        let implementations = self.loader.resolve(names).await;
        self.mount_all(&nodes, &implementations);
    }

    // ─── Discovery ───────────────────────────────────────────────────────────

    /// Collects the de-duplicated, non-disabled component names declared by
    /// `nodes`, in first-seen order. Names are trimmed here, so the load set
    /// and the mount-time lookup agree on one canonical form no matter how
    /// the declaration was spaced.
    fn determine_used_components(&self, nodes: &[NodeId]) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for &node in nodes {
            for name in self.scanner.declared(&self.tree, node) {
                let name = name.trim();
                if !all.iter().any(|n| n == name) && !self.is_disabled(name) {
                    all.push(name.to_string());
                }
            }
        }
        all
    }

    /// Whether the (trimmed) name is in the disabled set. Checked during
    /// discovery to avoid needless loads, and again during mount.
    fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name.trim())
    }

    // ─── Mounting ────────────────────────────────────────────────────────────

    /// Instantiates every declared, non-disabled component of every node and
    /// wires the pass barriers.
    fn mount_all(
        &self,
        nodes: &[NodeId],
        implementations: &HashMap<String, Arc<dyn ComponentFactory>>,
    ) {
        let mut initialized = Barrier::new();
        let mut executed = Barrier::new();

        debug!("Mounting components to nodes");
        for &node in nodes {
            let identity = match self.identities.ensure(&self.tree, node) {
                Ok(identity) => identity,
                Err(err) => {
                    error!(node = %node, %err, "Could not assign node identity — skipping node");
                    continue;
                }
            };
            let declared = self.scanner.declared(&self.tree, node);
            debug!(
                node = %identity,
                tag = %self.tree.tag(node).unwrap_or_default(),
                components = %declared.join(", "),
                "Processing node"
            );

            for raw in declared {
                let trimmed = raw.trim();
                if self.is_disabled(trimmed) {
                    continue;
                }
                let name = ComponentName::new(trimmed);

                let Some(factory) = implementations.get(trimmed) else {
                    error!(
                        component = %name,
                        node = %identity,
                        "No implementation resolved for declared component"
                    );
                    continue;
                };

                let options = self.scanner.options_for(&self.tree, node, &name);
                debug!(component = %name, node = %identity, "Mounting component");

                let ctx = MountContext {
                    options,
                    node,
                    tree: self.tree.clone(),
                    manager: self.self_ref.clone(),
                };
                match factory.create(ctx) {
                    Ok(instance) => {
                        initialized.add(instance.lifecycle().initialized());
                        executed.add(instance.lifecycle().executed());
                        self.instances.insert(identity, name.clone(), instance);
                        debug!(component = %name, node = %identity, "Component mounted");
                    }
                    Err(err) => {
                        error!(
                            component = %name,
                            node = %identity,
                            %err,
                            "Error while instantiating component — siblings proceed"
                        );
                    }
                }
            }
        }

        debug!("Waiting for components to initialize");
        self.emitter.fire(PREPARED);

        // The two joins run independently of each other and of `prepared`.
        // They hold the manager weakly: a stalled barrier must not keep it
        // alive.
        let ready_manager = self.self_ref.clone();
        tokio::spawn(async move {
            initialized.wait().await;
            debug!("All components initialized");
            if let Some(manager) = ready_manager.upgrade() {
                manager.emitter.fire(READY);
            }
        });
        let executed_manager = self.self_ref.clone();
        tokio::spawn(async move {
            executed.wait().await;
            debug!("All components executed");
            if let Some(manager) = executed_manager.upgrade() {
                manager.emitter.fire(ALL_EXECUTED);
            }
        });
    }

    // ─── Unmounting ──────────────────────────────────────────────────────────

    /// Unmounts every instance filed for nodes within `root`'s subtree.
    /// Works on detached subtrees too — the unmount path of the router
    /// depends on that.
    pub fn unmount_subtree(&self, root: NodeId) {
        for node in self.scanner.find_declaring(&self.tree, root) {
            let Some(identity) = self.identities.identity_of(&self.tree, node) else {
                // Declared but never mounted: nothing to tear down.
                continue;
            };
            self.unmount_identity(identity);
        }
    }

    /// Unmounts every component filed under `identity`, isolating per-item
    /// teardown failures.
    fn unmount_identity(&self, identity: NodeIdentity) {
        for name in self.instances.component_names(identity) {
            debug!(component = %name, node = %identity, "Unmounting component");
            let Some(mut instance) = self.instances.remove(identity, &name) else {
                continue;
            };
            match instance.unmount() {
                Ok(()) => {
                    debug!(component = %name, node = %identity, "Component unmounted");
                }
                Err(err) => {
                    error!(
                        component = %name,
                        node = %identity,
                        %err,
                        "Error while unmounting component — siblings proceed"
                    );
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Lifecycle};
    use crate::error::{ComponentError, ComponentResult, LoadResult};
    use crate::loader::ComponentRegistry;
    use async_trait::async_trait;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ─── Test doubles ────────────────────────────────────────────────────────

    #[derive(Default)]
    struct Probe {
        created: AtomicUsize,
        unmounted: AtomicUsize,
        lifecycles: Mutex<Vec<Arc<Lifecycle>>>,
    }

    impl Probe {
        fn created(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }

        fn unmounted(&self) -> usize {
            self.unmounted.load(Ordering::SeqCst)
        }

        fn mark_all_initialized(&self) {
            for lifecycle in self.lifecycles.lock().iter() {
                lifecycle.mark_initialized();
            }
        }

        fn mark_all_executed(&self) {
            for lifecycle in self.lifecycles.lock().iter() {
                lifecycle.mark_executed();
            }
        }
    }

    struct TestComponent {
        lifecycle: Arc<Lifecycle>,
        probe: Arc<Probe>,
    }

    impl Component for TestComponent {
        fn lifecycle(&self) -> &Lifecycle {
            &self.lifecycle
        }

        fn unmount(&mut self) -> ComponentResult<()> {
            self.probe.unmounted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct TestFactory {
        probe: Arc<Probe>,
        auto_complete: bool,
        fail: bool,
    }

    impl TestFactory {
        fn auto(probe: &Arc<Probe>) -> Arc<Self> {
            Arc::new(Self {
                probe: Arc::clone(probe),
                auto_complete: true,
                fail: false,
            })
        }

        fn manual(probe: &Arc<Probe>) -> Arc<Self> {
            Arc::new(Self {
                probe: Arc::clone(probe),
                auto_complete: false,
                fail: false,
            })
        }

        fn failing(probe: &Arc<Probe>) -> Arc<Self> {
            Arc::new(Self {
                probe: Arc::clone(probe),
                auto_complete: false,
                fail: true,
            })
        }
    }

    impl ComponentFactory for TestFactory {
        fn create(&self, _ctx: MountContext) -> ComponentResult<Box<dyn Component>> {
            if self.fail {
                return Err(ComponentError::Constructor("broken factory".to_string()));
            }
            self.probe.created.fetch_add(1, Ordering::SeqCst);
            let lifecycle = Arc::new(Lifecycle::new());
            if self.auto_complete {
                lifecycle.mark_initialized();
                lifecycle.mark_executed();
            }
            self.probe.lifecycles.lock().push(Arc::clone(&lifecycle));
            Ok(Box::new(TestComponent {
                lifecycle,
                probe: Arc::clone(&self.probe),
            }))
        }
    }

    struct CountingSource {
        inner: ComponentRegistry,
        loads: AtomicUsize,
    }

    impl CountingSource {
        fn new(inner: ComponentRegistry) -> Arc<Self> {
            Arc::new(Self {
                inner,
                loads: AtomicUsize::new(0),
            })
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ComponentSource for CountingSource {
        async fn load(&self, path: &str) -> LoadResult<Arc<dyn ComponentFactory>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load(path).await
        }
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    fn manager_with(
        source: Arc<dyn ComponentSource>,
        disabled: &[&str],
    ) -> (Tree, Arc<MountManager>) {
        let tree = Tree::new();
        let settings = MountSettings {
            disabled: disabled.iter().map(|s| s.to_string()).collect(),
            ..MountSettings::default()
        };
        let manager = MountManager::new(tree.clone(), source, settings);
        (tree, manager)
    }

    fn declaring_node(tree: &Tree, declaration: &str) -> NodeId {
        let node = tree.create_node("div");
        tree.set_attribute(node, "data-mount", declaration).unwrap();
        tree.append_child(tree.root(), node).unwrap();
        node
    }

    async fn settle() {
        // Give spawned router/join tasks a chance to run.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // ─── Mount pass ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn mounts_one_instance_per_declared_component() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        registry.register("b", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        let node = declaring_node(&tree, "a,b");

        manager.mount(tree.root()).await;

        let identity = manager.identity_of(node).expect("identity assigned");
        assert_eq!(manager.instances().count_for(identity), 2);
        assert_eq!(probe.created(), 2);
    }

    #[tokio::test]
    async fn prepared_fires_synchronously_and_before_ready() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::manual(&probe));
        registry.register("b", TestFactory::manual(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        declaring_node(&tree, "a,b");

        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&order);
        manager.emitter().on(PREPARED, move |_| sink.lock().push("prepared"));
        let sink = Arc::clone(&order);
        manager.emitter().on(READY, move |_| sink.lock().push("ready"));

        let ready = manager.emitter().wait_for(READY);
        manager.mount(tree.root()).await;

        // Nothing initialized yet: only `prepared` has fired.
        assert_eq!(&*order.lock(), &["prepared"]);

        probe.mark_all_initialized();
        ready.await;
        assert_eq!(&*order.lock(), &["prepared", "ready"]);
    }

    #[tokio::test]
    async fn pluginsexecuted_fires_once_every_instance_executed() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::manual(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        declaring_node(&tree, "a");

        let executed = manager.emitter().wait_for(ALL_EXECUTED);
        manager.mount(tree.root()).await;

        probe.mark_all_initialized();
        probe.mark_all_executed();
        executed.await;
    }

    #[tokio::test]
    async fn duplicate_declarations_issue_one_load() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        let source = CountingSource::new(registry);
        let (tree, manager) =
            manager_with(Arc::clone(&source) as Arc<dyn ComponentSource>, &[]);
        declaring_node(&tree, "a");
        declaring_node(&tree, "a");

        manager.mount(tree.root()).await;

        assert_eq!(source.loads(), 1);
        assert_eq!(probe.created(), 2);
    }

    #[tokio::test]
    async fn disabled_components_are_neither_loaded_nor_mounted() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        registry.register("b", TestFactory::auto(&probe));
        let source = CountingSource::new(registry);
        let (tree, manager) =
            manager_with(Arc::clone(&source) as Arc<dyn ComponentSource>, &["b"]);
        let node = declaring_node(&tree, "a,b");

        manager.mount(tree.root()).await;

        assert_eq!(source.loads(), 1);
        let identity = manager.identity_of(node).unwrap();
        assert_eq!(manager.instances().count_for(identity), 1);
        assert!(!manager
            .instances()
            .component_names(identity)
            .contains(&ComponentName::new("b")));
    }

    #[tokio::test]
    async fn load_failure_mounts_a_stub_and_stalls_ready() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("b", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        let node = declaring_node(&tree, "x,b");

        let mut ready = manager.emitter().wait_for(READY);
        manager.mount(tree.root()).await;

        // The broken component is filed as a stub alongside the working one.
        let identity = manager.identity_of(node).unwrap();
        assert_eq!(manager.instances().count_for(identity), 2);
        assert_eq!(probe.created(), 1);

        // The stub never fires `initialized`, so the pass never turns ready.
        settle().await;
        assert!(futures::poll!(Pin::new(&mut ready)).is_pending());
    }

    #[tokio::test]
    async fn constructor_failures_do_not_block_siblings() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("bad", TestFactory::failing(&probe));
        registry.register("good", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        let node = declaring_node(&tree, "bad,good");

        let ready = manager.emitter().wait_for(READY);
        manager.mount(tree.root()).await;

        let identity = manager.identity_of(node).unwrap();
        assert_eq!(manager.instances().count_for(identity), 1);
        // The failed constructor registered no waits, so the pass completes.
        ready.await;
    }

    #[tokio::test]
    async fn whitespace_declared_names_resolve_real_implementations() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        registry.register("b", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        let node = declaring_node(&tree, "a, b");

        let ready = manager.emitter().wait_for(READY);
        manager.mount(tree.root()).await;

        // `" b"` must load the registered `b`, not settle as a stub.
        assert_eq!(probe.created(), 2);
        let identity = manager.identity_of(node).unwrap();
        let names = manager.instances().component_names(identity);
        assert!(names.contains(&ComponentName::new("b")));
        assert_eq!(manager.instances().count_for(identity), 2);
        // With no stub in the pass, `ready` fires.
        ready.await;
    }

    #[tokio::test]
    async fn process_without_declaring_nodes_is_a_noop() {
        let registry = ComponentRegistry::new();
        let source = CountingSource::new(registry);
        let (tree, manager) =
            manager_with(Arc::clone(&source) as Arc<dyn ComponentSource>, &[]);

        manager.process(tree.root()).await;

        assert_eq!(source.loads(), 0);
        assert!(manager.instances().is_empty());
    }

    // ─── Unmount path ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn unmount_tears_down_every_instance_and_the_identity_entry() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        registry.register("b", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        let node = declaring_node(&tree, "a,b");

        manager.mount(tree.root()).await;
        let identity = manager.identity_of(node).unwrap();

        manager.unmount(tree.root()).await;

        assert_eq!(probe.unmounted(), 2);
        assert!(!manager.instances().contains(identity));
        assert!(manager.instances().is_empty());
    }

    #[tokio::test]
    async fn unmounting_a_root_without_mounts_is_a_noop() {
        let registry = ComponentRegistry::new();
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        declaring_node(&tree, "never-mounted");

        // No mount pass ran: no identity, nothing to tear down, no error.
        manager.unmount(tree.root()).await;
        assert!(manager.instances().is_empty());
    }

    // ─── Mutation routing ────────────────────────────────────────────────────

    #[tokio::test]
    async fn inserted_subtrees_are_mounted_automatically() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);

        manager.mount(tree.root()).await;
        assert_eq!(probe.created(), 0);

        let node = tree.create_node("div");
        tree.set_attribute(node, "data-mount", "a").unwrap();
        tree.append_child(tree.root(), node).unwrap();

        settle().await;
        assert_eq!(probe.created(), 1);
        let identity = manager.identity_of(node).expect("mounted by the router");
        assert_eq!(manager.instances().count_for(identity), 1);
    }

    #[tokio::test]
    async fn removed_subtrees_are_unmounted_automatically() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        let node = declaring_node(&tree, "a");

        manager.mount(tree.root()).await;
        assert_eq!(probe.created(), 1);

        tree.remove_child(tree.root(), node).unwrap();
        settle().await;

        assert_eq!(probe.unmounted(), 1);
        assert!(manager.instances().is_empty());
    }

    #[tokio::test]
    async fn routing_does_not_keep_a_dropped_manager_alive() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);

        manager.mount(tree.root()).await;
        let weak = Arc::downgrade(&manager);

        // The routing task holds the manager weakly, so the last external
        // handle going away frees it.
        drop(manager);
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn declaration_attribute_changes_are_ignored() {
        let probe = Arc::new(Probe::default());
        let registry = ComponentRegistry::new();
        registry.register("a", TestFactory::auto(&probe));
        registry.register("b", TestFactory::auto(&probe));
        let (tree, manager) = manager_with(CountingSource::new(registry), &[]);
        let node = declaring_node(&tree, "a");

        manager.mount(tree.root()).await;
        assert_eq!(probe.created(), 1);

        // Changing the declaration is an unhandled extension point.
        tree.set_attribute(node, "data-mount", "a,b").unwrap();
        settle().await;

        assert_eq!(probe.created(), 1);
        assert_eq!(probe.unmounted(), 0);
    }
}
