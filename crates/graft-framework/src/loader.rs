//! Asynchronous component resolution with graceful fallback.
//!
//! [`ComponentLoader`] resolves a de-duplicated set of component names to
//! [`ComponentFactory`] implementations through a [`ComponentSource`]. A
//! name that fails to load is bound to a [`StubFactory`] instead of failing
//! the pass: the stub logs the failure when instantiated and never completes
//! its lifecycle, so a missing component never aborts the mount of siblings.
//!
//! Resolution is pass-scoped: nothing is cached between calls, and
//! concurrent [`resolve`](ComponentLoader::resolve) calls are independent.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::component::{Component, ComponentFactory, Lifecycle, MountContext};
use crate::error::{ComponentResult, LoadError, LoadResult};

// ─── ComponentSource ─────────────────────────────────────────────────────────

/// Resolves component load paths to implementations, asynchronously.
#[async_trait]
pub trait ComponentSource: Send + Sync {
    /// Loads the implementation registered under `path`.
    async fn load(&self, path: &str) -> LoadResult<Arc<dyn ComponentFactory>>;

    /// Changes the base location implementations are loaded from. Sources
    /// without a location concept ignore this.
    fn set_base(&self, _base: &str) {}
}

// ─── ComponentRegistry ───────────────────────────────────────────────────────

/// An in-process [`ComponentSource`]: an explicit load-path → factory map.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: RwLock<HashMap<String, Arc<dyn ComponentFactory>>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `path`. A later registration under the same
    /// path replaces the earlier one.
    pub fn register(&self, path: &str, factory: Arc<dyn ComponentFactory>) {
        debug!(component = %path, "Component registered");
        self.factories.write().insert(path.to_string(), factory);
    }

    /// Removes the factory registered under `path`.
    pub fn unregister(&self, path: &str) {
        self.factories.write().remove(path);
    }
}

#[async_trait]
impl ComponentSource for ComponentRegistry {
    async fn load(&self, path: &str) -> LoadResult<Arc<dyn ComponentFactory>> {
        self.factories
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: path.to_string(),
            })
    }
}

// ─── Stub fallback ───────────────────────────────────────────────────────────

/// The fallback implementation substituted when a component fails to load.
///
/// Instantiating it logs a warning carrying the requested name and the load
/// error; the resulting instance never fires `initialized` or `executed`, so
/// the pass it belongs to stalls its `ready` barrier by design.
pub struct StubFactory {
    name: String,
    error: LoadError,
}

impl StubFactory {
    /// Creates a stub bound to the failed name and its load error.
    pub fn new(name: impl Into<String>, error: LoadError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl ComponentFactory for StubFactory {
    fn create(&self, _ctx: MountContext) -> ComponentResult<Box<dyn Component>> {
        warn!(
            component = %self.name,
            error = %self.error,
            "Could not load component — mounting a stub instead"
        );
        Ok(Box::new(StubComponent {
            lifecycle: Lifecycle::new(),
        }))
    }
}

struct StubComponent {
    lifecycle: Lifecycle,
}

impl Component for StubComponent {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn unmount(&mut self) -> ComponentResult<()> {
        Ok(())
    }
}

// ─── ComponentLoader ─────────────────────────────────────────────────────────

/// Resolves requested component names for one mount pass.
pub struct ComponentLoader {
    source: Arc<dyn ComponentSource>,
    load_from: String,
}

impl ComponentLoader {
    /// Creates a loader reading from `source`, prefixing every name with the
    /// `load_from` path segment (empty for no prefix).
    pub fn new(source: Arc<dyn ComponentSource>, load_from: impl Into<String>) -> Self {
        Self {
            source,
            load_from: load_from.into(),
        }
    }

    /// The source implementations are resolved through.
    pub fn source(&self) -> &Arc<dyn ComponentSource> {
        &self.source
    }

    fn path_for(&self, name: &str) -> String {
        if self.load_from.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.load_from, name)
        }
    }

    /// Resolves every requested name, substituting a [`StubFactory`] for
    /// names that fail to load. The returned future completes only after
    /// every name has settled and never fails itself.
    pub async fn resolve(
        &self,
        names: Vec<String>,
    ) -> HashMap<String, Arc<dyn ComponentFactory>> {
        let loads = names.into_iter().map(|name| {
            let path = self.path_for(&name);
            let source = Arc::clone(&self.source);
            async move {
                let factory = match source.load(&path).await {
                    Ok(factory) => factory,
                    Err(error) => {
                        Arc::new(StubFactory::new(name.clone(), error)) as Arc<dyn ComponentFactory>
                    }
                };
                (name, factory)
            }
        });
        future::join_all(loads).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::Tree;
    use std::sync::Weak;

    struct NoopComponent {
        lifecycle: Lifecycle,
    }

    impl Component for NoopComponent {
        fn lifecycle(&self) -> &Lifecycle {
            &self.lifecycle
        }

        fn unmount(&mut self) -> ComponentResult<()> {
            Ok(())
        }
    }

    struct NoopFactory;

    impl ComponentFactory for NoopFactory {
        fn create(&self, _ctx: MountContext) -> ComponentResult<Box<dyn Component>> {
            Ok(Box::new(NoopComponent {
                lifecycle: Lifecycle::new(),
            }))
        }
    }

    fn context(tree: &Tree) -> MountContext {
        MountContext {
            options: graft_core::Options::new(),
            node: tree.root(),
            tree: tree.clone(),
            manager: Weak::new(),
        }
    }

    #[tokio::test]
    async fn resolve_binds_registered_names() {
        let registry = Arc::new(ComponentRegistry::new());
        registry.register("hider", Arc::new(NoopFactory));
        let loader = ComponentLoader::new(registry, "");

        let resolved = loader.resolve(vec!["hider".to_string()]).await;
        assert!(resolved.contains_key("hider"));
    }

    #[tokio::test]
    async fn load_from_prefixes_the_lookup_path() {
        let registry = Arc::new(ComponentRegistry::new());
        registry.register("components/hider", Arc::new(NoopFactory));
        let loader = ComponentLoader::new(registry, "components");

        let resolved = loader.resolve(vec!["hider".to_string()]).await;
        // Resolved map is keyed by the requested name, not the load path.
        assert!(resolved.contains_key("hider"));
    }

    #[tokio::test]
    async fn unresolvable_names_settle_as_stubs() {
        let registry = Arc::new(ComponentRegistry::new());
        let loader = ComponentLoader::new(registry, "");

        let resolved = loader.resolve(vec!["missing".to_string()]).await;
        let factory = resolved.get("missing").expect("stub must be bound");

        let tree = Tree::new();
        let instance = factory.create(context(&tree)).unwrap();
        assert!(!instance.lifecycle().is_initialized());
        assert!(!instance.lifecycle().is_executed());
    }
}
