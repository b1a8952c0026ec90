//! The component contract.
//!
//! A **component** is a loadable behavior unit bound to a tree node. Its
//! implementation is a [`ComponentFactory`]; mounting one produces a
//! [`Component`] instance owned by the manager's instance registry.
//!
//! Every instance carries a [`Lifecycle`], which fires `initialized` and
//! `executed` exactly once each. The mount pass joins over these events:
//! an instance that never marks its lifecycle keeps the pass-level `ready` /
//! `pluginsexecuted` events from firing — which is precisely the behavior the
//! stub fallback relies on.
//!
//! # Implementing a component
//!
//! ```rust
//! use graft_framework::{Component, ComponentFactory, ComponentResult, Lifecycle, MountContext};
//!
//! struct Hider {
//!     lifecycle: Lifecycle,
//! }
//!
//! impl Component for Hider {
//!     fn lifecycle(&self) -> &Lifecycle {
//!         &self.lifecycle
//!     }
//!
//!     fn unmount(&mut self) -> ComponentResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! struct HiderFactory;
//!
//! impl ComponentFactory for HiderFactory {
//!     fn create(&self, ctx: MountContext) -> ComponentResult<Box<dyn Component>> {
//!         ctx.tree.set_attribute(ctx.node, "hidden", "true")?;
//!         let lifecycle = Lifecycle::new();
//!         lifecycle.mark_initialized();
//!         lifecycle.mark_executed();
//!         Ok(Box::new(Hider { lifecycle }))
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};

use graft_core::event::{Emitter, EventWait};
use graft_core::options::Options;
use graft_core::tree::{NodeId, Tree};

use crate::error::ComponentResult;
use crate::manager::MountManager;

/// Lifecycle event fired once a component instance finished initializing.
pub const INITIALIZED: &str = "initialized";

/// Lifecycle event fired once a component instance finished executing.
pub const EXECUTED: &str = "executed";

// ─── ComponentName ───────────────────────────────────────────────────────────

/// Name of a component as written in the mount declaration attribute.
///
/// Names may contain slashes (`widget/hider`); the per-component options
/// attribute is derived from the normalized form — slashes replaced with
/// dashes, lower-cased, `data-` prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentName(String);

impl ComponentName {
    /// Wraps a component name. No normalization is applied to the name
    /// itself; callers trim declaration whitespace before constructing one.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as declared.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The attribute this component's option payload is read from.
    pub fn options_attribute(&self) -> String {
        format!("data-{}", self.0.replace('/', "-").to_lowercase())
    }
}

impl From<&str> for ComponentName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

/// Per-instance lifecycle state: an emitter plus once-only completion flags.
///
/// `initialized` and `executed` each fire at most once, no matter how often
/// the corresponding `mark_*` method is called.
#[derive(Default)]
pub struct Lifecycle {
    emitter: Emitter,
    initialized: AtomicBool,
    executed: AtomicBool,
}

impl Lifecycle {
    /// Creates a lifecycle with neither phase completed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The emitter lifecycle events are fired on.
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Marks the instance initialized, firing `initialized` on first call.
    pub fn mark_initialized(&self) {
        if !self.initialized.swap(true, Ordering::SeqCst) {
            self.emitter.fire(INITIALIZED);
        }
    }

    /// Marks the instance executed, firing `executed` on first call.
    pub fn mark_executed(&self) {
        if !self.executed.swap(true, Ordering::SeqCst) {
            self.emitter.fire(EXECUTED);
        }
    }

    /// Whether `initialized` has fired.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Whether `executed` has fired.
    pub fn is_executed(&self) -> bool {
        self.executed.load(Ordering::SeqCst)
    }

    /// A wait handle resolving once the instance is initialized.
    /// Resolves immediately when the phase already completed.
    pub fn initialized(&self) -> EventWait {
        if self.is_initialized() {
            // The event already fired and never fires again; registering a
            // listener now would strand it in the emitter.
            return EventWait::Ready;
        }
        let wait = self.emitter.wait_for(INITIALIZED);
        // Re-check: the mark may have landed between the flag check and the
        // registration, in which case the wait would stall.
        if self.is_initialized() {
            EventWait::Ready
        } else {
            wait
        }
    }

    /// A wait handle resolving once the instance has executed.
    pub fn executed(&self) -> EventWait {
        if self.is_executed() {
            return EventWait::Ready;
        }
        let wait = self.emitter.wait_for(EXECUTED);
        if self.is_executed() {
            EventWait::Ready
        } else {
            wait
        }
    }
}

// ─── MountContext ────────────────────────────────────────────────────────────

/// Everything a component implementation receives at instantiation time.
pub struct MountContext {
    /// The parsed per-component option payload.
    pub options: Options,
    /// The node the component is being mounted to.
    pub node: NodeId,
    /// The tree owning `node`.
    pub tree: Tree,
    /// The manager performing the mount. Held weakly: instances are owned by
    /// the manager's registry and must not keep it alive in turn.
    pub manager: Weak<MountManager>,
}

// ─── Component traits ────────────────────────────────────────────────────────

/// A mounted component instance.
///
/// Instances are owned exclusively by the instance registry entry they are
/// filed under; nothing else holds a reference to them.
pub trait Component: Send + Sync {
    /// The instance's lifecycle state.
    fn lifecycle(&self) -> &Lifecycle;

    /// Releases any resources the instance holds. Must be idempotent.
    fn unmount(&mut self) -> ComponentResult<()>;
}

/// A loadable, named, stateless component implementation.
pub trait ComponentFactory: Send + Sync {
    /// Instantiates the component for the given mount context.
    fn create(&self, ctx: MountContext) -> ComponentResult<Box<dyn Component>>;
}
