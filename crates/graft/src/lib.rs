//! # Graft
//!
//! Declarative component mounting over mutable trees.
//!
//! ## Overview
//!
//! Graft attaches behavioral components to nodes of a mutable tree based on
//! declarative attributes. A node declares the components it wants
//! (`data-mount="hider,tabs"`), the engine resolves their implementations
//! asynchronously, instantiates them under a stable per-node identity, and
//! tears them down again when the node leaves the tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────┐ mutations ┌────────────────┐  scan/load/mount  ┌───────────┐
//! │  Tree  │──────────▶│ MutationRouter │──────────────────▶│ Mount     │
//! │        │           │                │                   │ Manager   │
//! └────────┘           └────────────────┘  teardown         └───────────┘
//!      ▲                                                         │
//!      └────────── identity attributes, option payloads ─────────┘
//! ```
//!
//! - **Tree**: in-memory attributed node tree with mutation observation
//! - **MutationRouter**: re-runs mount passes as the tree changes
//! - **MountManager**: scan, load (stub on failure), instantiate, synchronize
//! - **Components**: user implementations with a two-phase async lifecycle
//!
//! Each mount pass announces itself on the manager's emitter: `prepared`
//! once every instantiation was attempted, `ready` once every instance
//! initialized, `pluginsexecuted` once every instance executed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use graft::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     LoggingBuilder::new().init();
//!
//!     let registry = Arc::new(ComponentRegistry::new());
//!     registry.register("hider", Arc::new(HiderFactory));
//!
//!     let bootstrap = Bootstrap::new(Tree::new(), registry);
//!     bootstrap.reconfigure(ManagerConfig::load()?);
//!     bootstrap.start().await;
//!     Ok(())
//! }
//! ```

pub use graft_core as core;
pub use graft_framework as framework;
pub use graft_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use graft::prelude::*;
/// ```
pub mod prelude {
    // Runtime - entry point and configuration
    pub use graft_runtime::{Bootstrap, LoggingBuilder, ManagerConfig};

    // Engine - the manager and its pass events
    pub use graft_framework::{ALL_EXECUTED, MountManager, MountSettings, PREPARED, READY};

    // Component contract - for implementing components
    pub use graft_framework::{
        Component, ComponentError, ComponentFactory, ComponentName, ComponentRegistry,
        ComponentResult, ComponentSource, Lifecycle, MountContext,
    };

    // Tree - the substrate components mount onto
    pub use graft_core::{Emitter, Mutation, NodeId, Options, Tree};
}
