//! # Graft Framework
//!
//! The Component Mount Manager: the orchestration engine that attaches
//! behavioral components to nodes of a [`graft_core::Tree`] based on
//! declarative attributes and keeps the attached set consistent as the tree
//! changes.
//!
//! A mount pass runs scan → load → mount:
//!
//! ```text
//! ┌─────────┐   declared    ┌────────┐  implementations  ┌──────────────┐
//! │ Scanner │──────────────▶│ Loader │──────────────────▶│ MountManager │
//! │         │   names       │        │  (stub on fail)   │  mount_all   │
//! └─────────┘               └────────┘                   └──────────────┘
//! ```
//!
//! The manager fires three pass-level events on its emitter:
//!
//! - `prepared` — synchronously, once every instantiation was attempted
//! - `ready` — once every mounted instance fired `initialized`
//! - `pluginsexecuted` — once every mounted instance fired `executed`
//!
//! The [`MutationRouter`] re-enters the pass pipeline whenever the observed
//! tree gains or loses nodes, without caller involvement.
//!
//! This layer deliberately knows nothing about where configuration comes from
//! or how logging is initialized; that lives in `graft-runtime`.

pub mod barrier;
pub mod component;
pub mod error;
pub mod identity;
pub mod loader;
pub mod manager;
pub mod registry;
pub mod router;
pub mod scanner;

pub use barrier::Barrier;
pub use component::{
    Component, ComponentFactory, ComponentName, EXECUTED, INITIALIZED, Lifecycle, MountContext,
};
pub use error::{ComponentError, ComponentResult, LoadError, LoadResult};
pub use identity::{IdentityRegistry, NodeIdentity};
pub use loader::{ComponentLoader, ComponentRegistry, ComponentSource};
pub use manager::{ALL_EXECUTED, MountManager, MountSettings, PREPARED, READY};
pub use registry::InstanceRegistry;
pub use router::MutationRouter;
pub use scanner::DeclarationScanner;
