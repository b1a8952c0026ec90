//! Graft Runtime - Orchestration layer for the Graft mount engine.
//!
//! This crate provides everything around the engine that is not the engine:
//!
//! - Configuration loading and normalization (`ManagerConfig`)
//! - Logging setup with a runtime enable toggle (`logging`)
//! - Bootstrap wiring of tree, source, and manager (`Bootstrap`)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use graft_core::Tree;
//! use graft_framework::ComponentRegistry;
//! use graft_runtime::{Bootstrap, ManagerConfig, logging::LoggingBuilder};
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
//!
//!     // …mutate the tree, components mount and unmount on their own…
//!
//!     bootstrap.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;

// Re-exports
pub use bootstrap::Bootstrap;
pub use config::ManagerConfig;
pub use error::{ConfigError, ConfigResult};
pub use logging::{LogFormat, LoggingBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
