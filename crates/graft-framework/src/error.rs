//! Error types for the Graft framework layer.

use thiserror::Error;

/// Errors that can occur while resolving a component implementation.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// No implementation is registered under the requested load path.
    #[error("no component registered under '{path}'")]
    NotFound {
        /// The load path that was requested.
        path: String,
    },

    /// The component source failed while loading.
    #[error("component source failure for '{path}': {reason}")]
    Source {
        /// The load path that was requested.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

/// Errors raised by component constructors and teardown.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// The component constructor rejected its mount context.
    #[error("constructor failed: {0}")]
    Constructor(String),

    /// The component's teardown failed.
    #[error("unmount failed: {0}")]
    Unmount(String),

    /// A tree operation performed by the component failed.
    #[error(transparent)]
    Tree(#[from] graft_core::TreeError),

    /// Any other component-defined failure.
    #[error("{0}")]
    Other(String),
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for component construction and teardown.
pub type ComponentResult<T> = Result<T, ComponentError>;
