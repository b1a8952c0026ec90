//! # Graft Core
//!
//! The foundation layer of the Graft component mounter.
//!
//! This crate provides the substrate the mount manager is built on:
//!
//! - **Attribute Tree**: an in-memory mutable tree of attribute-carrying
//!   nodes with scoped, batched mutation notifications ([`Tree`], [`NodeId`],
//!   [`Mutation`])
//! - **Event Substrate**: a suspendable listener registry with oneshot-backed
//!   awaitable events ([`Emitter`], [`EventWait`])
//! - **Option Parsing**: the tolerant compact option-string parser used for
//!   per-component configuration payloads ([`options::parse`])
//!
//! ## Architecture
//!
//! Graft attaches behavioral components to tree nodes based on declarative
//! attributes. Core knows nothing about components: it owns the tree that
//! declares them, the mutation stream that keeps the mounted set consistent
//! over time, and the event primitive that lifecycle synchronization is
//! expressed with. Everything component-shaped lives in `graft-framework`.
//!
//! ```text
//! ┌──────────┐  mutations   ┌────────────────┐  lifecycle   ┌────────────┐
//! │   Tree   │─────────────▶│ Mount Manager  │─────────────▶│ Components │
//! │  (core)  │              │  (framework)   │              │            │
//! └──────────┘              └────────────────┘              └────────────┘
//! ```

pub mod error;
pub mod event;
pub mod options;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use event::{Emitter, EventWait, ListenerId};
pub use options::Options;
pub use tree::{Mutation, NodeId, ObserverId, Tree};
