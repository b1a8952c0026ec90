//! Hider Demo
//!
//! A minimal end-to-end run of the Graft mount engine:
//!
//! - a `hider` component that hides its node, configurable via the
//!   compact option payload (`data-hider="'hidden': false"`)
//! - a tree with declaring nodes, mounted through the bootstrap
//! - a node inserted after mount, picked up by the mutation router
//!
//! # Usage
//!
//! ```bash
//! cargo run --package hider-demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use graft::prelude::*;
use tracing::info;

// ============================================================================
// The hider component
// ============================================================================

/// Hides its node on mount and restores it on unmount.
struct Hider {
    lifecycle: Lifecycle,
    node: NodeId,
    tree: Tree,
}

impl Component for Hider {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn unmount(&mut self) -> ComponentResult<()> {
        self.tree.remove_attribute(self.node, "hidden")?;
        info!(node = %self.node, "Node restored");
        Ok(())
    }
}

struct HiderFactory;

impl ComponentFactory for HiderFactory {
    fn create(&self, ctx: MountContext) -> ComponentResult<Box<dyn Component>> {
        // `data-hider="'hidden': false"` opts a node out without unmounting.
        let hidden = ctx
            .options
            .get("hidden")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if hidden {
            ctx.tree.set_attribute(ctx.node, "hidden", "true")?;
            info!(node = %ctx.node, "Node hidden");
        }
        let lifecycle = Lifecycle::new();
        lifecycle.mark_initialized();
        lifecycle.mark_executed();
        Ok(Box::new(Hider {
            lifecycle,
            node: ctx.node,
            tree: ctx.tree,
        }))
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggingBuilder::new().with_level(tracing::Level::DEBUG).init();

    let registry = Arc::new(ComponentRegistry::new());
    registry.register("hider", Arc::new(HiderFactory));

    // Two declaring nodes, one of them opting out via its option payload.
    let tree = Tree::new();
    let banner = tree.create_node("banner");
    tree.set_attribute(banner, "data-mount", "hider")?;
    tree.append_child(tree.root(), banner)?;

    let sidebar = tree.create_node("sidebar");
    tree.set_attribute(sidebar, "data-mount", "hider")?;
    tree.set_attribute(sidebar, "data-hider", "'hidden': false")?;
    tree.append_child(tree.root(), sidebar)?;

    let bootstrap = Bootstrap::new(tree.clone(), registry);
    let manager = bootstrap.manager();
    let all_ready = manager.emitter().wait_for(READY);
    bootstrap.start().await;
    all_ready.await;
    info!("Initial mount pass ready");

    // Inserted after mount: the router picks this up on its own.
    let popup = tree.create_node("popup");
    tree.set_attribute(popup, "data-mount", "hider")?;
    tree.append_child(tree.root(), popup)?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(tree.attribute(popup, "hidden").as_deref(), Some("true"));

    // Removing the node unmounts its component, restoring the attribute.
    tree.remove_child(tree.root(), popup)?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(tree.attribute(popup, "hidden"), None);

    bootstrap.shutdown().await;
    info!("Engine shut down");
    Ok(())
}
