//! The event substrate used for lifecycle notifications.
//!
//! [`Emitter`] is a named-event listener registry: listeners are attached
//! with [`on`](Emitter::on) / [`once`](Emitter::once), detached with
//! [`un`](Emitter::un), and invoked synchronously by
//! [`fire`](Emitter::fire) / [`fire_with`](Emitter::fire_with). Event
//! delivery can be suspended globally or per event name.
//!
//! [`wait_for`](Emitter::wait_for) bridges the synchronous substrate into
//! async code: it returns an [`EventWait`] future resolving on the next fire
//! of the event. A wait for an event that never fires stays pending forever —
//! the mount manager's barrier semantics depend on this.
//!
//! # Example
//!
//! ```rust
//! use graft_core::Emitter;
//!
//! let emitter = Emitter::new();
//! let seen = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
//! let counter = seen.clone();
//! emitter.on("ready", move |_| {
//!     counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
//! });
//! emitter.fire("ready");
//! assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 1);
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

type ListenerFn = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Handle to a registered listener, used to detach it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    callback: ListenerFn,
    once: bool,
}

#[derive(Default)]
struct EventSlot {
    stack: Vec<ListenerEntry>,
    suspended: bool,
}

#[derive(Default)]
struct EmitterInner {
    events: HashMap<String, EventSlot>,
    suspended: bool,
    next_id: u64,
}

/// A suspendable, named-event listener registry.
#[derive(Default)]
pub struct Emitter {
    inner: Mutex<EmitterInner>,
}

impl Emitter {
    /// Creates an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a listener for `event`.
    pub fn on<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.attach(event, Arc::new(callback), false)
    }

    /// Attaches a listener that is detached after its first invocation.
    pub fn once<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.attach(event, Arc::new(callback), true)
    }

    fn attach(&self, event: &str, callback: ListenerFn, once: bool) -> ListenerId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner
            .events
            .entry(event.to_string())
            .or_default()
            .stack
            .push(ListenerEntry { id, callback, once });
        id
    }

    /// Detaches the listener registered under `id` for `event`.
    /// Unknown ids are ignored.
    pub fn un(&self, event: &str, id: ListenerId) {
        let mut inner = self.inner.lock();
        let emptied = match inner.events.get_mut(event) {
            Some(slot) => {
                slot.stack.retain(|entry| entry.id != id);
                slot.stack.is_empty() && !slot.suspended
            }
            None => false,
        };
        if emptied {
            inner.events.remove(event);
        }
    }

    /// Fires `event` with no arguments.
    pub fn fire(&self, event: &str) {
        self.fire_with(event, &[]);
    }

    /// Fires `event`, invoking every attached listener with `args`.
    ///
    /// Listeners run outside the internal lock, so they may freely attach or
    /// detach listeners on this emitter. Listeners attached during delivery
    /// are not invoked for the firing that attached them.
    pub fn fire_with(&self, event: &str, args: &[Value]) {
        let to_invoke: Vec<(ListenerId, ListenerFn, bool)> = {
            let inner = self.inner.lock();
            if inner.suspended {
                return;
            }
            match inner.events.get(event) {
                Some(slot) if !slot.suspended => slot
                    .stack
                    .iter()
                    .map(|e| (e.id, Arc::clone(&e.callback), e.once))
                    .collect(),
                _ => return,
            }
        };

        for (_, callback, _) in &to_invoke {
            callback(args);
        }

        let fired_once: Vec<ListenerId> = to_invoke
            .into_iter()
            .filter_map(|(id, _, once)| once.then_some(id))
            .collect();
        for id in fired_once {
            self.un(event, id);
        }
    }

    /// Suspends delivery of all events.
    pub fn suspend_events(&self) {
        self.inner.lock().suspended = true;
    }

    /// Resumes delivery of all events.
    pub fn resume_events(&self) {
        self.inner.lock().suspended = false;
    }

    /// Suspends delivery of a single event.
    pub fn suspend_event(&self, event: &str) {
        self.inner
            .lock()
            .events
            .entry(event.to_string())
            .or_default()
            .suspended = true;
    }

    /// Resumes delivery of a single event.
    pub fn resume_event(&self, event: &str) {
        let mut inner = self.inner.lock();
        let emptied = match inner.events.get_mut(event) {
            Some(slot) => {
                slot.suspended = false;
                slot.stack.is_empty()
            }
            None => false,
        };
        if emptied {
            inner.events.remove(event);
        }
    }

    /// Number of listeners currently attached for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .lock()
            .events
            .get(event)
            .map(|slot| slot.stack.len())
            .unwrap_or(0)
    }

    /// Returns a future resolving on the next fire of `event`.
    ///
    /// If the event is never fired (or the emitter is dropped first) the
    /// returned future stays pending forever.
    pub fn wait_for(&self, event: &str) -> EventWait {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        self.once(event, move |_| {
            if let Some(tx) = tx.lock().take() {
                let _ = tx.send(());
            }
        });
        EventWait::Pending(rx)
    }
}

/// A future resolving when an awaited event fires.
///
/// Returned by [`Emitter::wait_for`]. An `EventWait` whose event never fires
/// never resolves — including when the emitter behind it is dropped.
pub enum EventWait {
    /// The event already fired; resolves immediately.
    Ready,
    /// Waiting for the event to fire.
    Pending(oneshot::Receiver<()>),
    /// The sender was dropped without firing; never resolves.
    Stalled,
}

impl Future for EventWait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match this {
            EventWait::Ready => Poll::Ready(()),
            EventWait::Pending(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(())) => {
                    *this = EventWait::Ready;
                    Poll::Ready(())
                }
                Poll::Ready(Err(_)) => {
                    *this = EventWait::Stalled;
                    Poll::Pending
                }
                Poll::Pending => Poll::Pending,
            },
            EventWait::Stalled => Poll::Pending,
        }
    }
}
