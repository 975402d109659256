//! Typed publish/subscribe event aggregator.
//!
//! Decouples sibling presenters that must react to each other's domain
//! events without holding references to each other. Delivery is fully
//! synchronous and single-threaded in practice: `publish` returns only after
//! every matching live subscription has run, in subscription-registration
//! order. A nested `publish` from inside a handler completes before control
//! returns to the outer delivery loop (plain call-stack nesting, not a
//! queue).
//!
//! Two message shapes share the bus. *Event* messages are pure notification
//! and should not be mutated by handlers. *Request* messages carry mutable
//! reply fields the publisher reads back after `publish` returns, a
//! deliberate, documented exception to message immutability. The protocol
//! offers no guarantee when zero or several subscribers write the reply
//! fields: nothing is an error, and the last writer in registration order
//! wins. Publishers must check post-publish state themselves.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Anything publishable on the bus. Matching is by exact runtime type — no
/// polymorphic fan-out to wrapper or related types.
pub trait Message: Any + Send {}

impl<T: Any + Send> Message for T {}

type ErasedHandler = Arc<Mutex<dyn FnMut(&mut dyn Any) + Send>>;

struct Entry {
    seq: u64,
    alive: Arc<AtomicBool>,
    handler: ErasedHandler,
}

#[derive(Default)]
struct BusInner {
    topics: HashMap<TypeId, Vec<Entry>>,
    next_seq: u64,
}

/// Scope-wide event aggregator. Cheaply cloneable; clones share the same
/// subscription registry, so one bus handle per scope is passed to every
/// presenter that participates.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for messages of exactly type `M`.
    ///
    /// Multiple independent subscriptions for the same type all receive each
    /// publish, in the order they subscribed. Dropping the returned
    /// [`Subscription`] removes the handler; a disposed subscription never
    /// receives further messages, including the remainder of a publish
    /// already in flight.
    pub fn subscribe<M, F>(&self, mut handler: F) -> Subscription
    where
        M: Message,
        F: FnMut(&mut M) + Send + 'static,
    {
        let alive = Arc::new(AtomicBool::new(true));
        let erased: ErasedHandler = Arc::new(Mutex::new(move |message: &mut dyn Any| {
            if let Some(message) = message.downcast_mut::<M>() {
                handler(message);
            }
        }));
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.topics.entry(TypeId::of::<M>()).or_default().push(Entry {
            seq,
            alive: Arc::clone(&alive),
            handler: erased,
        });
        Subscription {
            bus: Arc::downgrade(&self.inner),
            topic: TypeId::of::<M>(),
            seq,
            alive,
        }
    }

    /// Deliver `message` synchronously to every live subscription for its
    /// exact type, in subscription order. Zero matching subscribers is a
    /// silent no-op, not an error.
    ///
    /// The entry list is snapshotted and the registry lock released before
    /// any handler runs, so handlers are free to subscribe, publish, or drop
    /// subscriptions. Reentrant delivery into a handler that is currently
    /// running (a handler publishing a message type it also subscribes to)
    /// is skipped with a warning.
    pub fn publish<M: Message>(&self, message: &mut M) {
        let snapshot: Vec<(Arc<AtomicBool>, ErasedHandler)> = {
            let mut inner = self.inner.lock();
            match inner.topics.get_mut(&TypeId::of::<M>()) {
                Some(entries) => {
                    entries.retain(|e| e.alive.load(Ordering::Acquire));
                    entries
                        .iter()
                        .map(|e| (Arc::clone(&e.alive), Arc::clone(&e.handler)))
                        .collect()
                }
                None => Vec::new(),
            }
        };
        if snapshot.is_empty() {
            tracing::trace!(message = std::any::type_name::<M>(), "publish with no subscribers");
            return;
        }
        for (alive, handler) in snapshot {
            // Re-check per entry: an earlier handler in this same delivery
            // may have dropped a later subscription.
            if !alive.load(Ordering::Acquire) {
                continue;
            }
            match handler.try_lock() {
                Some(mut handler) => (*handler)(&mut *message),
                None => tracing::warn!(
                    message = std::any::type_name::<M>(),
                    "reentrant delivery skipped: handler is already running"
                ),
            }
        }
    }

    /// Number of live subscriptions for `M`.
    pub fn subscriber_count<M: Message>(&self) -> usize {
        let inner = self.inner.lock();
        inner
            .topics
            .get(&TypeId::of::<M>())
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.alive.load(Ordering::Acquire))
                    .count()
            })
            .unwrap_or(0)
    }
}

/// Handle owning one subscription; dropping it rescinds delivery.
///
/// The bus holds no strong path back to a disposed handler, so subscribers
/// do not leak by going out of scope.
pub struct Subscription {
    bus: Weak<Mutex<BusInner>>,
    topic: TypeId,
    seq: u64,
    alive: Arc<AtomicBool>,
}

impl Subscription {
    /// Explicit form of drop, for call sites where `drop(sub)` reads poorly.
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        if let Some(inner) = self.bus.upgrade() {
            if let Some(entries) = inner.lock().topics.get_mut(&self.topic) {
                entries.retain(|e| e.seq != self.seq);
            }
        }
    }
}
