//! Shared mutable state with lock-then-notify change delivery.
//!
//! Collaborator services shared across presenters (a shared order service
//! reached by several screens, say) guard their state under a single lock.
//! The discipline here: mutate and compute whatever the notification needs
//! while holding the lock, release it, and only then invoke change
//! callbacks. A callback is free to re-enter the cell (read it, mutate it,
//! or detach itself) without deadlocking, at the cost of a small window
//! where a second mutation can race ahead of a still-in-flight
//! notification. At the single-threaded UI layer delivery is synchronous,
//! so that window never opens in practice.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_listener: u64,
}

/// A value behind one coarse lock, with change callbacks fired after the
/// lock is released. Cheaply cloneable; clones share the value.
pub struct ObservedState<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for ObservedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> ObservedState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    /// Clone the current value out.
    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    /// Read under the lock without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.lock().value)
    }

    /// Mutate under the lock, then notify every listener with the
    /// post-mutation value. The snapshot handed to listeners is captured
    /// while the lock is held; no listener ever runs with the lock held.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, after, listeners) = {
            let mut inner = self.inner.lock();
            let result = f(&mut inner.value);
            let after = inner.value.clone();
            let listeners: Vec<Listener<T>> =
                inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (result, after, listeners)
        };
        for listener in listeners {
            listener(&after);
        }
        result
    }

    /// Register a change listener. Dropping the handle detaches it.
    pub fn observe<F>(&self, listener: F) -> ObserverHandle
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push((id, Arc::new(listener)));
            id
        };
        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        ObserverHandle {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.lock().listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }
}

/// Detaches an [`ObservedState`] listener when dropped.
pub struct ObserverHandle {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}
