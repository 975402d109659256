//! Central registry translating an action identity into executable behavior.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::action::{ActionId, DispatchError};

/// Zero-argument operation run when an action executes.
pub type ActionHandler = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Zero-argument predicate gating whether an action may run.
pub type ActionPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

type EnablementCallback = Arc<dyn Fn() + Send + Sync>;

struct Registration {
    handler: ActionHandler,
    can_execute: Option<ActionPredicate>,
}

#[derive(Default)]
struct DispatcherInner {
    actions: HashMap<ActionId, Registration>,
    observers: Vec<(u64, EnablementCallback)>,
    next_observer: u64,
}

/// Registry mapping action identities to handlers and enablement predicates,
/// plus a single broadcast signal for "something may have changed enablement".
///
/// Cheaply cloneable handle; clones share the same registry. Each presenter
/// owns exactly one dispatcher, and its registration table is never shared
/// across presenters.
#[derive(Clone, Default)]
pub struct ActionDispatcher {
    inner: Arc<Mutex<DispatcherInner>>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `id` with no enablement guard (always
    /// executable). Re-registering the same identity replaces the prior
    /// entry.
    pub fn register<F>(&self, id: ActionId, handler: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.insert(id, Arc::new(handler), None);
    }

    /// Register `handler` for `id`, gated by `can_execute`. The predicate
    /// drives both the enabled state of bound elements and a defensive
    /// runtime check in [`execute`](Self::execute).
    pub fn register_guarded<F, G>(&self, id: ActionId, handler: F, can_execute: G)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
        G: Fn() -> bool + Send + Sync + 'static,
    {
        self.insert(id, Arc::new(handler), Some(Arc::new(can_execute)));
    }

    fn insert(&self, id: ActionId, handler: ActionHandler, can_execute: Option<ActionPredicate>) {
        let mut inner = self.inner.lock();
        let replaced = inner
            .actions
            .insert(
                id.clone(),
                Registration {
                    handler,
                    can_execute,
                },
            )
            .is_some();
        if replaced {
            tracing::trace!(action = %id, "handler replaced");
        }
    }

    /// Remove the registration for `id`. No-op when absent.
    pub fn unregister(&self, id: &ActionId) {
        self.inner.lock().actions.remove(id);
    }

    /// Remove every registration. Called by the presenter host on dispose.
    pub fn clear(&self) {
        self.inner.lock().actions.clear();
    }

    pub fn is_registered(&self, id: &ActionId) -> bool {
        self.inner.lock().actions.contains_key(id)
    }

    /// Evaluate the enablement predicate for `id`.
    ///
    /// Returns true for a registered action without a guard, and false for an
    /// unknown identity — a bound element whose action was never registered
    /// renders disabled rather than wired to nothing.
    pub fn can_execute(&self, id: &ActionId) -> bool {
        let guard = {
            let inner = self.inner.lock();
            match inner.actions.get(id) {
                Some(reg) => reg.can_execute.clone(),
                None => return false,
            }
        };
        // Predicate runs outside the registry lock; it may consult state
        // that takes its own locks.
        match guard {
            Some(can_execute) => can_execute(),
            None => true,
        }
    }

    /// Execute the handler registered for `id`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownAction`] when no registration exists.
    /// - [`DispatchError::ActionDisabled`] when the predicate currently
    ///   returns false. Callers routing UI triggers are expected to have
    ///   checked already; this is the guard against stale triggers.
    /// - [`DispatchError::Handler`] carrying any error the handler raised,
    ///   unmodified.
    pub fn execute(&self, id: &ActionId) -> Result<(), DispatchError> {
        let (handler, guard) = {
            let inner = self.inner.lock();
            match inner.actions.get(id) {
                Some(reg) => (reg.handler.clone(), reg.can_execute.clone()),
                None => return Err(DispatchError::UnknownAction(id.clone())),
            }
        };
        if let Some(can_execute) = guard {
            if !can_execute() {
                return Err(DispatchError::ActionDisabled(id.clone()));
            }
        }
        tracing::trace!(action = %id, "executing");
        handler().map_err(|source| DispatchError::Handler {
            id: id.clone(),
            source,
        })
    }

    /// Synchronously notify every observer that enablement predicates should
    /// be re-evaluated.
    ///
    /// This is the only mechanism for state-driven enablement updates:
    /// presenter code must call it whenever state a predicate depends on
    /// changes outside of handling that same action. The observer list is
    /// snapshotted and the registry lock released before any callback runs.
    pub fn raise_can_execute_changed(&self) {
        let observers: Vec<EnablementCallback> = {
            let inner = self.inner.lock();
            inner.observers.iter().map(|(_, cb)| cb.clone()).collect()
        };
        tracing::trace!(observers = observers.len(), "enablement broadcast");
        for observer in observers {
            observer();
        }
    }

    /// Subscribe to the enablement broadcast. Dropping the returned handle
    /// removes the observer.
    pub fn observe_can_execute_changed<F>(&self, callback: F) -> EnablementObserver
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_observer;
        inner.next_observer += 1;
        inner.observers.push((id, Arc::new(callback)));
        EnablementObserver {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub(crate) fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher(Arc::downgrade(&self.inner))
    }
}

/// Weak handle held by trigger closures so that bound elements do not keep
/// their dispatcher alive.
pub(crate) struct WeakDispatcher(Weak<Mutex<DispatcherInner>>);

impl WeakDispatcher {
    pub(crate) fn upgrade(&self) -> Option<ActionDispatcher> {
        self.0.upgrade().map(|inner| ActionDispatcher { inner })
    }
}

/// Handle for an enablement-broadcast observer; dropping it unsubscribes.
pub struct EnablementObserver {
    inner: Weak<Mutex<DispatcherInner>>,
    id: u64,
}

impl Drop for EnablementObserver {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().observers.retain(|(id, _)| *id != self.id);
        }
    }
}
