//! Wires interactive elements to a dispatcher.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::action::dispatcher::EnablementObserver;
use crate::action::{ActionDispatcher, ActionId, BindError, DispatchError};
use crate::view::{BindableElement, TriggerConnection, TriggerListener};

enum Phase {
    Collecting,
    Bound,
    Disposed,
}

struct Binding {
    id: ActionId,
    elements: Vec<Arc<dyn BindableElement>>,
}

struct BinderInner {
    phase: Phase,
    bindings: Vec<Binding>,
    connections: Vec<TriggerConnection>,
    broadcast: Option<EnablementObserver>,
}

/// Maps action identities to the concrete elements that trigger them.
///
/// The binder is the only component aware of interactive elements: it routes
/// their native trigger into [`ActionDispatcher::execute`] and drives their
/// enabled flag from the action's predicate. Bindings are collected up front
/// with [`add`](Self::add), frozen by [`bind`](Self::bind), and released on
/// [`dispose`](Self::dispose).
pub struct ActionBinder {
    inner: Mutex<BinderInner>,
}

impl Default for ActionBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionBinder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BinderInner {
                phase: Phase::Collecting,
                bindings: Vec::new(),
                connections: Vec::new(),
                broadcast: None,
            }),
        }
    }

    /// Register `element` as a trigger source for `id`.
    ///
    /// Adding the same identity twice merges element sets rather than
    /// duplicating the binding; adding the same element under the same
    /// identity is a no-op.
    ///
    /// # Errors
    ///
    /// - [`BindError::BindingsSealed`] after [`bind`](Self::bind) has run.
    /// - [`BindError::ElementRebound`] if the element already belongs to a
    ///   different identity — an element appears in at most one binding.
    pub fn add(&self, id: ActionId, element: Arc<dyn BindableElement>) -> Result<(), BindError> {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Collecting => {}
            Phase::Bound => return Err(BindError::BindingsSealed),
            Phase::Disposed => return Err(BindError::Disposed),
        }
        for binding in &inner.bindings {
            if binding.elements.iter().any(|e| Arc::ptr_eq(e, &element)) {
                if binding.id == id {
                    return Ok(());
                }
                return Err(BindError::ElementRebound(binding.id.clone()));
            }
        }
        match inner.bindings.iter_mut().find(|b| b.id == id) {
            Some(binding) => binding.elements.push(element),
            None => inner.bindings.push(Binding {
                id,
                elements: vec![element],
            }),
        }
        Ok(())
    }

    /// [`add`](Self::add) for a batch of pairs; stops at the first error.
    pub fn add_range<I>(&self, pairs: I) -> Result<(), BindError>
    where
        I: IntoIterator<Item = (ActionId, Arc<dyn BindableElement>)>,
    {
        for (id, element) in pairs {
            self.add(id, element)?;
        }
        Ok(())
    }

    /// True when no bindings have been added.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().bindings.is_empty()
    }

    /// Wire every stored binding to `dispatcher`.
    ///
    /// For each bound element this (a) subscribes to its trigger, routing it
    /// into `dispatcher.execute`, and (b) sets its enabled flag from the
    /// action's predicate — once immediately, and again on every
    /// [`ActionDispatcher::raise_can_execute_changed`] broadcast.
    ///
    /// A trigger arriving while the predicate is false is dropped by policy
    /// (the UI should already be disabled) rather than surfacing
    /// [`DispatchError::ActionDisabled`] to the user; handler failures
    /// reaching a trigger are logged, since the UI event loop has no caller
    /// to propagate them to.
    ///
    /// # Errors
    ///
    /// [`BindError::AlreadyBound`] on a second call.
    pub fn bind(&self, dispatcher: &ActionDispatcher) -> Result<(), BindError> {
        let snapshot: Vec<(ActionId, Vec<Arc<dyn BindableElement>>)> = {
            let mut inner = self.inner.lock();
            match inner.phase {
                Phase::Collecting => {}
                Phase::Bound => return Err(BindError::AlreadyBound),
                Phase::Disposed => return Err(BindError::Disposed),
            }
            inner.phase = Phase::Bound;
            inner
                .bindings
                .iter()
                .map(|b| (b.id.clone(), b.elements.clone()))
                .collect()
        };

        let mut connections = Vec::new();
        for (id, elements) in &snapshot {
            for element in elements {
                connections.push(element.connect_trigger(trigger_route(dispatcher, id)));
            }
        }

        let refresh_targets = snapshot.clone();
        let weak = dispatcher.downgrade();
        let broadcast = dispatcher.observe_can_execute_changed(move || {
            let Some(dispatcher) = weak.upgrade() else {
                return;
            };
            refresh(&dispatcher, &refresh_targets);
        });
        refresh(dispatcher, &snapshot);

        let mut inner = self.inner.lock();
        inner.connections = connections;
        inner.broadcast = Some(broadcast);
        Ok(())
    }

    /// Release all trigger subscriptions and the broadcast observer.
    /// Idempotent; dropping the binder disposes it.
    pub fn dispose(&self) {
        let (connections, broadcast) = {
            let mut inner = self.inner.lock();
            if matches!(inner.phase, Phase::Disposed) {
                return;
            }
            inner.phase = Phase::Disposed;
            inner.bindings.clear();
            (std::mem::take(&mut inner.connections), inner.broadcast.take())
        };
        // Detach outside the lock: disconnect callbacks land back in element
        // and dispatcher internals.
        drop(connections);
        drop(broadcast);
    }
}

impl Drop for ActionBinder {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn trigger_route(dispatcher: &ActionDispatcher, id: &ActionId) -> TriggerListener {
    let weak = dispatcher.downgrade();
    let id = id.clone();
    Arc::new(move || {
        let Some(dispatcher) = weak.upgrade() else {
            return;
        };
        if !dispatcher.can_execute(&id) {
            tracing::trace!(action = %id, "trigger ignored while disabled");
            return;
        }
        match dispatcher.execute(&id) {
            Ok(()) => {}
            Err(DispatchError::ActionDisabled(_)) => {
                // Predicate flipped between the check and the dispatch.
                tracing::trace!(action = %id, "trigger lost race with enablement");
            }
            Err(err) => tracing::error!(action = %id, error = ?err, "action handler failed"),
        }
    })
}

fn refresh(dispatcher: &ActionDispatcher, targets: &[(ActionId, Vec<Arc<dyn BindableElement>>)]) {
    for (id, elements) in targets {
        let enabled = dispatcher.can_execute(id);
        for element in elements {
            element.set_enabled(enabled);
        }
    }
}
