//! Drives the lifecycle state machine for one presenter instance.

use std::sync::Arc;

use crate::action::ActionDispatcher;
use crate::bus::Subscription;
use crate::presenter::{LifecycleError, Presenter, PresenterState};
use crate::view::View;

/// Owns a presenter, its dispatcher, its attached view, and the bus
/// subscriptions retained on the presenter's behalf.
///
/// This is the embedded-sub-view flavor: the same core transitions with no
/// window semantics. Top-level windows wrap it in
/// [`WindowHost`](crate::presenter::WindowHost).
///
/// The host exposes its dispatcher for the view-binding step but never
/// exposes raw handler invocation — outside callers reach handlers only
/// through [`ActionDispatcher::execute`].
pub struct PresenterHost<P: Presenter> {
    presenter: P,
    dispatcher: ActionDispatcher,
    view: Option<Arc<P::View>>,
    state: PresenterState,
    subscriptions: Vec<Subscription>,
    initialized_once: bool,
}

impl<P: Presenter> PresenterHost<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            presenter,
            dispatcher: ActionDispatcher::new(),
            view: None,
            state: PresenterState::Created,
            subscriptions: Vec::new(),
            initialized_once: false,
        }
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn view(&self) -> Option<&Arc<P::View>> {
        self.view.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Attach the view this presenter drives.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyAttached`] unless the host is still
    /// `Created`; [`LifecycleError::Disposed`] after teardown.
    pub fn attach_view(&mut self, view: Arc<P::View>) -> Result<(), LifecycleError> {
        match self.state {
            PresenterState::Created => {}
            PresenterState::Disposed => return Err(LifecycleError::Disposed),
            state => return Err(LifecycleError::AlreadyAttached { state }),
        }
        self.view = Some(view);
        self.state = PresenterState::ViewAttached;
        Ok(())
    }

    /// Run the initialization sequence: `on_view_attached`, then
    /// `register_actions` (followed by binding the view's binder to this
    /// host's dispatcher when the view exposes bindings), then
    /// `on_initialize`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotAttached`] when no view is attached,
    /// [`LifecycleError::AlreadyInitialized`] on a second call,
    /// [`LifecycleError::Disposed`] after teardown.
    pub fn initialize(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            PresenterState::ViewAttached => {}
            PresenterState::Created => {
                return Err(LifecycleError::NotAttached { state: self.state })
            }
            PresenterState::Initialized => return Err(LifecycleError::AlreadyInitialized),
            PresenterState::Disposed => return Err(LifecycleError::Disposed),
        }
        let view = match &self.view {
            Some(view) => Arc::clone(view),
            None => return Err(LifecycleError::NotAttached { state: self.state }),
        };

        self.presenter.on_view_attached(&view);
        self.presenter.register_actions(&view, &self.dispatcher);
        if !view.binder().is_empty() {
            view.binder()
                .bind(&self.dispatcher)
                .map_err(LifecycleError::Bind)?;
        }
        self.presenter.on_initialize(&view);

        self.state = PresenterState::Initialized;
        self.initialized_once = true;
        Ok(())
    }

    /// Tie a bus subscription's life to this host; it is released on
    /// dispose.
    pub fn retain(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Tear down: unregister all actions, release retained subscriptions,
    /// dispose the view binder, and detach the view. Idempotent; callable
    /// from any state, skipping hooks that never ran.
    pub fn dispose(&mut self) {
        if self.state == PresenterState::Disposed {
            return;
        }
        tracing::trace!(state = ?self.state, "disposing presenter");
        self.dispatcher.clear();
        self.subscriptions.clear();
        if let Some(view) = self.view.take() {
            view.binder().dispose();
        }
        if self.initialized_once {
            self.presenter.on_dispose();
        }
        self.state = PresenterState::Disposed;
    }
}

impl<P: Presenter> Drop for PresenterHost<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}
