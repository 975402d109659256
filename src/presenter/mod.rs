//! Presenter lifecycle.
//!
//! A presenter owns the application logic behind one view and exactly one
//! [`ActionDispatcher`](crate::action::ActionDispatcher). The host drives a
//! strictly forward state machine around it:
//!
//! ```text
//! Created ──attach_view──→ ViewAttached ──initialize──→ Initialized
//!    │                          │                            │
//!    └──────────────────────────┴───────────dispose──────────┴──→ Disposed
//! ```
//!
//! Each forward transition happens at most once; `dispose` is reachable from
//! any state, idempotent, and terminal. Operations invoked from the wrong
//! state fail fast; these are programmer errors, not recoverable
//! conditions.

mod host;
mod window;

pub use host::PresenterHost;
pub use window::WindowHost;

use std::sync::Arc;

use thiserror::Error;

use crate::action::{ActionDispatcher, BindError};
use crate::view::View;

/// Lifecycle position of a presenter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    Created,
    ViewAttached,
    Initialized,
    Disposed,
}

/// Errors raised by lifecycle transitions invoked from the wrong state.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// `attach_view` after a view was already attached.
    #[error("view already attached (state {state:?})")]
    AlreadyAttached { state: PresenterState },

    /// `initialize` (or a window operation) before a view is attached.
    #[error("no view attached (state {state:?})")]
    NotAttached { state: PresenterState },

    /// `initialize` a second time.
    #[error("presenter already initialized")]
    AlreadyInitialized,

    /// Any forward transition after `dispose`.
    #[error("presenter has been disposed")]
    Disposed,

    /// The view's binder refused to bind during initialization, usually a
    /// view instance reused across presenter hosts.
    #[error("view binder rejected bind")]
    Bind(#[source] BindError),
}

/// Application logic behind one view.
///
/// The host calls the hooks in a fixed order during
/// [`PresenterHost::initialize`]: `on_view_attached`, then
/// `register_actions`, then `on_initialize`. `register_actions` runs exactly
/// once per presenter instance, after the view is attached and before
/// `on_initialize`, so action handlers can safely capture the attached view.
/// `on_dispose` runs during teardown, only if initialization completed.
pub trait Presenter: Send + 'static {
    type View: View + ?Sized;

    fn on_view_attached(&mut self, _view: &Arc<Self::View>) {}

    /// Register this presenter's actions into its own dispatcher and add
    /// element bindings to the view's binder. The host binds the binder to
    /// the dispatcher right after this hook returns.
    fn register_actions(&mut self, view: &Arc<Self::View>, dispatcher: &ActionDispatcher);

    fn on_initialize(&mut self, _view: &Arc<Self::View>) {}

    fn on_dispose(&mut self) {}
}
