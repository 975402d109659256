//! Error taxonomies for the dispatch and binding subsystem.
//!
//! Lifecycle and binding violations are programmer errors: fail fast, never
//! retried. Runtime failures inside handlers are the handler's concern; the
//! dispatcher passes them through without logging or swallowing them.

use thiserror::Error;

use crate::action::ActionId;

/// Errors surfaced by [`crate::action::ActionDispatcher::execute`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No registration exists for the identity. Signals a wiring bug between
    /// binder and dispatcher; should not occur in correctly built screens.
    #[error("no handler registered for action '{0}'")]
    UnknownAction(ActionId),

    /// The registration's predicate currently returns false. A defensive
    /// double-check for direct callers — the binder is expected to have
    /// gated the trigger already.
    #[error("action '{0}' is disabled")]
    ActionDisabled(ActionId),

    /// The handler itself failed; the source error passes through unmodified.
    #[error("action '{id}' failed")]
    Handler {
        id: ActionId,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors surfaced by [`crate::action::ActionBinder`] operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// `bind` was called a second time on the same binder.
    #[error("binder is already bound to a dispatcher")]
    AlreadyBound,

    /// `add`/`add_range` after `bind`: the binding table is frozen once the
    /// trigger subscriptions exist.
    #[error("cannot add bindings after bind")]
    BindingsSealed,

    /// The element is already bound under a different action identity;
    /// an element may appear in at most one binding per binder.
    #[error("element is already bound to action '{0}'")]
    ElementRebound(ActionId),

    /// The binder has been disposed.
    #[error("binder has been disposed")]
    Disposed,
}
