//! Boundary traits between presenters and the concrete UI.
//!
//! The core never renders anything. A view exposes named interactive
//! elements bindable through the [`ActionBinder`], a read-only accessor
//! returning its binder, and whatever domain data accessors its presenter
//! reads and writes directly.

use std::sync::Arc;

use crate::action::ActionBinder;

/// Listener invoked when an interactive element fires its trigger.
pub type TriggerListener = Arc<dyn Fn() + Send + Sync>;

/// An interactive element the binder can wire up: it fires a trigger when
/// activated and exposes an enabled flag the binder drives from the action's
/// enablement predicate.
///
/// Implementations must not fire triggers while disabled; the binder's
/// predicate check is a backstop, not the primary gate.
pub trait BindableElement: Send + Sync {
    /// Attach a trigger listener. The returned connection detaches the
    /// listener when dropped.
    fn connect_trigger(&self, listener: TriggerListener) -> TriggerConnection;

    fn set_enabled(&self, enabled: bool);

    fn is_enabled(&self) -> bool;
}

/// Detaches a trigger listener when dropped.
pub struct TriggerConnection {
    disconnect: Option<Box<dyn FnOnce() + Send>>,
}

impl TriggerConnection {
    pub fn new<F: FnOnce() + Send + 'static>(disconnect: F) -> Self {
        Self {
            disconnect: Some(Box::new(disconnect)),
        }
    }

    /// Detach eagerly instead of waiting for drop.
    pub fn disconnect(mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl Drop for TriggerConnection {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

/// A view as the presenter sees it.
///
/// `binder` is a property-style accessor: it returns a binder built once at
/// view construction and never performs binding work when read, so test
/// harnesses can inspect a view double without wiring real UI. That contract
/// is by convention: implementors must not construct the binder lazily
/// inside this call.
pub trait View: Send + Sync {
    fn binder(&self) -> &ActionBinder;
}

/// A view backing a top-level window, with show/activate/close semantics on
/// top of the plain [`View`] contract.
pub trait WindowView: View {
    fn show_window(&self);

    fn activate_window(&self);

    fn close_window(&self);
}
