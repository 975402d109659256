//! Shared test doubles for the framework tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use podium::action::ActionBinder;
use podium::service::{Confirmation, MessageService};
use podium::view::{BindableElement, TriggerConnection, TriggerListener, View, WindowView};

/// Scripted element: records every enablement change and can fire its
/// trigger on demand — even while disabled, so tests can exercise the
/// binder's predicate gate directly.
pub struct TestElement {
    enabled: AtomicBool,
    enabled_log: Mutex<Vec<bool>>,
    listeners: Arc<Mutex<Vec<(u64, TriggerListener)>>>,
    next_listener: AtomicU64,
}

impl TestElement {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            enabled: AtomicBool::new(true),
            enabled_log: Mutex::new(Vec::new()),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(0),
        })
    }

    /// Fire the trigger regardless of the enabled flag, simulating a stale
    /// click the toolkit failed to suppress.
    pub fn fire(&self) {
        let listeners: Vec<TriggerListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Every value `set_enabled` was called with, in order.
    pub fn enabled_log(&self) -> Vec<bool> {
        self.enabled_log.lock().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl BindableElement for TestElement {
    fn connect_trigger(&self, listener: TriggerListener) -> TriggerConnection {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, listener));
        let weak: Weak<Mutex<Vec<(u64, TriggerListener)>>> = Arc::downgrade(&self.listeners);
        TriggerConnection::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.lock().retain(|(lid, _)| *lid != id);
            }
        })
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        self.enabled_log.lock().push(enabled);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// View double exposing a prebuilt binder and nothing else.
pub struct StubView {
    binder: ActionBinder,
}

impl StubView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            binder: ActionBinder::new(),
        })
    }
}

impl View for StubView {
    fn binder(&self) -> &ActionBinder {
        &self.binder
    }
}

/// Window double counting show/activate/close calls.
pub struct StubWindow {
    binder: ActionBinder,
    shown: AtomicUsize,
    activated: AtomicUsize,
    closed: AtomicUsize,
}

impl StubWindow {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            binder: ActionBinder::new(),
            shown: AtomicUsize::new(0),
            activated: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        })
    }

    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn activated(&self) -> usize {
        self.activated.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl View for StubWindow {
    fn binder(&self) -> &ActionBinder {
        &self.binder
    }
}

impl WindowView for StubWindow {
    fn show_window(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    fn activate_window(&self) {
        self.activated.fetch_add(1, Ordering::SeqCst);
    }

    fn close_window(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Message service double scripted with a single reply; records toasts.
pub struct ScriptedMessages {
    reply: Confirmation,
    toasts: Mutex<Vec<String>>,
}

impl ScriptedMessages {
    pub fn answering(reply: Confirmation) -> Self {
        Self {
            reply,
            toasts: Mutex::new(Vec::new()),
        }
    }

    pub fn toasts(&self) -> Vec<String> {
        self.toasts.lock().clone()
    }
}

impl MessageService for ScriptedMessages {
    fn confirm_yes_no(&self, _title: &str, _prompt: &str) -> bool {
        self.reply == Confirmation::Yes
    }

    fn confirm_ok_cancel(&self, _title: &str, _prompt: &str) -> bool {
        self.reply != Confirmation::Cancel
    }

    fn confirm_yes_no_cancel(&self, _title: &str, _prompt: &str) -> Confirmation {
        self.reply
    }

    fn toast(&self, text: &str) {
        self.toasts.lock().push(text.to_string());
    }
}
