//! A pressable element rendered as a bracketed label.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Widget;

use crate::view::{BindableElement, TriggerConnection, TriggerListener};

/// A button the binder can wire to an action.
///
/// `press` fires the trigger listeners when the button is enabled and does
/// nothing otherwise. A disabled control never fires, independent of the
/// binder's own predicate check.
pub struct Button {
    label: String,
    enabled: AtomicBool,
    listeners: Arc<Mutex<Vec<(u64, TriggerListener)>>>,
    next_listener: AtomicU64,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: AtomicBool::new(true),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(0),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Simulate or forward a click. Listeners run outside the listener-list
    /// lock, so a handler may connect or disconnect freely.
    pub fn press(&self) {
        if !self.is_enabled() {
            tracing::trace!(button = %self.label, "press ignored while disabled");
            return;
        }
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

    fn line(&self) -> Line<'_> {
        let style = if self.is_enabled() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        Line::styled(format!("[ {} ]", self.label), style)
    }
}

impl BindableElement for Button {
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
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

impl Widget for &Button {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().render(area, buf);
    }
}
