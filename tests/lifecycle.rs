mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{ScriptedMessages, StubView, StubWindow, TestElement};
use parking_lot::Mutex;
use podium::action::{ActionDispatcher, ActionId};
use podium::bus::EventBus;
use podium::presenter::{
    LifecycleError, Presenter, PresenterHost, PresenterState, WindowHost,
};
use podium::service::{CloseDecision, Confirmable, Confirmation};
use podium::view::View;

/// Presenter double recording the hook order.
struct RecordingPresenter {
    log: Arc<Mutex<Vec<&'static str>>>,
    element: Arc<TestElement>,
}

impl RecordingPresenter {
    fn new() -> (Self, Arc<Mutex<Vec<&'static str>>>, Arc<TestElement>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let element = TestElement::new();
        (
            Self {
                log: Arc::clone(&log),
                element: element.clone(),
            },
            log,
            element,
        )
    }
}

impl Presenter for RecordingPresenter {
    type View = StubView;

    fn on_view_attached(&mut self, _view: &Arc<StubView>) {
        self.log.lock().push("on_view_attached");
    }

    fn register_actions(&mut self, view: &Arc<StubView>, dispatcher: &ActionDispatcher) {
        self.log.lock().push("register_actions");
        dispatcher.register(ActionId::new("Recording", "Noop"), || Ok(()));
        view.binder()
            .add(ActionId::new("Recording", "Noop"), self.element.clone())
            .unwrap();
    }

    fn on_initialize(&mut self, _view: &Arc<StubView>) {
        self.log.lock().push("on_initialize");
    }

    fn on_dispose(&mut self) {
        self.log.lock().push("on_dispose");
    }
}

#[test]
fn initialize_before_attach_fails() {
    let (presenter, _, _) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);

    let err = host.initialize().unwrap_err();
    assert!(matches!(err, LifecycleError::NotAttached { .. }));
    assert_eq!(host.state(), PresenterState::Created);
}

#[test]
fn attach_twice_fails() {
    let (presenter, _, _) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);

    host.attach_view(StubView::new()).unwrap();
    let err = host.attach_view(StubView::new()).unwrap_err();
    assert!(matches!(err, LifecycleError::AlreadyAttached { .. }));
}

#[test]
fn initialize_twice_fails() {
    let (presenter, _, _) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);

    host.attach_view(StubView::new()).unwrap();
    host.initialize().unwrap();
    assert!(matches!(
        host.initialize(),
        Err(LifecycleError::AlreadyInitialized)
    ));
}

#[test]
fn hooks_run_in_order_and_binder_is_bound() {
    let (presenter, log, element) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);

    host.attach_view(StubView::new()).unwrap();
    host.initialize().unwrap();

    assert_eq!(
        *log.lock(),
        vec!["on_view_attached", "register_actions", "on_initialize"]
    );
    // The binder was bound right after register_actions: the element got
    // its initial enablement refresh from the unguarded action.
    assert_eq!(element.enabled_log(), vec![true]);
}

#[test]
fn dispose_is_idempotent_and_terminal() {
    let (presenter, log, _) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);

    host.attach_view(StubView::new()).unwrap();
    host.initialize().unwrap();

    host.dispose();
    host.dispose();
    host.dispose();
    assert_eq!(host.state(), PresenterState::Disposed);
    assert_eq!(
        log.lock().iter().filter(|h| **h == "on_dispose").count(),
        1
    );

    assert!(matches!(
        host.initialize(),
        Err(LifecycleError::Disposed)
    ));
    assert!(matches!(
        host.attach_view(StubView::new()),
        Err(LifecycleError::Disposed)
    ));
}

#[test]
fn dispose_before_initialize_skips_hooks_that_never_ran() {
    let (presenter, log, _) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);

    host.attach_view(StubView::new()).unwrap();
    host.dispose();

    assert_eq!(host.state(), PresenterState::Disposed);
    assert!(log.lock().is_empty());
}

#[test]
fn dispose_unregisters_actions() {
    let (presenter, _, _) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);

    host.attach_view(StubView::new()).unwrap();
    host.initialize().unwrap();
    assert!(host.dispatcher().is_registered(&ActionId::new("Recording", "Noop")));

    let dispatcher = host.dispatcher().clone();
    host.dispose();
    assert!(!dispatcher.is_registered(&ActionId::new("Recording", "Noop")));
}

#[test]
fn retained_subscription_is_released_on_dispose() {
    let (presenter, _, _) = RecordingPresenter::new();
    let mut host = PresenterHost::new(presenter);
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));

    host.attach_view(StubView::new()).unwrap();
    host.initialize().unwrap();

    let sink = Arc::clone(&count);
    host.retain(bus.subscribe::<u32, _>(move |_| {
        sink.fetch_add(1, Ordering::SeqCst);
    }));

    bus.publish(&mut 1u32);
    host.dispose();
    bus.publish(&mut 2u32);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// -- Window flavor ------------------------------------------------------------

/// Window presenter double with a dirty flag driving the close confirmation.
struct EditorPresenter {
    dirty: bool,
    committed: Arc<AtomicUsize>,
}

impl EditorPresenter {
    fn new(dirty: bool) -> (Self, Arc<AtomicUsize>) {
        let committed = Arc::new(AtomicUsize::new(0));
        (
            Self {
                dirty,
                committed: Arc::clone(&committed),
            },
            committed,
        )
    }
}

impl Presenter for EditorPresenter {
    type View = StubWindow;

    fn register_actions(&mut self, _view: &Arc<StubWindow>, _dispatcher: &ActionDispatcher) {}
}

impl Confirmable for EditorPresenter {
    fn has_changes(&self) -> bool {
        self.dirty
    }

    fn validate(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn commit(&mut self) -> anyhow::Result<()> {
        self.committed.fetch_add(1, Ordering::SeqCst);
        self.dirty = false;
        Ok(())
    }
}

#[test]
fn show_initializes_on_first_call_only() {
    let (presenter, _) = EditorPresenter::new(false);
    let mut host = WindowHost::new(presenter);
    let window = StubWindow::new();

    host.attach_view(window.clone()).unwrap();
    host.show().unwrap();
    assert_eq!(host.host().state(), PresenterState::Initialized);
    assert_eq!(window.shown(), 1);

    // Second show is just a show, not a re-initialize.
    host.show().unwrap();
    assert_eq!(window.shown(), 2);
}

#[test]
fn show_without_view_fails() {
    let (presenter, _) = EditorPresenter::new(false);
    let mut host = WindowHost::new(presenter);
    assert!(matches!(
        host.show(),
        Err(LifecycleError::NotAttached { .. })
    ));
}

#[test]
fn activate_forwards_to_window() {
    let (presenter, _) = EditorPresenter::new(false);
    let mut host = WindowHost::new(presenter);
    let window = StubWindow::new();

    host.attach_view(window.clone()).unwrap();
    host.show().unwrap();
    host.activate().unwrap();
    assert_eq!(window.activated(), 1);
}

#[test]
fn close_disposes_and_closes_window() {
    let (presenter, _) = EditorPresenter::new(false);
    let mut host = WindowHost::new(presenter);
    let window = StubWindow::new();

    host.attach_view(window.clone()).unwrap();
    host.show().unwrap();
    host.close();

    assert_eq!(host.host().state(), PresenterState::Disposed);
    assert_eq!(window.closed(), 1);

    // Idempotent: the view is already detached.
    host.close();
    assert_eq!(window.closed(), 1);
}

#[test]
fn close_confirmed_saves_when_user_says_yes() {
    let (presenter, committed) = EditorPresenter::new(true);
    let mut host = WindowHost::new(presenter);
    let window = StubWindow::new();
    let messages = ScriptedMessages::answering(Confirmation::Yes);

    host.attach_view(window.clone()).unwrap();
    host.show().unwrap();

    let decision = host.close_confirmed(&messages);
    assert_eq!(decision, CloseDecision::Saved);
    assert_eq!(committed.load(Ordering::SeqCst), 1);
    assert_eq!(window.closed(), 1);
}

#[test]
fn close_confirmed_cancel_keeps_window_open() {
    let (presenter, committed) = EditorPresenter::new(true);
    let mut host = WindowHost::new(presenter);
    let window = StubWindow::new();
    let messages = ScriptedMessages::answering(Confirmation::Cancel);

    host.attach_view(window.clone()).unwrap();
    host.show().unwrap();

    let decision = host.close_confirmed(&messages);
    assert_eq!(decision, CloseDecision::Cancel);
    assert_eq!(committed.load(Ordering::SeqCst), 0);
    assert_eq!(window.closed(), 0);
    assert_eq!(host.host().state(), PresenterState::Initialized);
}
