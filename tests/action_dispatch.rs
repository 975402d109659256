mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use podium::action::{ActionDispatcher, ActionId, DispatchError};

fn counter_handler() -> (
    impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    Arc<AtomicUsize>,
) {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    let handler = move || {
        sink.fetch_add(1, Ordering::SeqCst);
        Ok(())
    };
    (handler, count)
}

#[test]
fn latest_registration_wins() {
    let dispatcher = ActionDispatcher::new();
    let id = ActionId::new("Order", "Refresh");
    let (first, first_count) = counter_handler();
    let (second, second_count) = counter_handler();

    dispatcher.register(id.clone(), first);
    dispatcher.register(id.clone(), second);
    dispatcher.execute(&id).unwrap();

    assert_eq!(first_count.load(Ordering::SeqCst), 0);
    assert_eq!(second_count.load(Ordering::SeqCst), 1);
}

#[test]
fn execute_unknown_action_errors() {
    let dispatcher = ActionDispatcher::new();
    let id = ActionId::new("Order", "Missing");

    let err = dispatcher.execute(&id).unwrap_err();
    assert!(matches!(err, DispatchError::UnknownAction(unknown) if unknown == id));
}

#[test]
fn disabled_action_errors_without_running_handler() {
    let dispatcher = ActionDispatcher::new();
    let id = ActionId::new("Order", "RemoveItem");
    let (handler, count) = counter_handler();

    dispatcher.register_guarded(id.clone(), handler, || false);
    let err = dispatcher.execute(&id).unwrap_err();

    assert!(matches!(err, DispatchError::ActionDisabled(_)));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn handler_error_passes_through() {
    let dispatcher = ActionDispatcher::new();
    let id = ActionId::new("Order", "Submit");

    dispatcher.register(id.clone(), || Err(anyhow::anyhow!("backend unavailable")));
    let err = dispatcher.execute(&id).unwrap_err();

    match err {
        DispatchError::Handler { id: failed, source } => {
            assert_eq!(failed, id);
            assert_eq!(source.to_string(), "backend unavailable");
        }
        other => panic!("expected Handler error, got {other:?}"),
    }
}

#[test]
fn unregister_removes_registration() {
    let dispatcher = ActionDispatcher::new();
    let id = ActionId::new("Order", "Refresh");
    let (handler, _) = counter_handler();

    dispatcher.register(id.clone(), handler);
    assert!(dispatcher.is_registered(&id));

    dispatcher.unregister(&id);
    assert!(!dispatcher.is_registered(&id));
    assert!(matches!(
        dispatcher.execute(&id),
        Err(DispatchError::UnknownAction(_))
    ));
}

#[test]
fn unregister_is_noop_when_absent() {
    let dispatcher = ActionDispatcher::new();
    dispatcher.unregister(&ActionId::new("Order", "NeverRegistered"));
}

#[test]
fn can_execute_defaults_to_true_for_unguarded() {
    let dispatcher = ActionDispatcher::new();
    let id = ActionId::new("Order", "Refresh");
    let (handler, _) = counter_handler();

    dispatcher.register(id.clone(), handler);
    assert!(dispatcher.can_execute(&id));
}

#[test]
fn can_execute_is_false_for_unknown() {
    let dispatcher = ActionDispatcher::new();
    assert!(!dispatcher.can_execute(&ActionId::new("Order", "Missing")));
}

#[test]
fn predicate_is_reevaluated_per_call() {
    let dispatcher = ActionDispatcher::new();
    let id = ActionId::new("Order", "RemoveItem");
    let flag = Arc::new(AtomicBool::new(false));
    let guard = Arc::clone(&flag);
    let (handler, count) = counter_handler();

    dispatcher.register_guarded(id.clone(), handler, move || guard.load(Ordering::SeqCst));

    assert!(!dispatcher.can_execute(&id));
    flag.store(true, Ordering::SeqCst);
    assert!(dispatcher.can_execute(&id));
    dispatcher.execute(&id).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn broadcast_reaches_observers() {
    let dispatcher = ActionDispatcher::new();
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    let _observer = dispatcher.observe_can_execute_changed(move || {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    dispatcher.raise_can_execute_changed();
    dispatcher.raise_can_execute_changed();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn dropped_observer_stops_receiving_broadcasts() {
    let dispatcher = ActionDispatcher::new();
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    let observer = dispatcher.observe_can_execute_changed(move || {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    dispatcher.raise_can_execute_changed();
    drop(observer);
    dispatcher.raise_can_execute_changed();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn clear_unregisters_everything() {
    let dispatcher = ActionDispatcher::new();
    let (first, _) = counter_handler();
    let (second, _) = counter_handler();
    dispatcher.register(ActionId::new("Order", "Refresh"), first);
    dispatcher.register(ActionId::new("Order", "Submit"), second);

    dispatcher.clear();
    assert!(!dispatcher.is_registered(&ActionId::new("Order", "Refresh")));
    assert!(!dispatcher.is_registered(&ActionId::new("Order", "Submit")));
}
