//! Integration tests for signal re-entrancy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use picklist_core::{ConnectionGuard, Signal};

#[test]
fn test_slot_can_emit_another_signal() {
    let first = Arc::new(Signal::<i32>::new());
    let second = Arc::new(Signal::<i32>::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let relay = second.clone();
    let _forward = first.connect_scoped(move |n| relay.emit(n * 10));
    let sink = seen.clone();
    let _record = second.connect_scoped(move |n| sink.lock().push(*n));

    first.emit(4);
    assert_eq!(*seen.lock(), vec![40]);
}

#[test]
fn test_slot_connected_during_emit_waits_for_next_emit() {
    let signal = Arc::new(Signal::<()>::new());
    let late_calls = Arc::new(AtomicUsize::new(0));
    let guards: Arc<Mutex<Vec<ConnectionGuard<()>>>> = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&signal);
    let counter = late_calls.clone();
    let store = guards.clone();
    let _installer = signal.connect_scoped(move |_| {
        if let Some(signal) = weak.upgrade() {
            let counter = counter.clone();
            store.lock().push(signal.connect_scoped(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
    });

    signal.emit(());
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    signal.emit(());
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);

    guards.lock().clear();
    assert_eq!(signal.connection_count(), 1);
}

#[test]
fn test_guards_dropped_on_other_threads() {
    let signal = Arc::new(Signal::<u8>::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let guard = signal.connect_scoped(|_| {});
            thread::spawn(move || drop(guard))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(signal.connection_count(), 0);
}
