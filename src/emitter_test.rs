use super::*;
use crate::error::Error;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn sample_event(lsn: u64) -> ChangeEvent {
    ChangeEvent {
        lsn,
        entry: LogEntry::new_set(vec!["a".to_string()], json!(1)),
    }
}

#[test]
fn test_handlers_fire_in_registration_order() {
    let emitter = Emitter::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let seen1 = Rc::clone(&seen);
    emitter.on_change(move |ev| {
        seen1.borrow_mut().push(("first", ev.lsn));
        Ok(())
    });
    let seen2 = Rc::clone(&seen);
    emitter.on_change(move |ev| {
        seen2.borrow_mut().push(("second", ev.lsn));
        Ok(())
    });

    emitter.emit(&sample_event(3)).unwrap();
    assert_eq!(*seen.borrow(), vec![("first", 3), ("second", 3)]);
}

#[test]
fn test_failing_handler_aborts_remaining_dispatch() {
    let emitter = Emitter::new();
    let fired = Rc::new(RefCell::new(false));

    emitter.on_change(|_ev| Err(Error::OutOfSync { expected: 1, got: 2 }));
    let fired2 = Rc::clone(&fired);
    emitter.on_change(move |_ev| {
        *fired2.borrow_mut() = true;
        Ok(())
    });

    let result = emitter.emit(&sample_event(1));
    assert!(result.is_err());
    assert!(!*fired.borrow(), "second handler must not run after first fails");
}

#[test]
fn test_handler_count_tracks_registrations() {
    let emitter = Emitter::new();
    assert_eq!(emitter.handler_count(), 0);
    emitter.on_change(|_ev| Ok(()));
    emitter.on_change(|_ev| Ok(()));
    assert_eq!(emitter.handler_count(), 2);
}
