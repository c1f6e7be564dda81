use std::{cell::RefCell, rc::Rc};

use assert_call::{call, CallRecorder};
use fluxion::{
    dispatch, dispatch_class, subscribe_class, subscribe_global, try_dispatch_class, Store,
    StoreCore, StoreExt, StoreOp, Subscription, Target,
};

#[derive(Store)]
struct Counter {
    core: StoreCore,
    value: i64,
}

#[derive(Debug, StoreOp)]
enum CounterOp {
    Add { amount: i64 },
    Clear,
}

impl Counter {
    fn new() -> Self {
        Self {
            core: StoreCore::new(),
            value: 0,
        }
    }
    fn add(&mut self, amount: i64) {
        dispatch(self, CounterOp::Add { amount }, |s| s.value += amount)
    }
    fn clear(&mut self) {
        dispatch(self, CounterOp::Clear, |s| s.value = 0)
    }
}

#[test]
fn scopes_notify_global_then_class_then_instance() {
    let mut cr = CallRecorder::new();
    let mut counter = Counter::new();
    let _i = counter.subscribe(|_| call!("instance"));
    let _c = subscribe_class::<Counter>(|_| call!("class"));
    let _g = subscribe_global(|_| call!("global"));
    counter.add(1);
    cr.verify(["global", "class", "instance"]);
}

#[test]
fn registration_order_within_a_scope() {
    let mut cr = CallRecorder::new();
    let mut counter = Counter::new();
    let _g1 = subscribe_global(|_| call!("g1"));
    let _g2 = subscribe_global(|_| call!("g2"));
    counter.add(1);
    cr.verify(["g1", "g2"]);
}

#[test]
fn unsubscribed_listener_gets_nothing_more() {
    let mut cr = CallRecorder::new();
    let mut counter = Counter::new();
    let g = subscribe_global(|_| call!("g"));
    counter.add(1);
    g.unsubscribe();
    counter.add(2);
    counter.clear();
    cr.verify("g");
}

#[test]
fn dropping_the_handle_unsubscribes() {
    let mut cr = CallRecorder::new();
    let mut counter = Counter::new();
    let g = subscribe_global(|_| call!("g"));
    counter.add(1);
    drop(g);
    counter.add(2);
    cr.verify("g");
}

#[test]
fn clear_has_no_arguments() {
    let mut counter = Counter::new();
    let _g = subscribe_global(|action| {
        assert_eq!(action.op_id().name(), "clear");
        assert!(action.arguments().is_empty());
    });
    counter.clear();
}

#[test]
fn listener_cancelled_mid_pass_is_skipped() {
    let mut cr = CallRecorder::new();
    let mut counter = Counter::new();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let _g1 = subscribe_global({
        let slot = slot.clone();
        move |_| {
            call!("g1");
            if let Some(s) = slot.borrow_mut().take() {
                s.unsubscribe();
            }
        }
    });
    let g2 = subscribe_global(|_| call!("g2"));
    *slot.borrow_mut() = Some(g2);
    counter.add(1);
    counter.add(2);
    cr.verify(["g1", "g1"]);
}

#[test]
fn panicking_listener_does_not_abort_mutation_or_pass() {
    let mut cr = CallRecorder::new();
    let mut counter = Counter::new();
    let _g1 = subscribe_global(|_| panic!("boom"));
    let _g2 = subscribe_global(|_| call!("g2"));
    counter.add(5);
    assert_eq!(counter.value, 5);
    cr.verify("g2");
}

#[test]
fn listener_can_dispatch_reentrantly() {
    let mut cr = CallRecorder::new();
    let mirror = Rc::new(RefCell::new(Counter::new()));
    let mut counter = Counter::new();
    let _sync = {
        let mirror = mirror.clone();
        counter.subscribe(move |action| {
            if let Some(CounterOp::Add { amount }) = action.op::<CounterOp>() {
                call!("sync");
                mirror.borrow_mut().add(*amount);
            }
        })
    };
    let _inner = mirror.borrow().subscribe(|_| call!("mirror"));
    counter.add(4);
    cr.verify(["sync", "mirror"]);
    assert_eq!(mirror.borrow().value, 4);
}

#[test]
fn class_level_operations_use_a_class_target() {
    let mut cr = CallRecorder::new();
    let _c = subscribe_class::<Counter>(|action| {
        assert!(matches!(action.target(), Target::Class(_)));
        assert!(action.class().is::<Counter>());
        call!("{}", action.op_id());
    });
    dispatch_class::<Counter, _, _>(CounterOp::Clear, || {});
    cr.verify("clear");
}

#[test]
fn failed_class_level_operation_is_not_broadcast() {
    let mut cr = CallRecorder::new();
    let _g = subscribe_global(|_| call!("g"));
    let result: Result<(), &str> =
        try_dispatch_class::<Counter, _, _, _>(CounterOp::Clear, || Err("nope"));
    assert!(result.is_err());
    cr.verify(());
}
