use std::{
    any::Any,
    cell::{Cell, RefCell},
    panic::{catch_unwind, AssertUnwindSafe},
    rc::{Rc, Weak},
};

use crate::Action;


pub(crate) type Listener = Box<dyn FnMut(&Action)>;

/// Handle for one listener registration.
///
/// The registry holds the entry only weakly, so dropping the handle
/// unsubscribes, exactly like calling [`unsubscribe`](Self::unsubscribe).
/// Cancellation takes effect immediately: a listener cancelled during a
/// notification pass that has not yet been reached is skipped in that pass
/// as well as all future ones.
#[must_use]
pub struct Subscription(Rc<SubscriptionData>);

impl Subscription {
    /// Cancels this registration.
    ///
    /// Idempotent, and safe to call from inside any listener callback,
    /// including this subscription's own (the in-flight action has already
    /// been delivered at that point).
    pub fn unsubscribe(&self) {
        self.0.cancel();
    }
}
impl Drop for Subscription {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

pub(crate) struct SubscriptionData {
    listener: RefCell<Option<Listener>>,
    cancelled: Cell<bool>,
}

impl SubscriptionData {
    fn new(listener: Listener) -> Rc<Self> {
        Rc::new(Self {
            listener: RefCell::new(Some(listener)),
            cancelled: Cell::new(false),
        })
    }
    fn cancel(&self) {
        self.cancelled.set(true);
        self.listener.borrow_mut().take();
    }
    fn is_live(&self) -> bool {
        !self.cancelled.get()
    }

    /// Invokes the listener once. The closure is checked out of the entry
    /// for the duration of the call, so the listener can cancel itself and
    /// nested dispatches never re-enter a listener that is already running.
    fn call(&self, action: &Action) {
        let Some(mut f) = self.listener.borrow_mut().take() else {
            return;
        };
        let result = catch_unwind(AssertUnwindSafe(|| f(action)));
        if self.is_live() {
            *self.listener.borrow_mut() = Some(f);
        }
        if let Err(payload) = result {
            log::error!(
                "listener panicked while handling `{}`: {}",
                action.op_id(),
                panic_message(&*payload)
            );
        }
    }
}

fn panic_message(payload: &dyn Any) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// One ordered registry of listeners; backs each of the three scopes.
#[derive(Default)]
pub(crate) struct SubscriberList(RefCell<Vec<Weak<SubscriptionData>>>);

impl SubscriberList {
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let data = SubscriptionData::new(listener);
        self.0.borrow_mut().push(Rc::downgrade(&data));
        Subscription(data)
    }

    /// Invokes every live listener in registration order.
    ///
    /// Dead and cancelled entries are swept first. Iteration runs over a
    /// snapshot, so listeners are free to subscribe, unsubscribe and
    /// dispatch further actions while being notified; subscriptions made
    /// during the pass are not notified until the next one.
    pub fn notify(&self, action: &Action) {
        let snapshot: Vec<Rc<SubscriptionData>> = {
            let mut entries = self.0.borrow_mut();
            entries.retain(|entry| entry.upgrade().is_some_and(|data| data.is_live()));
            entries.iter().filter_map(Weak::upgrade).collect()
        };
        for data in snapshot {
            if data.is_live() {
                data.call(action);
            }
        }
    }

    #[cfg(test)]
    pub fn entry_count(&self) -> usize {
        self.0.borrow().len()
    }
}
