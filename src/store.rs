use std::{
    any::{type_name, Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Debug},
    rc::Rc,
};

use crate::{Action, StoreOp, SubscriberList, Subscription};


/// Base type composed into every concrete store; owns the instance-scope
/// subscriber registry.
#[derive(Default)]
pub struct StoreCore {
    subscribers: SubscriberList,
}

impl StoreCore {
    pub fn new() -> Self {
        Self::default()
    }
    pub(crate) fn subscribers(&self) -> &SubscriberList {
        &self.subscribers
    }
}
impl Debug for StoreCore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("StoreCore")
    }
}

/// A state container whose operations are observable as [`Action`]s.
///
/// Usually derived with `#[derive(Store)]` on a struct composing a
/// [`StoreCore`] field.
pub trait Store: Any {
    fn core(&self) -> &StoreCore;
}

impl dyn Store {
    pub fn downcast_ref<S: Store>(&self) -> Option<&S> {
        let store: &dyn Any = self;
        store.downcast_ref()
    }
}

/// Instance-scope subscription, available on every store.
pub trait StoreExt: Store {
    /// Subscribes to actions performed on this specific instance.
    fn subscribe(&self, listener: impl FnMut(&Action) + 'static) -> Subscription {
        self.core().subscribers().subscribe(Box::new(listener))
    }
}
impl<S: Store + ?Sized> StoreExt for S {}

/// Identity of a concrete store type; the class-scope key.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct StoreClass {
    type_id: TypeId,
    name: &'static str,
}

impl StoreClass {
    pub fn of<S: Store>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            name: type_name::<S>(),
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn is<S: Store>(&self) -> bool {
        self.type_id == TypeId::of::<S>()
    }
    fn type_id(&self) -> TypeId {
        self.type_id
    }
}
impl Debug for StoreClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StoreClass({})", self.name)
    }
}

thread_local! {
    static REGISTRIES: Registries = Registries::default();
}

#[derive(Default)]
struct Registries {
    global: SubscriberList,
    classes: RefCell<HashMap<TypeId, Rc<SubscriberList>>>,
}

impl Registries {
    fn class(&self, class: StoreClass) -> Rc<SubscriberList> {
        self.classes
            .borrow_mut()
            .entry(class.type_id())
            .or_default()
            .clone()
    }
}

/// Subscribes to every action of every store on the current thread.
pub fn subscribe_global(listener: impl FnMut(&Action) + 'static) -> Subscription {
    REGISTRIES.with(|r| r.global.subscribe(Box::new(listener)))
}

/// Subscribes to every action whose target is a store of type `S`: all
/// instances as well as class-level operations.
pub fn subscribe_class<S: Store>(listener: impl FnMut(&Action) + 'static) -> Subscription {
    REGISTRIES.with(|r| r.class(StoreClass::of::<S>()).subscribe(Box::new(listener)))
}

fn broadcast(action: &Action, instance: Option<&SubscriberList>) {
    REGISTRIES.with(|r| r.global.notify(action));
    let class = REGISTRIES.with(|r| r.class(action.class()));
    class.notify(action);
    if let Some(instance) = instance {
        instance.notify(action);
    }
}

/// Runs one store action: executes `body` against `store`, then broadcasts
/// the resulting [`Action`] to the global, class and instance registries,
/// in that order, each in registration order.
///
/// Every public mutating operation of a store routes through here (or
/// [`try_dispatch`]), passing its own [`StoreOp`] variant. The op value is
/// captured before `body` runs, so listeners observe the arguments as they
/// were at the moment of invocation.
///
/// # Examples
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use fluxion::{dispatch, subscribe_global, Store, StoreCore, StoreOp};
///
/// #[derive(Store)]
/// struct Counter {
///     core: StoreCore,
///     value: i64,
/// }
///
/// #[derive(Debug, StoreOp)]
/// enum CounterOp {
///     Add { amount: i64 },
/// }
///
/// impl Counter {
///     fn add(&mut self, amount: i64) {
///         dispatch(self, CounterOp::Add { amount }, |s| s.value += amount)
///     }
/// }
///
/// let seen = Rc::new(Cell::new(0));
/// let _sub = subscribe_global({
///     let seen = seen.clone();
///     move |action| seen.set(seen.get() + action.arguments().len())
/// });
/// let mut counter = Counter { core: StoreCore::new(), value: 0 };
/// counter.add(3);
/// assert_eq!(counter.value, 3);
/// assert_eq!(seen.get(), 1);
/// ```
pub fn dispatch<S, O, R>(store: &mut S, op: O, body: impl FnOnce(&mut S) -> R) -> R
where
    S: Store,
    O: StoreOp,
{
    let result = body(store);
    let store: &S = store;
    let action = Action::for_instance(store, StoreClass::of::<S>(), &op);
    broadcast(&action, Some(store.core().subscribers()));
    result
}

/// Fallible form of [`dispatch`]: the action is broadcast only when `body`
/// returns `Ok`; an `Err` propagates to the caller without notifying anyone,
/// since the state did not change.
pub fn try_dispatch<S, O, R, E>(
    store: &mut S,
    op: O,
    body: impl FnOnce(&mut S) -> Result<R, E>,
) -> Result<R, E>
where
    S: Store,
    O: StoreOp,
{
    let value = body(store)?;
    let store: &S = store;
    let action = Action::for_instance(store, StoreClass::of::<S>(), &op);
    broadcast(&action, Some(store.core().subscribers()));
    Ok(value)
}

/// Class-level analogue of [`dispatch`], for operations that are associated
/// functions of the store type rather than methods on an instance. Only the
/// global and class registries are notified.
pub fn dispatch_class<S, O, R>(op: O, body: impl FnOnce() -> R) -> R
where
    S: Store,
    O: StoreOp,
{
    let result = body();
    let action = Action::for_class(StoreClass::of::<S>(), &op);
    broadcast(&action, None);
    result
}

/// Class-level analogue of [`try_dispatch`].
pub fn try_dispatch_class<S, O, R, E>(op: O, body: impl FnOnce() -> Result<R, E>) -> Result<R, E>
where
    S: Store,
    O: StoreOp,
{
    let value = body()?;
    let action = Action::for_class(StoreClass::of::<S>(), &op);
    broadcast(&action, None);
    Ok(value)
}
