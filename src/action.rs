use std::{
    any::Any,
    fmt::{self, Debug},
    rc::Rc,
};

use crate::{Store, StoreClass};


/// Symbolic identity of one store operation.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct OpId(&'static str);

impl OpId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }
    pub fn name(&self) -> &'static str {
        self.0
    }
}
impl Debug for OpId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}
impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

trait AnyDebug: Debug {
    fn as_any(&self) -> &dyn Any;
}
impl<T: Any + Debug> AnyDebug for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One captured operation argument, type-erased.
///
/// Cloning is cheap (`Rc`). The value is the one the operation was invoked
/// with; interior-mutable argument types (`Rc<RefCell<_>>` and the like)
/// will show later mutation, since only the handle is captured.
#[derive(Clone)]
pub struct ArgValue(Rc<dyn AnyDebug>);

impl ArgValue {
    pub fn new<T: Any + Debug>(value: T) -> Self {
        Self(Rc::new(value))
    }
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref()
    }
}
impl Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The closed set of operations a store exposes, one variant per action.
///
/// Usually derived with `#[derive(StoreOp)]` on an enum; `id` is the
/// snake_case variant name and `arguments` yields the variant's fields in
/// declaration order.
pub trait StoreOp: Any + Debug {
    /// Symbolic name of the invoked operation.
    fn id(&self) -> OpId;

    /// The invocation's arguments in declaration order.
    fn arguments(&self) -> Vec<ArgValue>;
}

/// What an [`Action`] was performed on.
#[derive(Copy, Clone)]
pub enum Target<'a> {
    /// An instance-level operation on this store.
    Instance(&'a dyn Store),
    /// A class-level operation on the store type.
    Class(StoreClass),
}

impl<'a> Target<'a> {
    /// The store the action ran on, when it was an instance operation.
    pub fn instance(&self) -> Option<&'a dyn Store> {
        match self {
            Target::Instance(store) => Some(*store),
            Target::Class(_) => None,
        }
    }
}
impl Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Instance(_) => f.write_str("Instance"),
            Target::Class(class) => write!(f, "Class({})", class.name()),
        }
    }
}

/// An immutable record of one store operation invocation.
///
/// Borrowed by listeners for the duration of a single notification pass;
/// the target reference is only valid inside the callback.
pub struct Action<'a> {
    target: Target<'a>,
    class: StoreClass,
    op: &'a dyn StoreOp,
}

impl<'a> Action<'a> {
    pub(crate) fn for_instance(
        store: &'a dyn Store,
        class: StoreClass,
        op: &'a dyn StoreOp,
    ) -> Self {
        Self {
            target: Target::Instance(store),
            class,
            op,
        }
    }
    pub(crate) fn for_class(class: StoreClass, op: &'a dyn StoreOp) -> Self {
        Self {
            target: Target::Class(class),
            class,
            op,
        }
    }

    pub fn target(&self) -> Target<'a> {
        self.target
    }

    /// Identity of the concrete store type the action belongs to, for both
    /// instance-level and class-level operations.
    pub fn class(&self) -> StoreClass {
        self.class
    }

    pub fn op_id(&self) -> OpId {
        self.op.id()
    }

    /// The captured arguments, in declaration order. Empty for zero-argument
    /// operations.
    pub fn arguments(&self) -> Vec<ArgValue> {
        self.op.arguments()
    }

    /// Downcasts the full operation payload to a concrete [`StoreOp`] enum.
    pub fn op<O: StoreOp>(&self) -> Option<&O> {
        let op: &dyn Any = self.op;
        op.downcast_ref()
    }
}
impl Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Action")
            .field("target", &self.target)
            .field("class", &self.class.name())
            .field("op", &self.op)
            .finish()
    }
}
