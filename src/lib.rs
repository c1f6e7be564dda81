//! Unidirectional-data-flow stores with observable actions.
//!
//! Application state lives in store types that compose a [`StoreCore`].
//! Every mutating operation routes through [`dispatch`] (or
//! [`try_dispatch`]), which runs the operation body and then broadcasts an
//! immutable [`Action`] record to subscribers at three scopes, in order:
//! all stores ([`subscribe_global`]), one store type ([`subscribe_class`])
//! and one store instance ([`StoreExt::subscribe`]).
//!
//! Dispatch is synchronous and single-threaded; registries are per thread.

mod action;
mod seq;
mod store;
mod subscription;

pub use action::*;
pub use seq::*;
pub use store::*;
pub use subscription::*;

pub use fluxion_macros::{Store, StoreOp};
