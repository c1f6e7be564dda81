use proc_macro::TokenStream;
use syn_utils::into_macro_output;

#[macro_use]
mod syn_utils;

mod store_impl;
mod store_op_impl;

/// Derives the `Store` trait for a struct that composes a `StoreCore` field.
///
/// Exactly one field of type `StoreCore` must be present; `Store::core`
/// delegates to it.
///
/// # Examples
///
/// ```ignore
/// #[derive(Store)]
/// struct CounterStore {
///     core: StoreCore,
///     value: i64,
/// }
/// ```
#[proc_macro_derive(Store)]
pub fn derive_store(input: TokenStream) -> TokenStream {
    into_macro_output(store_impl::derive_store(input.into()))
}

/// Derives the `StoreOp` trait for an enum whose variants are the store's
/// operations.
///
/// The generated `id` returns the variant name converted to snake_case
/// (`AddTodo` becomes `add_todo`); the generated `arguments` returns the
/// variant's field values in declaration order. Every field type must
/// implement `Clone + Debug` and be `'static`.
///
/// # Examples
///
/// ```ignore
/// #[derive(Debug, StoreOp)]
/// enum TodoOp {
///     AddTodo { text: String },
///     ToggleTodo { id: TodoId },
///     ClearCompleted,
/// }
/// ```
#[proc_macro_derive(StoreOp)]
pub fn derive_store_op(input: TokenStream) -> TokenStream {
    into_macro_output(store_op_impl::derive_store_op(input.into()))
}
