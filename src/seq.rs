
/// Returns a new vector with `f` applied to each element, preserving order.
/// The input is never mutated.
pub fn map<T, U>(items: &[T], mut f: impl FnMut(&T) -> U) -> Vec<U> {
    items.iter().map(|item| f(item)).collect()
}

/// Fallible [`map`]: stops at the first error, discarding the partial
/// result.
pub fn try_map<T, U, E>(
    items: &[T],
    mut f: impl FnMut(&T) -> Result<U, E>,
) -> Result<Vec<U>, E> {
    items.iter().map(|item| f(item)).collect()
}

/// Returns the elements satisfying `pred`, cloned, in their original
/// relative order. Idempotent over any predicate.
pub fn filter<T: Clone>(items: &[T], mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| pred(*item)).cloned().collect()
}
