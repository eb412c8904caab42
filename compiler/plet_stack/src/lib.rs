//! Stack growth for the recursive parser and evaluator.
//!
//! Templates have no nesting limit: a page may nest blocks, calls and
//! layouts arbitrarily deep. Every recursive entry point in the parser and
//! the interpreter goes through [`ensure_sufficient_stack`], which moves
//! onto a freshly allocated stack segment when the current one runs low.
//!
//! On `wasm32` the closure is called directly.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the remaining stack
/// is below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
