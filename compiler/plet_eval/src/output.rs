//! Accumulates the values produced by a statement list.

use plet_ir::SymbolTable;

use crate::{Env, Value};

/// Output of a statement list.
///
/// `nil` contributes nothing. A single contribution is kept as is, so
/// `{x}` evaluates to `x` itself; two or more are concatenated as display
/// text into a string.
#[derive(Default)]
pub(crate) enum Output {
    #[default]
    Empty,
    Single(Value),
    Text(Vec<u8>),
}

impl Output {
    pub(crate) fn push(&mut self, value: Value, symbols: &SymbolTable) {
        if value.is_nil() {
            return;
        }
        match self {
            Output::Empty => *self = Output::Single(value),
            Output::Single(first) => {
                let mut text = first.display_bytes(symbols);
                value.write_display(symbols, &mut text);
                *self = Output::Text(text);
            }
            Output::Text(text) => value.write_display(symbols, text),
        }
    }

    /// Append raw template text.
    pub(crate) fn push_text(&mut self, text: &[u8], env: &Env) {
        if text.is_empty() {
            return;
        }
        match self {
            Output::Text(buffer) => buffer.extend_from_slice(text),
            _ => self.push(env.string(text), env.symbols()),
        }
    }

    pub(crate) fn finish(self, env: &Env) -> Value {
        match self {
            Output::Empty => Value::Nil,
            Output::Single(value) => value,
            Output::Text(text) => env.string(text),
        }
    }

    /// Like [`Output::finish`] but always a string.
    pub(crate) fn finish_string(self, env: &Env) -> Value {
        match self {
            Output::Empty => env.string(""),
            Output::Single(value @ Value::String(_)) => value,
            Output::Single(value) => env.string(value.display_bytes(env.symbols())),
            Output::Text(text) => env.string(text),
        }
    }
}

#[cfg(test)]
mod tests;
