//! Non-local control flow.

use plet_diagnostic::ErrorGuaranteed;

use crate::Value;

/// Why evaluation left a node without producing a value.
#[derive(Clone, Debug)]
pub enum Control {
    /// `break`, consumed by the innermost loop.
    Break,
    /// `continue`, consumed by the innermost loop.
    Continue,
    /// `return`, consumed by the enclosing call or module.
    Return(Value),
    /// An error that has already been reported.
    Error(ErrorGuaranteed),
}

impl From<ErrorGuaranteed> for Control {
    fn from(guarantee: ErrorGuaranteed) -> Self {
        Control::Error(guarantee)
    }
}

pub type EvalResult<T = Value> = Result<T, Control>;
