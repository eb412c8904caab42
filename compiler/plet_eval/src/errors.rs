//! Runtime errors raised by the evaluator.
//!
//! Operators and lookups return an [`EvalError`]; the frame evaluating the
//! offending node reports it with that node's span and unwinds with
//! [`Control::Error`](crate::Control::Error). Each error is reported once.

use std::fmt;

use plet_ir::BinaryOp;

/// Category of a runtime error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EvalErrorKind {
    /// Undefined variable.
    Binding,
    /// Wrong number of arguments.
    Arity,
    /// Wrong operand or argument type, or calling a non-function.
    Type,
    /// Division by zero, index out of bounds, loop ceiling.
    Runtime,
    /// An import or layout that could not be read.
    Io,
}

impl EvalErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EvalErrorKind::Binding => "BindingError",
            EvalErrorKind::Arity => "ArityError",
            EvalErrorKind::Type => "TypeError",
            EvalErrorKind::Runtime => "RuntimeError",
            EvalErrorKind::Io => "IOError",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error that has not been reported yet.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Binding

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Binding, format!("undefined variable '{name}'"))
}

// Calls

pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::Arity,
        format!("{name}: expected {expected} arguments, got {got}"),
    )
}

pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("value of type {type_name} is not a function"),
    )
}

// Operators

pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("unsupported operand types for '{}': {left} and {right}", op.as_str()),
    )
}

pub fn unary_type_mismatch(op: &str, operand: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("unsupported operand type for unary '{op}': {operand}"),
    )
}

pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::Runtime, "division by zero")
}

pub fn modulo_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::Runtime, "modulo by zero")
}

pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Runtime, format!("integer overflow in {operation}"))
}

// Indexing and fields

pub fn cannot_index(type_name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Type, format!("cannot index a value of type {type_name}"))
}

pub fn non_integer_index(type_name: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("array index must be an int, not {type_name}"),
    )
}

pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::Runtime,
        format!("array index {index} out of bounds for length {len}"),
    )
}

pub fn cannot_access_field(type_name: &str, field: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("cannot access field '{field}' of a value of type {type_name}"),
    )
}

// Control flow

pub fn for_requires_iterable(type_name: &str) -> EvalError {
    EvalError::new(
        EvalErrorKind::Type,
        format!("cannot iterate over a value of type {type_name}"),
    )
}

pub fn loop_limit_exceeded(limit: u64) -> EvalError {
    EvalError::new(
        EvalErrorKind::Runtime,
        format!("maximum number of loop iterations exceeded ({limit})"),
    )
}

pub fn invalid_assignment_target() -> EvalError {
    EvalError::new(EvalErrorKind::Type, "invalid assignment target")
}

// Modules

pub fn circular_import(path: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Runtime, format!("circular import of '{path}'"))
}
