//! Plet Eval: the tree-walking interpreter for Plet scripts and templates.
//!
//! # Architecture
//!
//! - [`Value`]: the dynamically typed runtime value. Heap values belong to
//!   one arena and are deep-copied when they cross into another.
//! - [`Env`]: a lexical scope with a parent chain. Every scope shares the
//!   build's [`Context`] (symbols, module cache, diagnostics, limits).
//! - `exec`: evaluation of AST nodes; statement lists accumulate output.
//! - [`ModuleCache`]: parsed files by path, imported modules' exports and
//!   asset dimensions.
//! - [`Interpreter`]: the host entry point, configured through
//!   [`InterpreterBuilder`].
//!
//! Errors are reported through the context's
//! [`Handler`](plet_diagnostic::Handler) at the innermost failing node and
//! unwind as [`Control::Error`].

mod arena;
mod context;
mod control;
mod env;
pub mod errors;
mod exec;
mod import;
mod interpreter;
mod load_error;
pub mod module;
mod output;
pub mod prelude;
mod template;
pub mod value;

pub use arena::{Arena, ArenaId};
pub use context::{Context, PreludeHook};
pub use control::{Control, EvalResult};
pub use env::{ArgIndex, Env};
pub use errors::{EvalError, EvalErrorKind};
pub use interpreter::{Interpreter, InterpreterBuilder, DEFAULT_MAX_LOOP_ITERATIONS};
pub use load_error::LoadError;
pub use module::{ImportHook, Module, ModuleCache, ModuleKind, SourceKind};
pub use prelude::{check_args, check_args_between, register_prelude, ArgType};
pub use value::{Object, Value};

pub use plet_lexer::Mode;
