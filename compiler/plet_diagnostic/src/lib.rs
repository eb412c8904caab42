//! Diagnostic channel for the Plet template engine.
//!
//! Every stage reports through one [`Handler`]: reader and parser errors are
//! converted to [`Diagnostic`]s, the evaluator emits them directly. Each
//! diagnostic carries a [`Level`], the file, and the line and column.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is proof that an error was emitted. The evaluator
//! unwinds with it so that a failure is never silent.

mod diagnostic;
mod emitter;
mod guarantee;
mod reporter;

pub use diagnostic::{shared_path, Diagnostic, Level};
pub use emitter::{ColorMode, TerminalEmitter};
pub use guarantee::ErrorGuaranteed;
pub use reporter::{Collector, Handler, Reporter};
