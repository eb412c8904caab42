//! Command implementations. Each returns `false` when it reported errors.

mod debug;
mod run;

use std::io::IsTerminal;

use plet_diagnostic::{Handler, TerminalEmitter};
use plet_eval::{Interpreter, InterpreterBuilder};

use crate::options::Options;

pub use debug::{lex_file, parse_file};
pub use run::{render_file, run_file};

/// Read a file, exiting with a message if it cannot be read.
pub(super) fn read_file(path: &str) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

pub(super) fn emitter(options: &Options) -> TerminalEmitter<std::io::Stderr> {
    TerminalEmitter::stderr(options.color, std::io::stderr().is_terminal())
}

pub(super) fn interpreter(options: &Options) -> Interpreter {
    let mut builder = InterpreterBuilder::new().reporter(emitter(options));
    if let Some(limit) = options.max_loops {
        builder = builder.max_loop_iterations(limit);
    }
    builder.build()
}

/// Flush `handler`, print the error and warning counts, and report whether
/// the command succeeded.
pub(super) fn finish(handler: &Handler, options: &Options) -> bool {
    handler.flush();
    emitter(options).emit_summary(handler.error_count(), handler.warning_count());
    handler.has_errors().is_none()
}
