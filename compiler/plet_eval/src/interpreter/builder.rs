//! `InterpreterBuilder` for configuring an [`Interpreter`].

use std::io::IsTerminal;
use std::rc::Rc;

use plet_diagnostic::{ColorMode, Handler, Reporter, TerminalEmitter};
use plet_ir::SymbolTable;

use super::Interpreter;
use crate::prelude::register_prelude;
use crate::{Context, Env, PreludeHook};

/// Default ceiling on loop iterations per arena.
pub const DEFAULT_MAX_LOOP_ITERATIONS: u64 = 1_000_000;

/// Builder for an [`Interpreter`].
///
/// Defaults: a fresh symbol table, diagnostics to stderr, a loop ceiling of
/// [`DEFAULT_MAX_LOOP_ITERATIONS`] and the standard prelude.
pub struct InterpreterBuilder {
    symbols: Option<Rc<SymbolTable>>,
    reporter: Option<Box<dyn Reporter>>,
    max_loop_iterations: u64,
    prelude: Vec<PreludeHook>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        let prelude: PreludeHook = Rc::new(register_prelude);
        InterpreterBuilder {
            symbols: None,
            reporter: None,
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
            prelude: vec![prelude],
        }
    }

    /// Share a symbol table with code that was lexed or parsed elsewhere.
    #[must_use]
    pub fn symbols(mut self, symbols: Rc<SymbolTable>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Where diagnostics go.
    #[must_use]
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Iterations allowed across the loops of one arena; 0 is unlimited.
    #[must_use]
    pub fn max_loop_iterations(mut self, limit: u64) -> Self {
        self.max_loop_iterations = limit;
        self
    }

    /// Run `hook` on every new root environment, after the hooks already
    /// added. Natives it defines override earlier ones of the same name.
    #[must_use]
    pub fn prelude(mut self, hook: impl Fn(&Env) + 'static) -> Self {
        self.prelude.push(Rc::new(hook));
        self
    }

    pub fn build(self) -> Interpreter {
        let reporter = self.reporter.unwrap_or_else(|| {
            let is_tty = std::io::stderr().is_terminal();
            Box::new(TerminalEmitter::stderr(ColorMode::Auto, is_tty))
        });
        let context = Rc::new(Context::new(
            self.symbols.unwrap_or_default(),
            Handler::from_boxed(reporter),
            self.max_loop_iterations,
            self.prelude,
        ));
        let root = Env::root(Rc::clone(&context));
        context.run_prelude(&root);
        tracing::debug!(max_loop_iterations = self.max_loop_iterations, "interpreter ready");
        Interpreter { context, root }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
