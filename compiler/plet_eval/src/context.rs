//! State shared by every environment of one build.

use std::fmt;
use std::rc::Rc;

use plet_diagnostic::Handler;
use plet_ir::SymbolTable;

use crate::{Env, ModuleCache};

/// Setup run on every new root environment, such as registering natives.
pub type PreludeHook = Rc<dyn Fn(&Env)>;

/// Symbol table, module cache, diagnostic channel and limits.
///
/// Built by [`InterpreterBuilder`](crate::InterpreterBuilder) and shared
/// through `Rc` by every [`Env`].
pub struct Context {
    symbols: Rc<SymbolTable>,
    handler: Handler,
    modules: ModuleCache,
    max_loop_iterations: u64,
    prelude: Vec<PreludeHook>,
}

impl Context {
    pub(crate) fn new(
        symbols: Rc<SymbolTable>,
        handler: Handler,
        max_loop_iterations: u64,
        prelude: Vec<PreludeHook>,
    ) -> Self {
        Context {
            symbols,
            handler,
            modules: ModuleCache::new(),
            max_loop_iterations,
            prelude,
        }
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    #[inline]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn modules(&self) -> &ModuleCache {
        &self.modules
    }

    /// Iterations allowed across all loops of one arena; 0 is unlimited.
    pub fn max_loop_iterations(&self) -> u64 {
        self.max_loop_iterations
    }

    /// Run the prelude hooks on `env`, in registration order.
    pub fn run_prelude(&self, env: &Env) {
        for hook in &self.prelude {
            hook(env);
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("handler", &self.handler)
            .field("modules", &self.modules.len())
            .field("max_loop_iterations", &self.max_loop_iterations)
            .field("prelude", &self.prelude.len())
            .finish_non_exhaustive()
    }
}
