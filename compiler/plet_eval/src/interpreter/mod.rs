//! The host-facing entry point.

mod builder;

use std::path::Path;
use std::rc::Rc;

use plet_diagnostic::{shared_path, Diagnostic, ErrorGuaranteed, Handler};
use plet_ir::SymbolTable;
use plet_lexer::Mode;
use tracing::debug;

use crate::import::define_location;
use crate::module::{ImportHook, Module, ModuleKind, Parsed, SourceKind};
use crate::{exec, template, Context, Env, LoadError, ModuleCache, Value};

pub use builder::{InterpreterBuilder, DEFAULT_MAX_LOOP_ITERATIONS};

/// Parses, caches and evaluates modules against one [`Context`].
///
/// The root environment is created by [`InterpreterBuilder::build`] and has
/// the prelude hooks applied.
pub struct Interpreter {
    context: Rc<Context>,
    root: Env,
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// An interpreter with the default configuration.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn root_env(&self) -> &Env {
        &self.root
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.context.symbols()
    }

    pub fn modules(&self) -> &ModuleCache {
        self.context.modules()
    }

    pub fn handler(&self) -> &Handler {
        self.context.handler()
    }

    /// Parse a source buffer into a module without caching it. Diagnostics
    /// are reported; check [`Module::parse_error`].
    pub fn parse(&self, source: &[u8], path: &Path, mode: Mode) -> Module {
        let file = shared_path(path);
        let output = plet_parse::parse_source(source, Rc::clone(&file), self.symbols(), mode);
        let mut parse_error = None;
        for diagnostic in output.diagnostics() {
            parse_error = self.handler().emit(&diagnostic).or(parse_error);
        }
        let parsed = Parsed {
            ast: output.ast,
            parse_error,
        };
        Module::new(ModuleKind::User(parsed), file, None)
    }

    /// Load a script through the module cache.
    pub fn load_script(&self, path: &Path) -> Result<Rc<Module>, LoadError> {
        self.load(path, SourceKind::Script)
    }

    /// Load a template through the module cache.
    pub fn load_template(&self, path: &Path) -> Result<Rc<Module>, LoadError> {
        self.load(path, SourceKind::Template)
    }

    fn load(&self, path: &Path, kind: SourceKind) -> Result<Rc<Module>, LoadError> {
        let module = self
            .modules()
            .load(path, kind, self.symbols(), self.handler())?;
        if module.parse_error().is_some() {
            return Err(LoadError::Syntax {
                path: path.to_path_buf(),
            });
        }
        Ok(module)
    }

    /// Evaluate a module's top level in `env`, with `FILE` and `DIR` bound
    /// to its location.
    pub fn eval_module(&self, module: &Module, env: &Env) -> Result<Value, ErrorGuaranteed> {
        if let Some(guarantee) = module.parse_error() {
            return Err(guarantee);
        }
        let Some(ast) = module.ast() else {
            return Ok(Value::Nil);
        };
        if let Err(error) = define_location(env, module.file()) {
            return Err(self.handler().emit_error(Diagnostic::error(error.to_string())));
        }
        exec::eval_module(ast, env)
    }

    /// A fresh root environment for one page; see [`Interpreter::eval_template`].
    pub fn template_env(&self, data: &Value, parent: &Env) -> Env {
        template::template_env(&self.context, data, parent)
    }

    /// Evaluate a template and the chain of layouts it selects through
    /// `LAYOUT`.
    pub fn eval_template(&self, module: &Rc<Module>, env: &Env) -> Result<Value, ErrorGuaranteed> {
        template::eval_template(module, env)
    }

    /// Parse (through the cache) and evaluate a data script, returning its
    /// value. The value is allocated in a new arena under the root.
    pub fn load_data(&self, path: &Path) -> Result<Value, LoadError> {
        let module = self.load(path, SourceKind::Data)?;
        debug!(path = %path.display(), "loading data");
        let env = Env::new_arena_child(&self.root);
        self.eval_module(&module, &env).map_err(|_| LoadError::Eval {
            path: path.to_path_buf(),
        })
    }

    /// Record the dimensions of an image asset.
    pub fn add_asset(&self, path: &Path, width: u32, height: u32) -> Rc<Module> {
        self.modules().add_asset(path, width, height)
    }

    /// Dimensions of a registered asset.
    pub fn asset_size(&self, path: &Path) -> Option<(u32, u32)> {
        match self.modules().get(path)?.kind() {
            ModuleKind::Asset { width, height } => Some((*width, *height)),
            _ => None,
        }
    }

    /// Make `import(name)` call `hook` instead of reading a file.
    pub fn register_system(&self, name: &str, hook: impl Fn(&Env) -> Value + 'static) {
        let hook: ImportHook = Rc::new(hook);
        self.modules().register_system(name, hook);
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
