//! Parsed modules and the module cache.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use plet_diagnostic::{shared_path, ErrorGuaranteed, Handler};
use plet_ir::{Ast, SymbolTable};
use plet_lexer::Mode;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{Env, LoadError, Value};

/// Builds the value of `import(name)` for a system module.
pub type ImportHook = Rc<dyn Fn(&Env) -> Value>;

/// An AST and whether parsing it failed.
pub struct Parsed {
    pub ast: Rc<Ast>,
    /// Set when the file had lex or syntax errors; they were reported when
    /// it was parsed.
    pub parse_error: Option<ErrorGuaranteed>,
}

pub enum ModuleKind {
    /// Provided by the host; importing it calls the hook.
    System(ImportHook),
    /// A script or template.
    User(Parsed),
    /// A data script, evaluated for its value.
    Data(Parsed),
    Asset { width: u32, height: u32 },
}

/// How a file is read into a module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SourceKind {
    Script,
    Template,
    Data,
}

impl SourceKind {
    fn mode(self) -> Mode {
        match self {
            SourceKind::Script | SourceKind::Data => Mode::Script,
            SourceKind::Template => Mode::Template,
        }
    }
}

/// One entry of the module cache.
pub struct Module {
    kind: ModuleKind,
    /// How the cache read the file; `None` for host-registered entries.
    source: Option<SourceKind>,
    file: Rc<Path>,
    mtime: Option<SystemTime>,
    dirty: Cell<bool>,
    /// Exports object of an evaluated user module.
    exports: RefCell<Option<Value>>,
    evaluating: Cell<bool>,
}

impl Module {
    pub fn new(kind: ModuleKind, file: Rc<Path>, mtime: Option<SystemTime>) -> Self {
        Module {
            kind,
            source: None,
            file,
            mtime,
            dirty: Cell::new(false),
            exports: RefCell::new(None),
            evaluating: Cell::new(false),
        }
    }

    /// Record how the file was read.
    #[must_use]
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    pub fn kind(&self) -> &ModuleKind {
        &self.kind
    }

    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }

    pub fn file(&self) -> &Rc<Path> {
        &self.file
    }

    pub fn mtime(&self) -> Option<SystemTime> {
        self.mtime
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// The AST of a user or data module.
    pub fn ast(&self) -> Option<&Rc<Ast>> {
        match &self.kind {
            ModuleKind::User(parsed) | ModuleKind::Data(parsed) => Some(&parsed.ast),
            _ => None,
        }
    }

    pub fn parse_error(&self) -> Option<ErrorGuaranteed> {
        match &self.kind {
            ModuleKind::User(parsed) | ModuleKind::Data(parsed) => parsed.parse_error,
            _ => None,
        }
    }

    pub fn exports(&self) -> Option<Value> {
        self.exports.borrow().clone()
    }

    pub(crate) fn set_exports(&self, exports: Value) {
        *self.exports.borrow_mut() = Some(exports);
    }

    /// Flag the module as being evaluated. Returns `false` if it already
    /// was, which means it imports itself.
    pub(crate) fn begin_evaluation(&self) -> bool {
        !self.evaluating.replace(true)
    }

    pub(crate) fn end_evaluation(&self) {
        self.evaluating.set(false);
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ModuleKind::System(_) => "system",
            ModuleKind::User(_) => "user",
            ModuleKind::Data(_) => "data",
            ModuleKind::Asset { .. } => "asset",
        };
        f.debug_struct("Module")
            .field("kind", &kind)
            .field("file", &self.file)
            .field("dirty", &self.dirty.get())
            .finish_non_exhaustive()
    }
}

/// Cache key: the path and how it was read. One file loaded both as a
/// script and as a template has an entry for each.
type Key = (PathBuf, Option<SourceKind>);

/// Modules by resolved path.
#[derive(Default)]
pub struct ModuleCache {
    modules: RefCell<FxHashMap<Key, Rc<Module>>>,
    parses: Cell<usize>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A system module or asset registered under `path`.
    pub fn get(&self, path: &Path) -> Option<Rc<Module>> {
        self.lookup(path, None)
    }

    /// The module read from `path` as `source`.
    pub fn get_loaded(&self, path: &Path, source: SourceKind) -> Option<Rc<Module>> {
        self.lookup(path, Some(source))
    }

    fn lookup(&self, path: &Path, source: Option<SourceKind>) -> Option<Rc<Module>> {
        self.modules
            .borrow()
            .get(&(path.to_path_buf(), source))
            .cloned()
    }

    /// Add `module` under `path`, replacing the entry for the same path and
    /// [`Module::source`].
    pub fn insert(&self, path: PathBuf, module: Module) -> Rc<Module> {
        let module = Rc::new(module);
        self.modules
            .borrow_mut()
            .insert((path, module.source()), Rc::clone(&module));
        module
    }

    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }

    /// Files parsed so far, counting re-parses of dirty modules.
    pub fn parse_count(&self) -> usize {
        self.parses.get()
    }

    /// Make `import(name)` call `hook`.
    pub fn register_system(&self, name: &str, hook: ImportHook) {
        trace!(name, "register system module");
        self.insert(
            PathBuf::from(name),
            Module::new(ModuleKind::System(hook), shared_path(name), None),
        );
    }

    /// Record the dimensions of an image asset.
    pub fn add_asset(&self, path: &Path, width: u32, height: u32) -> Rc<Module> {
        let mtime = modified(path);
        self.insert(
            path.to_path_buf(),
            Module::new(ModuleKind::Asset { width, height }, shared_path(path), mtime),
        )
    }

    /// Get the module for `path`, reading and parsing it on a miss or when
    /// the cached entry is dirty.
    ///
    /// A file with syntax errors is still cached: its errors are reported
    /// here, once, and later loads return the failed module without
    /// parsing it again.
    pub fn load(
        &self,
        path: &Path,
        kind: SourceKind,
        symbols: &SymbolTable,
        handler: &Handler,
    ) -> Result<Rc<Module>, LoadError> {
        if let Some(module) = self.get_loaded(path, kind) {
            if !module.is_dirty() {
                trace!(path = %path.display(), "module cache hit");
                return Ok(module);
            }
            debug!(path = %path.display(), "reloading dirty module");
        }
        let source = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mtime = modified(path);
        let file = shared_path(path);
        let output = plet_parse::parse_source(&source, Rc::clone(&file), symbols, kind.mode());
        self.parses.set(self.parses.get() + 1);

        let mut parse_error = None;
        for diagnostic in output.diagnostics() {
            parse_error = handler.emit(&diagnostic).or(parse_error);
        }
        debug!(path = %path.display(), ?kind, errors = output.errors.len(), "parsed module");
        let parsed = Parsed {
            ast: output.ast,
            parse_error,
        };
        let module_kind = match kind {
            SourceKind::Data => ModuleKind::Data(parsed),
            SourceKind::Script | SourceKind::Template => ModuleKind::User(parsed),
        };
        let module = Module::new(module_kind, file, mtime).with_source(kind);
        Ok(self.insert(path.to_path_buf(), module))
    }

    /// Mark every file-backed module whose modification time changed as
    /// dirty. Returns how many were marked.
    pub fn invalidate_stale(&self) -> usize {
        let mut marked = 0;
        for ((path, _), module) in self.modules.borrow().iter() {
            if matches!(module.kind, ModuleKind::System(_)) || module.is_dirty() {
                continue;
            }
            if modified(path) != module.mtime {
                trace!(path = %path.display(), "module is stale");
                module.mark_dirty();
                marked += 1;
            }
        }
        marked
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests;
