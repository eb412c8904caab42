//! Lexically scoped environments.
//!
//! An [`Env`] is a cheap handle (`Rc`) to one scope. Scopes form a parent
//! chain; a child either shares its parent's arena (function calls) or
//! starts a new one (imported modules, templates).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use plet_diagnostic::{Diagnostic, ErrorGuaranteed, Level};
use plet_ir::{Ast, NodeId, NodeKind, Span, Symbol, SymbolTable};
use rustc_hash::FxHashMap;

use crate::value::{ArrayRef, Native, Object, ObjectRef, Str};
use crate::{exec, Arena, ArenaId, Context, Value};

/// Which part of the calling node a native's diagnostic points at.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ArgIndex {
    /// The whole call expression.
    All,
    /// No position; only the file is reported.
    None,
    /// The `n`th argument, falling back to the whole call.
    Arg(usize),
}

/// The call expression a native is running for.
#[derive(Clone)]
pub(crate) struct CallSite {
    pub(crate) ast: Rc<Ast>,
    pub(crate) node: NodeId,
}

impl CallSite {
    fn span(&self, index: ArgIndex) -> Option<Span> {
        let arena = self.ast.arena();
        let whole = arena.span(self.node);
        match index {
            ArgIndex::None => None,
            ArgIndex::All => Some(whole),
            ArgIndex::Arg(i) => match arena.kind(self.node) {
                NodeKind::Call { args, .. } => Some(
                    arena
                        .list(*args)
                        .get(i)
                        .map_or(whole, |&arg| arena.span(arg)),
                ),
                _ => Some(whole),
            },
        }
    }
}

struct EnvData {
    arena: Rc<Arena>,
    context: Rc<Context>,
    parent: Option<Env>,
    bindings: RefCell<FxHashMap<Symbol, Value>>,
    calling_node: RefCell<Option<CallSite>>,
    last_error: Cell<Option<ErrorGuaranteed>>,
    exports: RefCell<Vec<Symbol>>,
    /// Iterations run by every `for` loop in this arena.
    loops: Rc<Cell<u64>>,
}

/// Handle to a scope.
#[derive(Clone)]
pub struct Env(Rc<EnvData>);

impl Env {
    /// A parentless environment with a new arena.
    pub fn root(context: Rc<Context>) -> Env {
        Env(Rc::new(EnvData {
            arena: Rc::new(Arena::new()),
            context,
            parent: None,
            bindings: RefCell::default(),
            calling_node: RefCell::new(None),
            last_error: Cell::new(None),
            exports: RefCell::default(),
            loops: Rc::new(Cell::new(0)),
        }))
    }

    /// A child of `parent` that allocates from a new arena.
    pub fn new_arena_child(parent: &Env) -> Env {
        Env(Rc::new(EnvData {
            arena: Rc::new(Arena::new()),
            context: Rc::clone(&parent.0.context),
            parent: Some(parent.clone()),
            bindings: RefCell::default(),
            calling_node: RefCell::new(None),
            last_error: Cell::new(None),
            exports: RefCell::default(),
            loops: Rc::new(Cell::new(0)),
        }))
    }

    /// A child scope in the same arena.
    pub fn child(&self) -> Env {
        Env(Rc::new(EnvData {
            arena: Rc::clone(&self.0.arena),
            context: Rc::clone(&self.0.context),
            parent: Some(self.clone()),
            bindings: RefCell::default(),
            calling_node: RefCell::new(None),
            last_error: Cell::new(None),
            exports: RefCell::default(),
            loops: Rc::clone(&self.0.loops),
        }))
    }

    #[inline]
    pub fn context(&self) -> &Rc<Context> {
        &self.0.context
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        self.0.context.symbols()
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.0.arena
    }

    #[inline]
    pub fn arena_id(&self) -> ArenaId {
        self.0.arena.id()
    }

    pub fn parent(&self) -> Option<&Env> {
        self.0.parent.as_ref()
    }

    /// The outermost environment of the chain.
    pub fn root_env(&self) -> Env {
        let mut env = self;
        while let Some(parent) = env.parent() {
            env = parent;
        }
        env.clone()
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.symbols().intern(name)
    }

    /// Bind `name` in this scope. A heap value from another arena is copied
    /// into this one first.
    pub fn define(&self, name: Symbol, value: Value) {
        let value = match value.arena() {
            Some(arena) if arena != self.arena_id() => value.copy_into(self),
            _ => value,
        };
        self.0.bindings.borrow_mut().insert(name, value);
    }

    pub fn define_str(&self, name: &str, value: Value) {
        self.define(self.intern(name), value);
    }

    /// Register a host function. A later definition of the same name wins.
    pub fn define_native(&self, name: &str, func: impl Fn(&[Value], &Env) -> Value + 'static) {
        self.define_str(name, Value::Native(Native::new(name, func)));
    }

    /// Look `name` up through the parent chain. `None` means unbound, which
    /// is distinct from a binding to `nil`.
    pub fn get(&self, name: Symbol) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.0.bindings.borrow().get(&name) {
                return Some(value.clone());
            }
            env = env.parent()?;
        }
    }

    pub fn get_str(&self, name: &str) -> Option<Value> {
        self.get(self.symbols().get(name)?)
    }

    /// Whether `name` is bound in this scope itself.
    pub fn has_own(&self, name: Symbol) -> bool {
        self.0.bindings.borrow().contains_key(&name)
    }

    /// Mark `name` for export from the module evaluated in this scope.
    pub fn export(&self, name: Symbol) {
        let mut exports = self.0.exports.borrow_mut();
        if !exports.contains(&name) {
            exports.push(name);
        }
    }

    /// Exported names in declaration order.
    pub fn exports(&self) -> Vec<Symbol> {
        self.0.exports.borrow().clone()
    }

    /// Report an error for the running native and set the last-error slot.
    ///
    /// Returns `nil` so that a native can `return env.error(..)`.
    pub fn error(&self, at: ArgIndex, message: impl Into<String>) -> Value {
        self.raise(at, message);
        Value::Nil
    }

    /// Like [`Env::error`], returning the guarantee.
    pub(crate) fn raise(&self, at: ArgIndex, message: impl Into<String>) -> ErrorGuaranteed {
        let diagnostic = self.locate(at, Diagnostic::error(message));
        let guarantee = self.0.context.handler().emit_error(diagnostic);
        self.record_error(guarantee);
        guarantee
    }

    pub fn warn(&self, at: ArgIndex, message: impl Into<String>) {
        self.0
            .context
            .handler()
            .emit(&self.locate(at, Diagnostic::new(Level::Warning, message)));
    }

    pub fn info(&self, at: ArgIndex, message: impl Into<String>) {
        self.0
            .context
            .handler()
            .emit(&self.locate(at, Diagnostic::new(Level::Info, message)));
    }

    fn locate(&self, at: ArgIndex, diagnostic: Diagnostic) -> Diagnostic {
        let site = self.0.calling_node.borrow();
        let Some(site) = site.as_ref() else {
            return match self.file() {
                Some(file) => diagnostic.with_path(&file),
                None => diagnostic,
            };
        };
        let diagnostic = diagnostic.with_file(Rc::clone(site.ast.file()));
        match site.span(at) {
            Some(span) => diagnostic.with_span(span),
            None => diagnostic,
        }
    }

    /// Value of the `FILE` binding as a path, if it is a string.
    fn file(&self) -> Option<PathBuf> {
        match self.get(Symbol::FILE)? {
            Value::String(s) => Some(PathBuf::from(s.to_string_lossy())),
            _ => None,
        }
    }

    /// Whether an error has been raised in this scope since the last call
    /// to [`Env::take_error`].
    pub fn has_error(&self) -> bool {
        self.0.last_error.get().is_some()
    }

    /// Forget the pending error so the running native can recover from a
    /// failed [`Env::apply`] and return normally. The diagnostic stays
    /// reported.
    pub fn clear_error(&self) {
        self.0.last_error.set(None);
    }

    /// Fail the running native with an error reported elsewhere.
    pub(crate) fn record_error(&self, guarantee: ErrorGuaranteed) {
        self.0.last_error.set(Some(guarantee));
    }

    pub(crate) fn take_error(&self) -> Option<ErrorGuaranteed> {
        self.0.last_error.take()
    }

    pub(crate) fn replace_calling_node(&self, site: Option<CallSite>) -> Option<CallSite> {
        self.0.calling_node.replace(site)
    }

    /// Count one loop iteration. Returns the ceiling when it is exceeded.
    pub(crate) fn tick_loop(&self) -> Result<(), u64> {
        let count = self.0.loops.get() + 1;
        self.0.loops.set(count);
        let limit = self.0.context.max_loop_iterations();
        if limit != 0 && count > limit {
            Err(limit)
        } else {
            Ok(())
        }
    }

    /// Call a closure or native from host code.
    pub fn apply(&self, callee: &Value, args: &[Value]) -> Result<Value, ErrorGuaranteed> {
        exec::apply(self, callee, args)
    }

    /// Copy `value` into this environment's arena.
    pub fn copy_value(&self, value: &Value) -> Value {
        value.copy_into(self)
    }

    pub fn string(&self, bytes: impl AsRef<[u8]>) -> Value {
        Value::String(Str::new(self.arena().record_allocation(), bytes.as_ref()))
    }

    pub fn array(&self, items: Vec<Value>) -> Value {
        Value::Array(ArrayRef::new(self.arena().record_allocation(), items))
    }

    pub fn object(&self, object: Object) -> Value {
        Value::Object(ObjectRef::new(self.arena().record_allocation(), object))
    }

    /// Drop every binding of this scope.
    ///
    /// Closures hold their defining environment, so a scope that binds a
    /// closure is part of a reference cycle until it is cleared.
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut *self.0.bindings.borrow_mut());
        drop(bindings);
        self.0.exports.borrow_mut().clear();
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("arena", &self.arena_id())
            .field("bindings", &self.0.bindings.borrow().len())
            .field("has_parent", &self.0.parent.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
