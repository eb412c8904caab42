//! Runtime values.
//!
//! Scalars are stored inline. Strings, arrays, objects and closures live on
//! the heap and record the [`ArenaId`] of the arena they were allocated in;
//! arrays and objects have reference semantics and are mutable in place.
//!
//! Heap values are created through the [`Env`] that owns their arena
//! (`env.string(..)`, `env.array(..)`, `env.object(..)`), never directly.

mod copy;
mod display;
mod object;

use std::cell::{Ref, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use plet_ir::{Ast, NodeId, Symbol, SymbolRange};
use plet_stack::ensure_sufficient_stack;
use rustc_hash::{FxHashSet, FxHasher};

use crate::{ArenaId, Env};

pub use display::ValueDisplay;
pub use object::Object;

/// Containers nested deeper than this do not contribute to a hash.
const MAX_HASH_DEPTH: u32 = 4;

/// Container address pairs under structural comparison.
type Visiting = FxHashSet<(*const (), *const ())>;

/// Host function signature: positional arguments and the calling
/// environment.
pub type NativeFunction = dyn Fn(&[Value], &Env) -> Value;

/// A named host function.
#[derive(Clone)]
pub struct Native {
    name: Rc<str>,
    func: Rc<NativeFunction>,
}

impl Native {
    pub fn new(name: &str, func: impl Fn(&[Value], &Env) -> Value + 'static) -> Self {
        Native {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn call(&self, args: &[Value], env: &Env) -> Value {
        (self.func)(args, env)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.func).cast::<()>()
    }
}

/// Immutable byte string.
#[derive(Clone)]
pub struct Str {
    arena: ArenaId,
    bytes: Rc<[u8]>,
}

impl Str {
    pub(crate) fn new(arena: ArenaId, bytes: &[u8]) -> Self {
        Str {
            arena,
            bytes: Rc::from(bytes),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

struct ArrayData {
    arena: ArenaId,
    items: RefCell<Vec<Value>>,
}

/// Shared, mutable array. Indices are contiguous from 0.
#[derive(Clone)]
pub struct ArrayRef(Rc<ArrayData>);

impl ArrayRef {
    pub(crate) fn new(arena: ArenaId, items: Vec<Value>) -> Self {
        ArrayRef(Rc::new(ArrayData {
            arena,
            items: RefCell::new(items),
        }))
    }

    pub fn arena(&self) -> ArenaId {
        self.0.arena
    }

    pub fn len(&self) -> usize {
        self.0.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.items.borrow().get(index).cloned()
    }

    /// Replace the element at `index`. Returns `false` if out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.items.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn push(&self, value: Value) {
        self.0.items.borrow_mut().push(value);
    }

    pub fn pop(&self) -> Option<Value> {
        self.0.items.borrow_mut().pop()
    }

    pub fn unshift(&self, value: Value) {
        self.0.items.borrow_mut().insert(0, value);
    }

    pub fn shift(&self) -> Option<Value> {
        let mut items = self.0.items.borrow_mut();
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    }

    /// Remove the element at `index`, keeping the order of the rest.
    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut items = self.0.items.borrow_mut();
        (index < items.len()).then(|| items.remove(index))
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.borrow().clone()
    }

    pub fn items(&self) -> Ref<'_, Vec<Value>> {
        self.0.items.borrow()
    }

    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

struct ObjectData {
    arena: ArenaId,
    object: RefCell<Object>,
}

/// Shared, mutable, insertion-ordered object.
#[derive(Clone)]
pub struct ObjectRef(Rc<ObjectData>);

impl ObjectRef {
    pub(crate) fn new(arena: ArenaId, object: Object) -> Self {
        ObjectRef(Rc::new(ObjectData {
            arena,
            object: RefCell::new(object),
        }))
    }

    pub fn arena(&self) -> ArenaId {
        self.0.arena
    }

    pub fn len(&self) -> usize {
        self.0.object.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.object.borrow().is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0.object.borrow().get(key).cloned()
    }

    pub fn get_symbol(&self, key: Symbol) -> Option<Value> {
        self.get(&Value::Symbol(key))
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn put(&self, key: Value, value: Value) {
        self.0.object.borrow_mut().put(key, value);
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        self.0.object.borrow_mut().remove(key)
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0
            .object
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.object.borrow()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

/// A lambda together with the environment it was created in.
pub struct Closure {
    pub(crate) ast: Rc<Ast>,
    pub(crate) params: SymbolRange,
    pub(crate) free_variables: SymbolRange,
    pub(crate) body: NodeId,
    pub(crate) env: Env,
}

impl Closure {
    pub fn params(&self) -> &[Symbol] {
        self.ast.arena().symbols(self.params)
    }

    pub fn free_variables(&self) -> &[Symbol] {
        self.ast.arena().symbols(self.free_variables)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn arena(&self) -> ArenaId {
        self.env.arena_id()
    }
}

/// A runtime value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Symbol(Symbol),
    String(Str),
    Array(ArrayRef),
    Object(ObjectRef),
    /// Unix seconds.
    Time(i64),
    Native(Native),
    Closure(Rc<Closure>),
}

impl Value {
    /// Name of the value's type, as returned by `type()`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Symbol(_) => "symbol",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Time(_) => "time",
            Value::Native(_) | Value::Closure(_) => "function",
        }
    }

    /// Only `nil` and `false` are falsy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Owning arena of a heap value; `None` for scalars and natives.
    pub fn arena(&self) -> Option<ArenaId> {
        match self {
            Value::String(s) => Some(s.arena()),
            Value::Array(a) => Some(a.arena()),
            Value::Object(o) => Some(o.arena()),
            Value::Closure(c) => Some(c.arena()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Native(_) | Value::Closure(_))
    }

    /// Structural equality. Values of different variants are never equal,
    /// so `1 != 1.0`.
    pub fn equals(&self, other: &Value) -> bool {
        self.equals_in(other, &mut FxHashSet::default())
    }

    /// Container pairs already under comparison count as equal, so cyclic
    /// values compare without unbounded recursion.
    fn equals_in(&self, other: &Value, visiting: &mut Visiting) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) | (Value::Time(a), Value::Time(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "language equality is exact")]
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::String(a), Value::String(b)) => a.as_bytes() == b.as_bytes(),
            (Value::Array(a), Value::Array(b)) => {
                if a.ptr_eq(b) || !visiting.insert((a.addr(), b.addr())) {
                    return true;
                }
                let (a, b) = (a.items(), b.items());
                a.len() == b.len()
                    && ensure_sufficient_stack(|| {
                        a.iter().zip(b.iter()).all(|(x, y)| x.equals_in(y, visiting))
                    })
            }
            (Value::Object(a), Value::Object(b)) => {
                if a.ptr_eq(b) || !visiting.insert((a.addr(), b.addr())) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && ensure_sufficient_stack(|| {
                        a.iter().all(|(key, value)| {
                            b.get(key)
                                .is_some_and(|other| value.equals_in(other, visiting))
                        })
                    })
            }
            (Value::Native(a), Value::Native(b)) => std::ptr::eq(a.addr(), b.addr()),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Hash consistent with [`Value::equals`].
    pub fn hash_value(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash_into(&mut hasher, 0);
        hasher.finish()
    }

    fn hash_into<H: Hasher>(&self, state: &mut H, depth: u32) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) | Value::Time(i) => i.hash(state),
            Value::Float(f) => {
                // 0.0 == -0.0
                let f = if *f == 0.0 { 0.0 } else { *f };
                f.to_bits().hash(state);
            }
            Value::Symbol(s) => s.hash(state),
            Value::String(s) => s.as_bytes().hash(state),
            Value::Array(a) => {
                let items = a.items();
                items.len().hash(state);
                if depth < MAX_HASH_DEPTH {
                    for item in items.iter() {
                        item.hash_into(state, depth + 1);
                    }
                }
            }
            Value::Object(o) => {
                let object = o.borrow();
                object.len().hash(state);
                if depth < MAX_HASH_DEPTH {
                    // Order-insensitive, like equality.
                    let mut sum = 0u64;
                    for (key, value) in object.iter() {
                        let mut entry = FxHasher::default();
                        key.hash_into(&mut entry, depth + 1);
                        value.hash_into(&mut entry, depth + 1);
                        sum = sum.wrapping_add(entry.finish());
                    }
                    sum.hash(state);
                }
            }
            Value::Native(n) => std::ptr::hash(n.addr(), state),
            Value::Closure(c) => std::ptr::hash(Rc::as_ptr(c), state),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Symbol(s) => write!(f, "{s:?}"),
            Value::String(s) => write!(f, "String({:?})", String::from_utf8_lossy(s.as_bytes())),
            Value::Array(a) => f.debug_list().entries(a.items().iter()).finish(),
            Value::Object(o) => f.debug_map().entries(o.borrow().iter()).finish(),
            Value::Time(t) => write!(f, "Time({t})"),
            Value::Native(n) => write!(f, "Native({})", n.name()),
            Value::Closure(c) => write!(f, "Closure({:?})", c.params()),
        }
    }
}

#[cfg(test)]
mod tests;
