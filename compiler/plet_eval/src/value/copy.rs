//! Deep copy of values between arenas.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{Closure, Object, Value};
use crate::Env;

/// Copies already made, keyed by source container address.
type Memo = FxHashMap<*const (), Value>;

impl Value {
    /// Return this value as owned by `env`'s arena.
    ///
    /// Scalars, natives and values already in that arena are returned as
    /// is. Anything else is deep-copied; shared sub-structure and cycles
    /// are preserved in the copy. A copied closure gets a new scope, a child
    /// of `env`, holding copies of its free variables.
    pub fn copy_into(&self, env: &Env) -> Value {
        match self.arena() {
            Some(arena) if arena != env.arena_id() => {
                let mut memo = Memo::default();
                copy(self, env, &mut memo)
            }
            _ => self.clone(),
        }
    }
}

fn copy(value: &Value, env: &Env, memo: &mut Memo) -> Value {
    if value.arena().is_none_or(|arena| arena == env.arena_id()) {
        return value.clone();
    }
    match value {
        Value::String(s) => env.string(s.as_bytes()),
        Value::Array(array) => {
            if let Some(done) = memo.get(&array.addr()) {
                return done.clone();
            }
            let copied = env.array(Vec::with_capacity(array.len()));
            memo.insert(array.addr(), copied.clone());
            if let Value::Array(target) = &copied {
                for item in array.to_vec() {
                    target.push(copy(&item, env, memo));
                }
            }
            copied
        }
        Value::Object(object) => {
            if let Some(done) = memo.get(&object.addr()) {
                return done.clone();
            }
            let copied = env.object(Object::with_capacity(object.len()));
            memo.insert(object.addr(), copied.clone());
            if let Value::Object(target) = &copied {
                for (key, item) in object.entries() {
                    let key = copy(&key, env, memo);
                    target.put(key, copy(&item, env, memo));
                }
            }
            copied
        }
        Value::Closure(closure) => {
            let addr = Rc::as_ptr(closure).cast::<()>();
            if let Some(done) = memo.get(&addr) {
                return done.clone();
            }
            let scope = env.child();
            let copied = Value::Closure(Rc::new(Closure {
                ast: Rc::clone(&closure.ast),
                params: closure.params,
                free_variables: closure.free_variables,
                body: closure.body,
                env: scope.clone(),
            }));
            memo.insert(addr, copied.clone());
            for &name in closure.free_variables() {
                if let Some(captured) = closure.env.get(name) {
                    scope.define(name, copy(&captured, env, memo));
                }
            }
            copied
        }
        _ => value.clone(),
    }
}
