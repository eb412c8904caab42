use super::*;
use crate::Interpreter;
use plet_diagnostic::Collector;
use pretty_assertions::assert_eq;

fn root() -> Env {
    Interpreter::builder()
        .reporter(Collector::new())
        .build()
        .root_env()
        .clone()
}

fn text(env: &Env, value: &Value) -> String {
    value.display(env.symbols()).to_string()
}

#[test]
fn test_truthiness() {
    let env = root();
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    for value in [
        Value::Bool(true),
        Value::Int(0),
        Value::Float(0.0),
        env.string(""),
        env.array(Vec::new()),
        env.object(Object::new()),
    ] {
        assert!(value.is_truthy(), "{value:?}");
    }
}

#[test]
fn test_cross_variant_values_differ() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Int(0), Value::Bool(false));
    assert_ne!(Value::Nil, Value::Bool(false));
    assert_ne!(Value::Int(5), Value::Time(5));
}

#[test]
fn test_structural_equality() {
    let env = root();
    assert_eq!(env.string("ab"), env.string("ab"));
    let a = env.array(vec![Value::Int(1), env.string("x")]);
    let b = env.array(vec![Value::Int(1), env.string("x")]);
    assert_eq!(a, b);
    assert_eq!(a.hash_value(), b.hash_value());

    let k1 = Value::Symbol(env.intern("k1"));
    let k2 = Value::Symbol(env.intern("k2"));
    let x: Object = [(k1.clone(), Value::Int(1)), (k2.clone(), Value::Int(2))]
        .into_iter()
        .collect();
    let y: Object = [(k2, Value::Int(2)), (k1, Value::Int(1))].into_iter().collect();
    let (x, y) = (env.object(x), env.object(y));
    assert_eq!(x, y);
    assert_eq!(x.hash_value(), y.hash_value());
}

#[test]
fn test_zero_floats_hash_alike() {
    assert_eq!(Value::Float(0.0), Value::Float(-0.0));
    assert_eq!(Value::Float(0.0).hash_value(), Value::Float(-0.0).hash_value());
}

#[test]
fn test_object_duplicate_keys_keep_position() {
    let env = root();
    let a = Value::Symbol(env.intern("a"));
    let b = Value::Symbol(env.intern("b"));
    let mut object = Object::new();
    object.put(a.clone(), Value::Int(1));
    object.put(b.clone(), Value::Int(2));
    object.put(a.clone(), Value::Int(3));
    assert_eq!(object.len(), 2);
    assert_eq!(object.keys().cloned().collect::<Vec<_>>(), vec![a.clone(), b]);
    assert_eq!(object.get(&a), Some(&Value::Int(3)));
}

#[test]
fn test_object_remove_preserves_order() {
    let env = root();
    let keys: Vec<Value> = ["a", "b", "c"].iter().map(|k| env.string(k)).collect();
    let mut object: Object = keys.iter().cloned().zip((1..).map(Value::Int)).collect();
    assert_eq!(object.remove(&keys[0]), Some(Value::Int(1)));
    assert_eq!(object.keys().cloned().collect::<Vec<_>>(), keys[1..].to_vec());
    assert_eq!(object.get(&keys[2]), Some(&Value::Int(3)));
    assert_eq!(object.remove(&keys[0]), None);
}

#[test]
fn test_any_value_is_a_key() {
    let env = root();
    let key = env.array(vec![Value::Int(1), Value::Int(2)]);
    let mut object = Object::new();
    object.put(key, Value::Bool(true));
    let probe = env.array(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(object.get(&probe), Some(&Value::Bool(true)));
}

#[test]
fn test_array_operations() {
    let env = root();
    let Value::Array(array) = env.array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]) else {
        unreachable!()
    };
    array.push(Value::Int(4));
    array.unshift(Value::Int(0));
    assert_eq!(array.len(), 5);
    assert_eq!(array.remove(2), Some(Value::Int(2)));
    assert_eq!(array.to_vec(), vec![Value::Int(0), Value::Int(1), Value::Int(3), Value::Int(4)]);
    assert_eq!(array.shift(), Some(Value::Int(0)));
    assert_eq!(array.pop(), Some(Value::Int(4)));
    assert!(!array.set(5, Value::Nil));
    assert!(array.set(0, Value::Nil));
    assert_eq!(array.remove(9), None);
}

#[test]
fn test_display() {
    let env = root();
    let key = Value::Symbol(env.intern("k"));
    let object: Object = [(key, env.array(vec![Value::Int(1), Value::Float(2.5)]))]
        .into_iter()
        .collect();
    assert_eq!(text(&env, &env.object(object)), "{k: [1, 2.5]}");
    assert_eq!(text(&env, &Value::Nil), "");
    assert_eq!(text(&env, &Value::Bool(false)), "false");
    assert_eq!(text(&env, &Value::Time(1_700_000_000)), "1700000000");
    let native = Value::Native(Native::new("f", |_, _| Value::Nil));
    assert_eq!(text(&env, &native), "<function>");
    assert_eq!(native.type_name(), "function");
}

#[test]
fn test_display_cycle() {
    let env = root();
    let value = env.array(vec![Value::Int(1)]);
    if let Value::Array(array) = &value {
        array.push(value.clone());
    }
    assert_eq!(text(&env, &value), "[1, [...]]");
}

#[test]
fn test_cyclic_equality_terminates() {
    let env = root();
    let cyclic = |head: i64| {
        let value = env.array(vec![Value::Int(head)]);
        if let Value::Array(array) = &value {
            array.push(value.clone());
        }
        value
    };
    let (a, b, c) = (cyclic(1), cyclic(1), cyclic(2));
    assert!(a.equals(&b));
    assert!(!a.equals(&c));

    // An object that contains itself next to one that nests a copy.
    let x = env.object(Object::new());
    let y = env.object(Object::new());
    let key = Value::Symbol(env.intern("next"));
    if let (Value::Object(xo), Value::Object(yo)) = (&x, &y) {
        xo.put(key.clone(), x.clone());
        yo.put(key, x.clone());
    }
    assert!(x.equals(&y));
}

#[test]
fn test_copy_same_arena_is_identity() {
    let env = root();
    let value = env.array(vec![Value::Int(1)]);
    let copied = value.copy_into(&env.child());
    let (Value::Array(a), Value::Array(b)) = (&value, &copied) else {
        unreachable!()
    };
    assert!(a.ptr_eq(b));
}

#[test]
fn test_copy_is_deep_and_cycle_safe() {
    let source = root();
    let target = Env::new_arena_child(&source);
    let shared = source.string("s");
    let value = source.array(vec![shared.clone(), shared]);
    let Value::Array(array) = &value else { unreachable!() };
    array.push(value.clone());

    let copied = value.copy_into(&target);
    assert_eq!(copied.arena(), Some(target.arena_id()));
    let Value::Array(copy) = &copied else { unreachable!() };
    assert!(!copy.ptr_eq(array));
    let Some(Value::Array(inner)) = copy.get(2) else { unreachable!() };
    assert!(inner.ptr_eq(copy));
    assert_eq!(copy.get(0).and_then(|v| v.arena()), Some(target.arena_id()));

    // Mutating the copy leaves the original alone.
    copy.push(Value::Nil);
    assert_eq!(array.len(), 3);
}

#[test]
fn test_define_copies_foreign_values() {
    let source = root();
    let target = Env::new_arena_child(&source);
    let name = target.intern("x");
    target.define(name, source.string("hello"));
    let stored = target.get(name);
    assert_eq!(stored.as_ref().and_then(Value::arena), Some(target.arena_id()));
    assert_eq!(stored.as_ref().and_then(Value::as_bytes), Some(&b"hello"[..]));
}
