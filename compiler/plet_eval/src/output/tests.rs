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

#[test]
fn test_single_value_passes_through() {
    let env = root();
    let array = env.array(vec![Value::Int(1)]);
    let mut output = Output::default();
    output.push(Value::Nil, env.symbols());
    output.push(array.clone(), env.symbols());
    output.push(Value::Nil, env.symbols());
    let Output::Single(Value::Array(kept)) = output else {
        panic!("expected a single array")
    };
    let Value::Array(original) = &array else { unreachable!() };
    assert!(kept.ptr_eq(original));
}

#[test]
fn test_two_values_concatenate() {
    let env = root();
    let mut output = Output::default();
    output.push_text(b"n=", &env);
    output.push(Value::Int(4), env.symbols());
    output.push_text(b"!", &env);
    assert_eq!(output.finish(&env).as_bytes(), Some(&b"n=4!"[..]));
}

#[test]
fn test_empty_output() {
    let env = root();
    assert!(Output::default().finish(&env).is_nil());
    assert_eq!(Output::default().finish_string(&env).as_bytes(), Some(&b""[..]));
    let mut output = Output::default();
    output.push(Value::Int(7), env.symbols());
    assert_eq!(output.finish_string(&env).as_bytes(), Some(&b"7"[..]));
}
