//! The natives every root environment starts with, and argument checking
//! helpers for natives.

use crate::import::import;
use crate::{ArgIndex, Env, Value};

/// Expected type of a native argument.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ArgType {
    Any,
    Bool,
    Int,
    Float,
    /// Int or float.
    Number,
    Symbol,
    String,
    Array,
    Object,
    Time,
    Function,
}

impl ArgType {
    pub fn name(self) -> &'static str {
        match self {
            ArgType::Any => "any",
            ArgType::Bool => "bool",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Number => "number",
            ArgType::Symbol => "symbol",
            ArgType::String => "string",
            ArgType::Array => "array",
            ArgType::Object => "object",
            ArgType::Time => "time",
            ArgType::Function => "function",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            ArgType::Any => true,
            ArgType::Bool => matches!(value, Value::Bool(_)),
            ArgType::Int => matches!(value, Value::Int(_)),
            ArgType::Float => matches!(value, Value::Float(_)),
            ArgType::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            ArgType::Symbol => matches!(value, Value::Symbol(_)),
            ArgType::String => matches!(value, Value::String(_)),
            ArgType::Array => matches!(value, Value::Array(_)),
            ArgType::Object => matches!(value, Value::Object(_)),
            ArgType::Time => matches!(value, Value::Time(_)),
            ArgType::Function => value.is_callable(),
        }
    }
}

/// Check that `args` matches `expected` exactly, reporting the first
/// mismatch through `env`. Returns `false` if an error was reported.
pub fn check_args(env: &Env, name: &str, args: &[Value], expected: &[ArgType]) -> bool {
    check_args_between(env, name, args, expected.len(), expected)
}

/// Like [`check_args`], but only the first `min` arguments are required.
pub fn check_args_between(
    env: &Env,
    name: &str,
    args: &[Value],
    min: usize,
    expected: &[ArgType],
) -> bool {
    if args.len() < min {
        env.error(
            ArgIndex::All,
            format!("{name}: too few arguments for function, {min} expected"),
        );
        return false;
    }
    if args.len() > expected.len() {
        env.error(
            ArgIndex::Arg(expected.len()),
            format!(
                "{name}: too many arguments for function, {} expected",
                expected.len()
            ),
        );
        return false;
    }
    for (i, (arg, ty)) in args.iter().zip(expected).enumerate() {
        if !ty.matches(arg) {
            env.error(
                ArgIndex::Arg(i),
                format!(
                    "{name}: unexpected argument of type {}, {} expected",
                    arg.type_name(),
                    ty.name()
                ),
            );
            return false;
        }
    }
    true
}

/// Register `import`, `error`, `warning`, `info` and `type` in `env`.
pub fn register_prelude(env: &Env) {
    env.define_native("import", |args, env| {
        if !check_args(env, "import", args, &[ArgType::String]) {
            return Value::Nil;
        }
        let Value::String(name) = &args[0] else {
            return Value::Nil;
        };
        import(env, &name.to_string_lossy())
    });
    env.define_native("error", |args, env| {
        if check_args(env, "error", args, &[ArgType::String]) {
            env.error(ArgIndex::All, message(args, env));
        }
        Value::Nil
    });
    env.define_native("warning", |args, env| {
        if check_args(env, "warning", args, &[ArgType::String]) {
            env.warn(ArgIndex::All, message(args, env));
        }
        Value::Nil
    });
    env.define_native("info", |args, env| {
        if check_args(env, "info", args, &[ArgType::String]) {
            env.info(ArgIndex::All, message(args, env));
        }
        Value::Nil
    });
    env.define_native("type", |args, env| {
        if !check_args(env, "type", args, &[ArgType::Any]) {
            return Value::Nil;
        }
        Value::Symbol(env.intern(args[0].type_name()))
    });
}

fn message(args: &[Value], env: &Env) -> String {
    args[0].display(env.symbols()).to_string()
}
