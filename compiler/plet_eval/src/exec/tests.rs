use std::cell::Cell;
use std::path::Path;

use crate::{Interpreter, Mode, Value};
use plet_diagnostic::Collector;
use pretty_assertions::assert_eq;

struct Run {
    output: Result<String, ()>,
    errors: Vec<String>,
}

fn eval_in(mode: Mode, source: &str, interpreter: &Interpreter, collector: &Collector) -> Run {
    let module = interpreter.parse(source.as_bytes(), Path::new("test.tss"), mode);
    assert!(module.parse_error().is_none(), "{:?}", collector.errors());
    let env = interpreter.root_env();
    let output = interpreter
        .eval_module(&module, env)
        .map(|value| value.display(env.symbols()).to_string())
        .map_err(|_| ());
    Run {
        output,
        errors: collector.errors(),
    }
}

fn run_mode(mode: Mode, source: &str) -> Run {
    let collector = Collector::new();
    let interpreter = Interpreter::builder().reporter(collector.clone()).build();
    eval_in(mode, source, &interpreter, &collector)
}

fn script(source: &str) -> String {
    let run = run_mode(Mode::Script, source);
    assert_eq!(run.errors, Vec::<String>::new());
    run.output.unwrap_or_default()
}

fn template(source: &str) -> String {
    let run = run_mode(Mode::Template, source);
    assert_eq!(run.errors, Vec::<String>::new());
    run.output.unwrap_or_default()
}

fn script_error(source: &str) -> String {
    let run = run_mode(Mode::Script, source);
    assert!(run.output.is_err(), "expected failure, got {:?}", run.output);
    assert_eq!(run.errors.len(), 1, "{:?}", run.errors);
    run.errors[0].clone()
}

// Output

#[test]
fn test_template_output() {
    assert_eq!(template("Hello, {'world'}!"), "Hello, world!");
    assert_eq!(template("{if 1==1 then}yes{else}no{end}"), "yes");
    assert_eq!(template("{if 1==2 then}yes{else}no{end}"), "no");
}

#[test]
fn test_single_value_is_not_stringified() {
    let collector = Collector::new();
    let interpreter = Interpreter::builder().reporter(collector.clone()).build();
    let module = interpreter.parse(b"{[1, 2]}", Path::new("t.html"), Mode::Template);
    let value = interpreter.eval_module(&module, interpreter.root_env());
    assert!(matches!(value, Ok(Value::Array(ref a)) if a.len() == 2));
}

#[test]
fn test_nil_produces_no_output() {
    assert_eq!(template("a{nil}b{x = 1}c"), "abc");
}

#[test]
fn test_interpolation_always_yields_string() {
    assert_eq!(script(r#"x = 3
"{x}" + "!""#), "3!");
    assert_eq!(script(r#"type("{1}")"#), "string");
}

// Operators

#[test]
fn test_arithmetic() {
    assert_eq!(script("1 + 2 * 3"), "7");
    assert_eq!(script("7 / 2"), "3");
    assert_eq!(script("7 % 3"), "1");
    assert_eq!(script("1.5 + 1"), "2.5");
    assert_eq!(script("-(2 - 5)"), "3");
    assert_eq!(script("'ab' + 'cd'"), "abcd");
    assert_eq!(script("[1] + [2, 3]"), "[1, 2, 3]");
}

#[test]
fn test_comparison_and_equality() {
    assert_eq!(script("1 < 2 and 'a' < 'b'"), "true");
    assert_eq!(script("2 >= 2.5"), "false");
    assert_eq!(script("1 == 1.0"), "false");
    assert_eq!(script("[1, {a: 2}] == [1, {a: 2}]"), "true");
    assert_eq!(script("{a: 1, b: 2} == {b: 2, a: 1}"), "true");
}

#[test]
fn test_cyclic_values_compare() {
    assert_eq!(script("a = [0]\na[0] = a\nb = [0]\nb[0] = b\na == b"), "true");
    assert_eq!(script("a = [1, 0]\na[1] = a\nb = [2, 0]\nb[1] = b\na == b"), "false");
    assert_eq!(script("a = {}\na.self = a\nb = {}\nb.self = b\na == b"), "true");
}

#[test]
fn test_logic_returns_deciding_operand() {
    assert_eq!(script("nil or 'x'"), "x");
    assert_eq!(script("0 and 5"), "5");
    assert_eq!(script("false and undefined_name"), "false");
    assert_eq!(script("'a' or undefined_name"), "a");
    assert_eq!(script("not nil"), "true");
    assert_eq!(script("not 0"), "false");
}

#[test]
fn test_conditional_expression() {
    assert_eq!(script("x = 2\nx > 1 ? 'big' : 'small'"), "big");
}

#[test]
fn test_division_by_zero() {
    assert_eq!(script_error("1 / 0"), "division by zero");
    assert_eq!(script_error("1.0 % 0"), "modulo by zero");
}

#[test]
fn test_integer_overflow() {
    assert_eq!(
        script_error("9223372036854775807 + 1"),
        "integer overflow in addition"
    );
}

#[test]
fn test_operand_type_error() {
    assert_eq!(
        script_error("1 + 'a'"),
        "unsupported operand types for '+': int and string"
    );
}

// Names and assignment

#[test]
fn test_undefined_variable() {
    assert_eq!(script_error("y"), "undefined variable 'y'");
}

#[test]
fn test_compound_assignment_reads_through_chain() {
    assert_eq!(script("n = 1\nf = () => do n += 1\nn end\nf()"), "2");
    // The outer binding is untouched.
    assert_eq!(script("n = 1\nf = () => do n += 1 end\nf()\nn"), "1");
}

#[test]
fn test_field_and_index_assignment_mutate_in_place() {
    assert_eq!(
        script("o = {a: 1}\nalias = o\nalias.a += 2\nalias.b = 5\no"),
        "{a: 3, b: 5}"
    );
    assert_eq!(script("xs = [1, 2]\nxs[1] = 9\nxs"), "[1, 9]");
    assert_eq!(script("o = {}\no['k'] = 1\no.k"), "");
    assert_eq!(script("o = {}\no['k'] = 1\no['k']"), "1");
}

#[test]
fn test_index_errors() {
    assert_eq!(
        script_error("xs = [1]\nxs[3] = 0"),
        "array index 3 out of bounds for length 1"
    );
    assert_eq!(
        script_error("[1][-1]"),
        "array index -1 out of bounds for length 1"
    );
    assert_eq!(
        script_error("[1]['a']"),
        "array index must be an int, not string"
    );
    assert_eq!(
        script_error("n = 5\nn.x"),
        "cannot access field 'x' of a value of type int"
    );
}

#[test]
fn test_missing_key_is_nil() {
    assert_eq!(script("o = {a: 1}\ntype(o.b)"), "nil");
    assert_eq!(script("o = {a: 1}\ntype(o['b'])"), "nil");
}

#[test]
fn test_object_literal_duplicate_keys() {
    assert_eq!(script("{a: 1, b: 2, a: 3}"), "{a: 3, b: 2}");
}

// Functions

#[test]
fn test_closures() {
    assert_eq!(script("add = (a, b) => a + b\nadd(2, 3)"), "5");
    assert_eq!(script("k = 10\nf = x => x + k\n5 | f"), "15");
    assert_eq!(script("f = () => do return 1\n2 end\nf()"), "1");
    assert_eq!(script("type(x => x)"), "function");
}

#[test]
fn test_recursion() {
    assert_eq!(
        script("fact = n => n <= 1 ? 1 : n * fact(n - 1)\nfact(10)"),
        "3628800"
    );
}

#[test]
fn test_arity_error() {
    assert_eq!(
        script_error("add = (a, b) => a + b\nadd(1)"),
        "add: expected 2 arguments, got 1"
    );
}

#[test]
fn test_not_callable() {
    assert_eq!(script_error("x = 1\nx()"), "value of type int is not a function");
}

#[test]
fn test_error_is_reported_once_at_innermost_node() {
    let run = run_mode(Mode::Script, "f = () => 1 / 0\ng = () => f()\ng()");
    assert!(run.output.is_err());
    assert_eq!(run.errors, vec!["division by zero".to_owned()]);
}

// Loops and switch

#[test]
fn test_for_over_array_and_object() {
    assert_eq!(template("{for x in [1, 2, 3] do}{x},{end}"), "1,2,3,");
    assert_eq!(template("{for i, x in ['a', 'b'] do}{i}{x}{end}"), "0a1b");
    assert_eq!(
        template("{for k, v in {b: 1, a: 2} do}{k}={v};{end}"),
        "b=1;a=2;"
    );
}

#[test]
fn test_break_keeps_partial_output() {
    assert_eq!(
        template("{for x in [1, 2, 3, 4] do}{if x == 3 then}{break}{end}{x}{end}"),
        "12"
    );
    assert_eq!(
        template("{for x in [1, 2, 3] do}{if x == 2 then}{continue}{end}{x}{end}"),
        "13"
    );
}

#[test]
fn test_loop_variable_is_shared() {
    assert_eq!(
        script("for x in [1, 2, 3] do y = x end\nx"),
        "3"
    );
}

#[test]
fn test_closures_in_loop_see_final_value() {
    assert_eq!(
        script(
            "fs = {}\nfor i, x in [1, 2, 3] do fs[i] = () => x end\n[fs[0](), fs[1](), fs[2]()]"
        ),
        "[3, 3, 3]"
    );
}

#[test]
fn test_for_over_non_iterable() {
    assert_eq!(
        script_error("for x in 5 do x end"),
        "cannot iterate over a value of type int"
    );
}

#[test]
fn test_loop_ceiling() {
    let collector = Collector::new();
    let interpreter = Interpreter::builder()
        .reporter(collector.clone())
        .max_loop_iterations(5)
        .build();
    let run = eval_in(
        Mode::Script,
        "for x in [1, 2, 3] do x end\nfor x in [1, 2, 3] do x end",
        &interpreter,
        &collector,
    );
    assert!(run.output.is_err());
    assert_eq!(
        run.errors,
        vec!["maximum number of loop iterations exceeded (5)".to_owned()]
    );
}

#[test]
fn test_unlimited_loops() {
    let collector = Collector::new();
    let interpreter = Interpreter::builder()
        .reporter(collector.clone())
        .max_loop_iterations(0)
        .build();
    let run = eval_in(
        Mode::Script,
        "n = 0\nxs = [1, 2, 3]\nfor a in xs do for b in xs do n += 1 end end\nn",
        &interpreter,
        &collector,
    );
    assert_eq!(run.output, Ok("9".to_owned()));
}

#[test]
fn test_switch() {
    let source = "{switch x}{case 1, 2}low{case 3}mid{default}high{end}";
    for (x, expected) in [(1, "low"), (2, "low"), (3, "mid"), (7, "high")] {
        assert_eq!(template(&format!("{{x = {x}}}{source}")), expected);
    }
}

#[test]
fn test_block_expressions_produce_values() {
    assert_eq!(script("x = if 1 < 2 then 'a' else 'b' end\nx"), "a");
    assert_eq!(script("y = do 1\n2 end\ny"), "12");
    assert_eq!(script("n = 0\nfor x in [1, 2] do n += x end\nn"), "3");
}

// Natives

#[test]
fn test_native_error_points_at_argument() {
    let collector = Collector::new();
    let interpreter = Interpreter::builder().reporter(collector.clone()).build();
    interpreter
        .root_env()
        .define_native("check", |args, env| {
            env.error(crate::ArgIndex::Arg(1), "bad argument");
            args.first().cloned().unwrap_or_default()
        });
    let run = eval_in(Mode::Script, "x = 1\ncheck(1, x + 1)", &interpreter, &collector);
    assert!(run.output.is_err());
    let diagnostic = &collector.diagnostics()[0];
    assert_eq!(diagnostic.message, "bad argument");
    assert_eq!((diagnostic.line(), diagnostic.column()), (Some(2), Some(10)));
}

#[test]
fn test_native_can_apply_closures() {
    let collector = Collector::new();
    let interpreter = Interpreter::builder().reporter(collector.clone()).build();
    let calls = std::rc::Rc::new(Cell::new(0));
    let counter = std::rc::Rc::clone(&calls);
    interpreter.root_env().define_native("map", move |args, env| {
        let (Some(Value::Array(items)), Some(f)) = (args.first(), args.get(1)) else {
            return Value::Nil;
        };
        let mut out = Vec::new();
        for item in items.to_vec() {
            counter.set(counter.get() + 1);
            match env.apply(f, &[item]) {
                Ok(value) => out.push(value),
                Err(_) => return Value::Nil,
            }
        }
        env.array(out)
    });
    let run = eval_in(
        Mode::Script,
        "[1, 2, 3] | map(x => x * 2)",
        &interpreter,
        &collector,
    );
    assert_eq!(run.output, Ok("[2, 4, 6]".to_owned()));
    assert_eq!(calls.get(), 3);

    // A failing closure fails the native's call, reported once.
    let run = eval_in(Mode::Script, "map([1], x => x / 0)", &interpreter, &collector);
    assert!(run.output.is_err());
    assert_eq!(run.errors, vec!["division by zero".to_owned()]);
}

#[test]
fn test_native_can_recover_from_failed_closure() {
    let collector = Collector::new();
    let interpreter = Interpreter::builder().reporter(collector.clone()).build();
    interpreter.root_env().define_native("try_call", |args, env| {
        let Some(f) = args.first() else {
            return Value::Nil;
        };
        match env.apply(f, &[]) {
            Ok(value) => value,
            Err(_) => {
                env.clear_error();
                env.string("fallback")
            }
        }
    });
    let run = eval_in(
        Mode::Script,
        "try_call(() => undefined_name)",
        &interpreter,
        &collector,
    );
    assert_eq!(run.output, Ok("fallback".to_owned()));
    assert_eq!(
        run.errors,
        vec!["undefined variable 'undefined_name'".to_owned()]
    );

    let run = eval_in(Mode::Script, "try_call(() => 7)", &interpreter, &collector);
    assert_eq!(run.output, Ok("7".to_owned()));
}
