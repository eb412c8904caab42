use super::*;
use crate::value::Object;
use plet_diagnostic::Collector;
use plet_ir::Symbol;
use pretty_assertions::assert_eq;

fn interpreter() -> (Interpreter, Collector) {
    let collector = Collector::new();
    let interpreter = Interpreter::builder().reporter(collector.clone()).build();
    (interpreter, collector)
}

fn render(interpreter: &Interpreter, env: &Env, source: &str) -> String {
    let module = Rc::new(interpreter.parse(source.as_bytes(), Path::new("page.html"), Mode::Template));
    match interpreter.eval_template(&module, env) {
        Ok(value) => value.display(interpreter.symbols()).to_string(),
        Err(_) => "<failed>".to_owned(),
    }
}

#[test]
fn test_template_env_binds_data_and_globals() {
    let (interpreter, collector) = interpreter();
    let root = interpreter.root_env();
    let title = root.intern("title");
    let site = root.intern("site");

    let globals: Object = [(Value::Symbol(site), root.string("Example"))]
        .into_iter()
        .collect();
    root.define(Symbol::GLOBAL, root.object(globals));

    let data: Object = [
        (Value::Symbol(title), root.string("Home")),
        (root.string("not a symbol"), Value::Int(1)),
    ]
    .into_iter()
    .collect();
    let env = interpreter.template_env(&root.object(data), root);

    assert!(env.parent().is_none());
    assert_ne!(env.arena_id(), root.arena_id());
    assert_eq!(
        render(&interpreter, &env, "{title} - {site} - {GLOBAL.site}"),
        "Home - Example - Example"
    );
    // The prelude is available in the new root.
    assert_eq!(render(&interpreter, &env, "{type(title)}"), "string");
    assert!(collector.errors().is_empty());
    assert_eq!(
        env.get(title).and_then(|v| v.arena()),
        Some(env.arena_id())
    );
}

#[test]
fn test_prelude_hooks_run_in_order() {
    let collector = Collector::new();
    let interpreter = Interpreter::builder()
        .reporter(collector.clone())
        .prelude(|env| env.define_native("type", |_, env| env.string("overridden")))
        .prelude(|env| env.define_str("answer", Value::Int(42)))
        .build();
    let root = interpreter.root_env();
    assert_eq!(render(&interpreter, root, "{type(1)} {answer}"), "overridden 42");

    let page = interpreter.template_env(&Value::Nil, root);
    assert_eq!(page.get_str("answer"), Some(Value::Int(42)));
}

#[test]
fn test_system_module() {
    let (interpreter, collector) = interpreter();
    interpreter.register_system("site", |env| {
        let mut object = Object::new();
        object.put(Value::Symbol(env.intern("name")), env.string("plet"));
        env.object(object)
    });
    let root = interpreter.root_env();
    assert_eq!(render(&interpreter, root, "{s = import('site')}{s.name}"), "plet");
    assert!(collector.errors().is_empty());
}

#[test]
fn test_assets() {
    let (interpreter, _) = interpreter();
    interpreter.add_asset(Path::new("img/a.png"), 10, 20);
    assert_eq!(interpreter.asset_size(Path::new("img/a.png")), Some((10, 20)));
    assert_eq!(interpreter.asset_size(Path::new("img/b.png")), None);
}

#[test]
fn test_parse_reports_syntax_errors() {
    let (interpreter, collector) = interpreter();
    let module = interpreter.parse(b"{if 1==1}yes{end}", Path::new("t.html"), Mode::Template);
    assert!(module.parse_error().is_some());
    assert_eq!(
        collector.errors(),
        vec!["syntax error: expected 'then' in 'if', found text".to_owned()]
    );
    assert!(interpreter.eval_module(&module, interpreter.root_env()).is_err());
}

#[test]
fn test_eval_module_binds_location() {
    let (interpreter, _) = interpreter();
    let module = interpreter.parse(b"[FILE, DIR]", Path::new("site/pages/a.tss"), Mode::Script);
    let value = interpreter.eval_module(&module, interpreter.root_env());
    let text = value.map(|v| v.display(interpreter.symbols()).to_string());
    assert_eq!(text, Ok("[site/pages/a.tss, site/pages]".to_owned()));
}
