use super::*;
use crate::Interpreter;
use plet_diagnostic::Collector;
use pretty_assertions::assert_eq;

fn root_with(collector: &Collector) -> Env {
    Interpreter::builder()
        .reporter(collector.clone())
        .build()
        .root_env()
        .clone()
}

#[test]
fn test_define_is_local_get_walks_chain() {
    let root = root_with(&Collector::new());
    let x = root.intern("x");
    root.define(x, Value::Int(1));
    let child = root.child();
    assert_eq!(child.get(x), Some(Value::Int(1)));
    child.define(x, Value::Int(2));
    assert_eq!(child.get(x), Some(Value::Int(2)));
    assert_eq!(root.get(x), Some(Value::Int(1)));
    assert!(child.has_own(x));
    assert!(!child.child().has_own(x));
}

#[test]
fn test_unbound_differs_from_nil() {
    let root = root_with(&Collector::new());
    let name = root.intern("maybe");
    assert_eq!(root.get(name), None);
    root.define(name, Value::Nil);
    assert_eq!(root.get(name), Some(Value::Nil));
    assert_eq!(root.get_str("never interned here"), None);
}

#[test]
fn test_last_native_definition_wins() {
    let root = root_with(&Collector::new());
    root.define_native("f", |_, _| Value::Int(1));
    root.define_native("f", |_, _| Value::Int(2));
    let f = root.get_str("f").unwrap_or_default();
    assert_eq!(root.apply(&f, &[]), Ok(Value::Int(2)));
}

#[test]
fn test_arenas() {
    let root = root_with(&Collector::new());
    let child = root.child();
    let module = Env::new_arena_child(&root);
    assert_eq!(child.arena_id(), root.arena_id());
    assert_ne!(module.arena_id(), root.arena_id());
    assert!(module.root_env().ptr_eq(&root));

    let before = root.arena().allocations();
    let value = child.string("x");
    assert_eq!(value.arena(), Some(root.arena_id()));
    assert_eq!(root.arena().allocations(), before + 1);
}

#[test]
fn test_exports_keep_order_without_duplicates() {
    let root = root_with(&Collector::new());
    let (a, b) = (root.intern("a"), root.intern("b"));
    root.export(b);
    root.export(a);
    root.export(b);
    assert_eq!(root.exports(), vec![b, a]);
}

#[test]
fn test_diagnostics_without_call_site() {
    let collector = Collector::new();
    let root = root_with(&collector);
    root.define(Symbol::FILE, root.string("site/index.html"));
    root.warn(ArgIndex::All, "careful");
    root.info(ArgIndex::None, "note");
    assert!(!root.has_error());
    root.error(ArgIndex::Arg(0), "broken");
    assert!(root.has_error());
    assert!(root.take_error().is_some());
    assert!(!root.has_error());

    let diagnostics = collector.diagnostics();
    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics[0].to_string(), "site/index.html: warning: careful");
    assert_eq!(diagnostics[1].level, Level::Info);
    assert_eq!(diagnostics[2].to_string(), "site/index.html: error: broken");
}

#[test]
fn test_apply_non_function_reports() {
    let collector = Collector::new();
    let root = root_with(&collector);
    assert!(root.apply(&Value::Int(3), &[]).is_err());
    assert_eq!(
        collector.errors(),
        vec!["value of type int is not a function".to_owned()]
    );
    assert!(root.has_error());
}

#[test]
fn test_loop_counter_is_shared_within_an_arena() {
    let context = Interpreter::builder()
        .reporter(Collector::new())
        .max_loop_iterations(2)
        .build()
        .context()
        .clone();
    let root = Env::root(context);
    let child = root.child();
    assert_eq!(root.tick_loop(), Ok(()));
    assert_eq!(child.tick_loop(), Ok(()));
    assert_eq!(child.tick_loop(), Err(2));
    // A new arena starts counting again.
    assert_eq!(Env::new_arena_child(&root).tick_loop(), Ok(()));
}

#[test]
fn test_clear_drops_bindings() {
    let root = root_with(&Collector::new());
    root.define_str("x", Value::Int(1));
    root.export(root.intern("x"));
    root.clear();
    assert_eq!(root.get_str("x"), None);
    assert!(root.exports().is_empty());
}
