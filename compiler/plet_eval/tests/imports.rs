#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Import and module cache behaviour against real files.

use std::cell::Cell;
use std::fs;
use std::rc::Rc;

use plet_diagnostic::Collector;
use plet_eval::{Env, Interpreter, SourceKind, Value};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Site {
    dir: TempDir,
    interpreter: Interpreter,
    collector: Collector,
    evaluations: Rc<Cell<u32>>,
}

impl Site {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let collector = Collector::new();
        let evaluations = Rc::new(Cell::new(0));
        let counter = Rc::clone(&evaluations);
        let interpreter = Interpreter::builder()
            .reporter(collector.clone())
            .prelude(move |env: &Env| {
                let counter = Rc::clone(&counter);
                env.define_native("count", move |_, _| {
                    counter.set(counter.get() + 1);
                    Value::Nil
                });
            })
            .build();
        Site {
            dir,
            interpreter,
            collector,
            evaluations,
        }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, name: &str) -> Result<String, Vec<String>> {
        let module = self
            .interpreter
            .load_script(&self.path(name))
            .map_err(|e| vec![e.to_string()])?;
        let env = self.interpreter.root_env();
        self.interpreter
            .eval_module(&module, env)
            .map(|value| value.display(env.symbols()).to_string())
            .map_err(|_| self.collector.errors())
    }
}

#[test]
fn test_import_parses_and_evaluates_once() {
    let site = Site::new(&[
        ("lib.tss", "count()\nexport greet = name => 'hello ' + name\nexport n = 2"),
        (
            "main.tss",
            "a = import('lib.tss')\nb = import('lib.tss')\n[greet('x'), a.n, b.n]",
        ),
    ]);
    assert_eq!(site.run("main.tss"), Ok("[hello x, 2, 2]".to_owned()));
    assert_eq!(site.evaluations.get(), 1);
    // main.tss and lib.tss, each parsed once.
    assert_eq!(site.interpreter.modules().parse_count(), 2);
}

#[test]
fn test_import_resolves_against_importer_dir() {
    let site = Site::new(&[
        ("lib/a.tss", "b = import('b.tss')\nexport value = b.value + 1"),
        ("lib/b.tss", "export value = 41"),
        ("main.tss", "m = import('lib/a.tss')\nvalue"),
    ]);
    assert_eq!(site.run("main.tss"), Ok("42".to_owned()));
}

#[test]
fn test_module_runs_in_its_own_arena() {
    let site = Site::new(&[
        ("lib.tss", "items = [1]\nexport items"),
        (
            "main.tss",
            "m = import('lib.tss')\nitems[0] = 5\nn = import('lib.tss')\n[items, m.items, n.items]",
        ),
    ]);
    // Every import copies the cached exports; earlier copies are untouched.
    assert_eq!(site.run("main.tss"), Ok("[[1], [5], [1]]".to_owned()));
    let module = site
        .interpreter
        .modules()
        .get_loaded(&site.path("lib.tss"), SourceKind::Script)
        .unwrap();
    let exports = module.exports().unwrap();
    assert_ne!(
        exports.arena(),
        Some(site.interpreter.root_env().arena_id())
    );
}

#[test]
fn test_module_scope_is_private() {
    let site = Site::new(&[
        ("lib.tss", "secret = 1\nexport visible = 2"),
        ("main.tss", "import('lib.tss')\nsecret"),
    ]);
    assert_eq!(
        site.run("main.tss"),
        Err(vec!["undefined variable 'secret'".to_owned()])
    );
}

#[test]
fn test_missing_import() {
    let site = Site::new(&[("main.tss", "import('missing.tss')")]);
    let errors = site.run("main.tss").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("missing.tss"), "{errors:?}");
}

#[test]
fn test_broken_import_is_reported_once() {
    let site = Site::new(&[
        ("bad.tss", "x = )"),
        ("main.tss", "import('bad.tss')"),
        ("other.tss", "import('bad.tss')"),
    ]);
    let first = site.run("main.tss").unwrap_err();
    assert!(!first.is_empty());
    let second = site.run("other.tss").unwrap_err();
    assert_eq!(first, second);
    assert_eq!(site.interpreter.modules().parse_count(), 3);
}

#[test]
fn test_circular_import() {
    let site = Site::new(&[
        ("a.tss", "import('b.tss')\nexport a = 1"),
        ("b.tss", "import('a.tss')\nexport b = 1"),
    ]);
    let errors = site.run("a.tss").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("circular import of"), "{errors:?}");
}

#[test]
fn test_module_return_value_is_not_exported() {
    let site = Site::new(&[
        ("lib.tss", "export x = 1\nreturn 99"),
        ("main.tss", "type(import('lib.tss'))"),
    ]);
    assert_eq!(site.run("main.tss"), Ok("object".to_owned()));
}

#[test]
fn test_stale_module_is_reloaded() {
    let site = Site::new(&[
        ("lib.tss", "export v = 1"),
        ("main.tss", "m = import('lib.tss')\nv"),
    ]);
    assert_eq!(site.run("main.tss"), Ok("1".to_owned()));

    fs::write(site.path("lib.tss"), "export v = 2").unwrap();
    let lib = site
        .interpreter
        .modules()
        .get_loaded(&site.path("lib.tss"), SourceKind::Script)
        .unwrap();
    lib.mark_dirty();
    assert_eq!(site.run("main.tss"), Ok("2".to_owned()));
    assert_eq!(site.interpreter.modules().parse_count(), 3);
}

#[test]
fn test_data_module() {
    let site = Site::new(&[("data.tss", "{title: 'About', tags: ['a', 'b']}")]);
    let value = site.interpreter.load_data(&site.path("data.tss")).unwrap();
    let symbols = site.interpreter.symbols();
    assert_eq!(
        value.display(symbols).to_string(),
        "{title: About, tags: [a, b]}"
    );
    assert!(site.interpreter.load_data(&site.path("nope.tss")).is_err());
}
