#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use plet_diagnostic::Collector;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn setup() -> (ModuleCache, SymbolTable, Handler, Collector) {
    let collector = Collector::new();
    (
        ModuleCache::new(),
        SymbolTable::new(),
        Handler::new(collector.clone()),
        collector,
    )
}

#[test]
fn test_cache_hit_does_not_reparse() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.tss");
    fs::write(&path, "export x = 1").unwrap();
    let (cache, symbols, handler, _) = setup();

    let first = cache.load(&path, SourceKind::Script, &symbols, &handler).unwrap();
    let second = cache.load(&path, SourceKind::Script, &symbols, &handler).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(cache.parse_count(), 1);
    assert!(first.ast().is_some());
    assert!(first.parse_error().is_none());
}

#[test]
fn test_script_and_template_entries_are_separate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.html");
    fs::write(&path, "hello {1 + 1}").unwrap();
    let (cache, symbols, handler, collector) = setup();

    let script = cache.load(&path, SourceKind::Script, &symbols, &handler).unwrap();
    assert!(script.parse_error().is_some());
    let reported = collector.len();

    let template = cache.load(&path, SourceKind::Template, &symbols, &handler).unwrap();
    assert!(template.parse_error().is_none());
    assert!(!Rc::ptr_eq(&script, &template));
    assert_eq!(template.source(), Some(SourceKind::Template));
    assert_eq!(collector.len(), reported);

    // Each kind is cached on its own.
    let again = cache.load(&path, SourceKind::Script, &symbols, &handler).unwrap();
    assert!(Rc::ptr_eq(&script, &again));
    assert_eq!(cache.parse_count(), 2);
    assert!(cache.get(&path).is_none());
}

#[test]
fn test_failed_module_is_cached_and_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.tss");
    fs::write(&path, "x = )").unwrap();
    let (cache, symbols, handler, collector) = setup();

    let module = cache.load(&path, SourceKind::Script, &symbols, &handler).unwrap();
    assert!(module.parse_error().is_some());
    let reported = collector.len();
    assert!(reported > 0);

    let again = cache.load(&path, SourceKind::Script, &symbols, &handler).unwrap();
    assert!(again.parse_error().is_some());
    assert_eq!(collector.len(), reported);
    assert_eq!(cache.parse_count(), 1);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.tss");
    let (cache, symbols, handler, _) = setup();
    let error = cache
        .load(&path, SourceKind::Script, &symbols, &handler)
        .unwrap_err();
    assert!(matches!(error, LoadError::Io { .. }));
    assert_eq!(error.path(), path.as_path());
    assert!(cache.is_empty());
}

#[test]
fn test_dirty_module_is_reparsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.html");
    fs::write(&path, "a").unwrap();
    let (cache, symbols, handler, _) = setup();

    let first = cache.load(&path, SourceKind::Template, &symbols, &handler).unwrap();
    first.mark_dirty();
    let second = cache.load(&path, SourceKind::Template, &symbols, &handler).unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert!(!second.is_dirty());
    assert_eq!(cache.parse_count(), 2);
}

#[test]
fn test_invalidate_stale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tss");
    fs::write(&path, "1").unwrap();
    let (cache, symbols, handler, _) = setup();
    let module = cache.load(&path, SourceKind::Data, &symbols, &handler).unwrap();
    assert!(matches!(module.kind(), ModuleKind::Data(_)));
    assert_eq!(cache.invalidate_stale(), 0);

    let later = module.mtime().unwrap() + Duration::from_secs(5);
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(later)
        .unwrap();
    assert_eq!(cache.invalidate_stale(), 1);
    assert!(module.is_dirty());
    // Already dirty modules are not counted again.
    assert_eq!(cache.invalidate_stale(), 0);
}

#[test]
fn test_system_and_asset_entries() {
    let (cache, _, _, _) = setup();
    cache.register_system("site", Rc::new(|_: &Env| Value::Int(1)));
    assert!(matches!(
        cache.get(Path::new("site")).unwrap().kind(),
        ModuleKind::System(_)
    ));
    cache.add_asset(Path::new("img/logo.png"), 640, 480);
    assert!(matches!(
        cache.get(Path::new("img/logo.png")).unwrap().kind(),
        ModuleKind::Asset {
            width: 640,
            height: 480
        }
    ));
    assert_eq!(cache.invalidate_stale(), 0);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_evaluation_flag() {
    let module = Module::new(
        ModuleKind::Asset {
            width: 1,
            height: 1,
        },
        shared_path("a.png"),
        None,
    );
    assert!(module.begin_evaluation());
    assert!(!module.begin_evaluation());
    module.end_evaluation();
    assert!(module.begin_evaluation());
}
