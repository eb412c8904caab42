use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_collector_clones_share_buffer() {
    let collector = Collector::new();
    let handler = Handler::new(collector.clone());
    handler.emit(&Diagnostic::warning("careful"));
    handler.emit(&Diagnostic::error("broken"));
    assert_eq!(collector.len(), 2);
    assert_eq!(collector.errors(), vec!["broken".to_owned()]);
    assert_eq!(collector.messages(Level::Warning), vec!["careful".to_owned()]);
}

#[test]
fn test_handler_counts_levels() {
    let handler = Handler::new(Collector::new());
    assert!(handler.emit(&Diagnostic::info("note")).is_none());
    assert!(handler.emit(&Diagnostic::warning("hmm")).is_none());
    assert!(handler.has_errors().is_none());
    assert!(handler.emit(&Diagnostic::error("bad")).is_some());
    assert_eq!(handler.error_count(), 1);
    assert_eq!(handler.warning_count(), 1);
    assert!(handler.has_errors().is_some());
}

#[test]
fn test_emit_error_forces_level() {
    let collector = Collector::new();
    let handler = Handler::new(collector.clone());
    handler.emit_error(Diagnostic::info("upgraded"));
    assert_eq!(collector.errors(), vec!["upgraded".to_owned()]);
    assert_eq!(handler.error_count(), 1);
}
