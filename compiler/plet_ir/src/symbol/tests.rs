use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_intern_is_stable() {
    let table = SymbolTable::new();
    let a = table.intern("title");
    let b = table.intern("title");
    let c = table.intern("body");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.resolve(a), "title");
}

#[test]
fn test_well_known_symbols() {
    let table = SymbolTable::new();
    assert_eq!(table.intern("CONTENT"), Symbol::CONTENT);
    assert_eq!(table.intern("LAYOUT"), Symbol::LAYOUT);
    assert_eq!(table.intern("true"), Symbol::TRUE);
    assert_eq!(table.intern(""), Symbol::EMPTY);
    assert_eq!(table.resolve(Symbol::GLOBAL), "GLOBAL");
}

#[test]
fn test_intern_bytes_lossy() {
    let table = SymbolTable::new();
    let sym = table.intern_bytes(b"caf\xc3\xa9");
    assert_eq!(table.resolve(sym), "café");
    let broken = table.intern_bytes(b"a\xffb");
    assert_eq!(table.resolve(broken), "a\u{fffd}b");
}

#[test]
fn test_get_does_not_intern() {
    let table = SymbolTable::new();
    let before = table.len();
    assert_eq!(table.get("missing"), None);
    assert_eq!(table.len(), before);
}
