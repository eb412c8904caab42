//! Interned identifiers.
//!
//! Names, keywords used as object keys, and symbol values all go through a
//! single [`SymbolTable`] per build so that equality is an integer compare.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;

/// Interned string handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Symbol(u32);

/// Names that the interpreter and the template host refer to directly.
///
/// Interned in this order by [`SymbolTable::new`], so each constant below
/// is valid in every table.
const WELL_KNOWN: [&str; 9] = [
    "", "true", "false", "nil", "CONTENT", "LAYOUT", "FILE", "DIR", "GLOBAL",
];

impl Symbol {
    pub const EMPTY: Symbol = Symbol(0);
    pub const TRUE: Symbol = Symbol(1);
    pub const FALSE: Symbol = Symbol(2);
    pub const NIL: Symbol = Symbol(3);
    pub const CONTENT: Symbol = Symbol(4);
    pub const LAYOUT: Symbol = Symbol(5);
    pub const FILE: Symbol = Symbol(6);
    pub const DIR: Symbol = Symbol(7);
    pub const GLOBAL: Symbol = Symbol(8);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

#[derive(Default)]
struct SymbolMap {
    map: FxHashMap<&'static str, Symbol>,
    strings: Vec<&'static str>,
}

/// String interner shared by the reader, the parser and every environment
/// of one build.
///
/// Interned strings are leaked: a symbol table lives as long as the build
/// and symbols are never released individually.
pub struct SymbolTable {
    inner: RefCell<SymbolMap>,
}

impl SymbolTable {
    /// Create a table with the well-known symbols pre-interned.
    pub fn new() -> Self {
        let table = SymbolTable {
            inner: RefCell::new(SymbolMap::default()),
        };
        for name in WELL_KNOWN {
            table.intern(name);
        }
        table
    }

    /// Intern a string, returning its symbol.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> Symbol {
        if let Some(&symbol) = self.inner.borrow().map.get(s) {
            return symbol;
        }
        let mut inner = self.inner.borrow_mut();
        let index = u32::try_from(inner.strings.len())
            .unwrap_or_else(|_| panic!("symbol table exceeded {} entries", u32::MAX));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let symbol = Symbol(index);
        inner.strings.push(leaked);
        inner.map.insert(leaked, symbol);
        symbol
    }

    /// Intern raw bytes from a source buffer.
    ///
    /// Names may contain any byte `>= 0x80`; invalid UTF-8 is replaced
    /// rather than rejected since the reader has already accepted it.
    pub fn intern_bytes(&self, bytes: &[u8]) -> Symbol {
        match std::str::from_utf8(bytes) {
            Ok(s) => self.intern(s),
            Err(_) => self.intern(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.inner.borrow().map.get(s).copied()
    }

    /// Resolve a symbol to its text.
    ///
    /// Symbols from another table resolve to the empty string.
    pub fn resolve(&self, symbol: Symbol) -> &'static str {
        self.inner
            .borrow()
            .strings
            .get(symbol.0 as usize)
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the well-known ones.
    pub fn len(&self) -> usize {
        self.inner.borrow().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
