//! Display text of values, as produced by template output.

use std::fmt;
use std::io::Write;

use plet_ir::SymbolTable;

use super::Value;

impl Value {
    /// Append the display text of this value to `out`.
    ///
    /// Strings are written as raw bytes. Containers that contain themselves
    /// print `[...]` or `{...}` at the point of recursion.
    pub fn write_display(&self, symbols: &SymbolTable, out: &mut Vec<u8>) {
        let mut seen = Vec::new();
        write_value(self, symbols, out, &mut seen);
    }

    /// Display text as bytes.
    pub fn display_bytes(&self, symbols: &SymbolTable) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_display(symbols, &mut out);
        out
    }

    /// Adapter implementing [`fmt::Display`]. Invalid UTF-8 is replaced.
    pub fn display<'a>(&'a self, symbols: &'a SymbolTable) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            symbols,
        }
    }
}

pub struct ValueDisplay<'a> {
    value: &'a Value,
    symbols: &'a SymbolTable,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.value.display_bytes(self.symbols);
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

fn write_value(value: &Value, symbols: &SymbolTable, out: &mut Vec<u8>, seen: &mut Vec<*const ()>) {
    // Writing to a Vec<u8> cannot fail.
    match value {
        Value::Nil => {}
        Value::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Int(i) | Value::Time(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => {
            let _ = write!(out, "{f}");
        }
        Value::Symbol(s) => out.extend_from_slice(symbols.resolve(*s).as_bytes()),
        Value::String(s) => out.extend_from_slice(s.as_bytes()),
        Value::Array(array) => {
            let addr = array.addr();
            if seen.contains(&addr) {
                out.extend_from_slice(b"[...]");
                return;
            }
            seen.push(addr);
            out.push(b'[');
            for (i, item) in array.items().iter().enumerate() {
                if i > 0 {
                    out.extend_from_slice(b", ");
                }
                write_value(item, symbols, out, seen);
            }
            out.push(b']');
            seen.pop();
        }
        Value::Object(object) => {
            let addr = object.addr();
            if seen.contains(&addr) {
                out.extend_from_slice(b"{...}");
                return;
            }
            seen.push(addr);
            out.push(b'{');
            for (i, (key, value)) in object.borrow().iter().enumerate() {
                if i > 0 {
                    out.extend_from_slice(b", ");
                }
                write_value(key, symbols, out, seen);
                out.extend_from_slice(b": ");
                write_value(value, symbols, out, seen);
            }
            out.push(b'}');
            seen.pop();
        }
        Value::Native(_) => out.extend_from_slice(b"<function>"),
        Value::Closure(_) => out.extend_from_slice(b"<closure>"),
    }
}
