//! Reader errors.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use plet_diagnostic::Diagnostic;
use plet_ir::{Pos, Span};

/// A lexical error: where it happened and what went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// A byte that cannot start any token.
    UnexpectedByte(u8),
    /// A closing bracket that does not match the innermost open context.
    MismatchedCloser { found: char, expected: char },
    /// End of input with an open context.
    UnclosedContext { expected: char },
    /// End of input in the middle of an escape sequence.
    EofInEscape,
    /// A `'...'` or `"""..."""` string without its terminator.
    UnterminatedString { start: Pos },
    InvalidHexEscape,
    UnknownEscape(u8),
    CodePointOutOfRange(u32),
    IntOverflow,
    InvalidFloat,
    /// A UTF-16 byte order mark.
    InvalidEncoding,
}

/// Render a byte for a message: printable ASCII as itself, anything else
/// as a hex escape.
fn show_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        char::from(byte).to_string()
    } else {
        format!("\\x{byte:02x}")
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnexpectedByte(byte) => write!(f, "unexpected '{}'", show_byte(*byte)),
            LexErrorKind::MismatchedCloser { found, expected } => {
                write!(f, "unexpected '{found}', expected '{expected}'")
            }
            LexErrorKind::UnclosedContext { expected } => {
                write!(f, "unexpected end of input, expected '{expected}'")
            }
            LexErrorKind::EofInEscape => write!(f, "unexpected end of input"),
            LexErrorKind::UnterminatedString { start } => write!(
                f,
                "missing end of string literal, string literal started on line {start}"
            ),
            LexErrorKind::InvalidHexEscape => write!(f, "invalid hexadecimal escape sequence"),
            LexErrorKind::UnknownEscape(byte) => {
                write!(f, "undefined escape sequence: '\\{}'", show_byte(*byte))
            }
            LexErrorKind::CodePointOutOfRange(cp) => {
                write!(f, "unicode code point out of range: 0x{cp:x}")
            }
            LexErrorKind::IntOverflow => write!(f, "integer literal is too large"),
            LexErrorKind::InvalidFloat => write!(f, "invalid floating point literal"),
            LexErrorKind::InvalidEncoding => write!(f, "invalid file encoding, UTF-8 expected"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span.start, self.kind)
    }
}

impl LexError {
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }

    /// Convert to a diagnostic for `file`.
    pub fn into_diagnostic(self, file: &Rc<Path>) -> Diagnostic {
        Diagnostic::error(self.kind.to_string())
            .with_file(Rc::clone(file))
            .with_span(self.span)
    }
}
