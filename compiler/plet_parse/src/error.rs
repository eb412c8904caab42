//! Parse error types.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use plet_diagnostic::Diagnostic;
use plet_ir::{Span, TokenKind};

/// A syntax error: where it happened and what went wrong.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub span: Span,
    pub kind: ParseErrorKind,
}

/// What went wrong. `found` fields hold a token description as produced
/// by [`TokenKind::describe`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// A specific token was required.
    Expected {
        expected: &'static str,
        found: String,
        construct: &'static str,
    },
    /// A block construct reached a token that cannot continue it.
    Unclosed {
        construct: &'static str,
        found: String,
    },
    ExpectedExpression { found: String },
    /// A token that cannot start or continue a statement.
    UnexpectedToken { found: String },
    InvalidAssignTarget,
    /// `break` or `continue` outside a `for` body.
    OutsideLoop { keyword: &'static str },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Expected {
                expected,
                found,
                construct,
            } => write!(f, "expected {expected} in '{construct}', found {found}"),
            ParseErrorKind::Unclosed { construct, found } => {
                write!(f, "missing 'end' for '{construct}', found {found}")
            }
            ParseErrorKind::ExpectedExpression { found } => {
                write!(f, "expected an expression, found {found}")
            }
            ParseErrorKind::UnexpectedToken { found } => write!(f, "unexpected {found}"),
            ParseErrorKind::InvalidAssignTarget => write!(f, "invalid assignment target"),
            ParseErrorKind::OutsideLoop { keyword } => {
                write!(f, "'{keyword}' outside of a 'for' loop")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span.start, self.kind)
    }
}

impl ParseError {
    pub fn new(span: Span, kind: ParseErrorKind) -> Self {
        ParseError { span, kind }
    }

    pub fn expected(
        span: Span,
        expected: &'static str,
        found: &TokenKind,
        construct: &'static str,
    ) -> Self {
        Self::new(
            span,
            ParseErrorKind::Expected {
                expected,
                found: found.describe(),
                construct,
            },
        )
    }

    pub fn unexpected(span: Span, found: &TokenKind) -> Self {
        Self::new(
            span,
            ParseErrorKind::UnexpectedToken {
                found: found.describe(),
            },
        )
    }

    /// Convert to a diagnostic for `file`.
    pub fn into_diagnostic(self, file: &Rc<Path>) -> Diagnostic {
        Diagnostic::error(format!("syntax error: {}", self.kind))
            .with_file(Rc::clone(file))
            .with_span(self.span)
    }
}

#[cfg(test)]
mod tests;
