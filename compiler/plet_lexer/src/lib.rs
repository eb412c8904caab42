//! Reader for the Plet template language.
//!
//! The [`Reader`] is a lazy, pollable token stream; [`lex`] drains one into
//! a list, giving up after [`MAX_LEX_ERRORS`] malformed tokens.

mod cursor;
mod escape;
mod lex_error;
mod reader;

use std::path::Path;
use std::rc::Rc;

use plet_diagnostic::Diagnostic;
use plet_ir::{Span, SymbolTable, Token, TokenKind};

pub use lex_error::{LexError, LexErrorKind};
pub use reader::{Mode, Reader};

/// Malformed tokens after which [`lex`] stops reading.
pub const MAX_LEX_ERRORS: usize = 10;

/// Output of [`lex`]: the token list, always ending in `Eof`, and the
/// errors met while reading it.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn diagnostics(&self, file: &Rc<Path>) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .cloned()
            .map(|e| e.into_diagnostic(file))
            .collect()
    }
}

/// Read all of `source` in `mode`.
pub fn lex(source: &[u8], file: &Rc<Path>, symbols: &SymbolTable, mode: Mode) -> LexOutput {
    let mut reader = Reader::new(source, Rc::clone(file), symbols);
    reader.start(mode);
    let mut tokens = Vec::with_capacity(source.len() / 4 + 1);
    loop {
        let token = reader.pop_token();
        let at_end = token.kind == TokenKind::Eof;
        tokens.push(token);
        if at_end {
            break;
        }
        if reader.errors() >= MAX_LEX_ERRORS {
            tokens.push(Token::new(TokenKind::Eof, Span::point(reader.pos())));
            break;
        }
    }
    LexOutput {
        tokens,
        errors: reader.take_lex_errors(),
    }
}
