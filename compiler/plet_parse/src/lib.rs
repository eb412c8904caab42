//! Recursive descent parser for the Plet template language.
//!
//! Produces a flat [`Ast`] in a [`NodeArena`]. Syntax errors are collected,
//! not fatal: after an error the parser resynchronizes at the next
//! statement boundary and keeps going until [`MAX_PARSE_ERRORS`].

mod cursor;
mod error;
mod grammar;
mod recovery;

use std::path::Path;
use std::rc::Rc;

use plet_diagnostic::Diagnostic;
use plet_ir::{Ast, NodeArena, NodeId, NodeKind, Span, SymbolTable, Token};
use plet_lexer::{lex, LexError, Mode};

pub use cursor::Cursor;
pub use error::{ParseError, ParseErrorKind};
pub use recovery::{synchronize, TokenSet, BLOCK_END, STMT_BOUNDARY};

/// Syntax errors after which the parser gives up on the rest of the input.
pub const MAX_PARSE_ERRORS: usize = 10;

/// Output of parsing one source file.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub ast: Rc<Ast>,
    pub lex_errors: Vec<LexError>,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    /// Whether reading or parsing reported anything.
    pub fn has_errors(&self) -> bool {
        !self.lex_errors.is_empty() || !self.errors.is_empty()
    }

    /// Lexical errors first, then syntax errors, all tagged with the file.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let file = self.ast.file();
        self.lex_errors
            .iter()
            .cloned()
            .map(|e| e.into_diagnostic(file))
            .chain(self.errors.iter().cloned().map(|e| e.into_diagnostic(file)))
            .collect()
    }
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: NodeArena,
    symbols: &'a SymbolTable,
    errors: Vec<ParseError>,
    /// Errors met so far, including ones not recorded because they sit on
    /// a token the reader already flagged.
    error_count: usize,
    /// Enclosing `for` bodies; reset inside lambdas.
    loop_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], symbols: &'a SymbolTable) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: NodeArena::new(),
            symbols,
            errors: Vec::new(),
            error_count: 0,
            loop_depth: 0,
        }
    }

    /// Record a syntax error. Errors on malformed tokens are counted but
    /// not recorded: the reader has reported them already.
    fn report(&mut self, error: ParseError) {
        self.error_count += 1;
        if self.cursor.current().is_malformed() || self.errors.len() >= MAX_PARSE_ERRORS {
            return;
        }
        tracing::trace!(%error, "syntax error");
        self.errors.push(error);
    }

    /// Whether the error cap has been reached.
    #[inline]
    fn halted(&self) -> bool {
        self.errors.len() >= MAX_PARSE_ERRORS
    }

    fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.arena.alloc(kind, span)
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    /// Parse the whole token list.
    pub fn parse_file(mut self, file: Rc<Path>) -> (Ast, Vec<ParseError>) {
        let root = self.parse_top_level();
        (Ast::new(self.arena, root, file), self.errors)
    }
}

/// Parse a token list produced by [`plet_lexer::lex`].
#[tracing::instrument(level = "debug", skip_all, fields(file = %file.display()))]
pub fn parse(tokens: &[Token], file: Rc<Path>, symbols: &SymbolTable) -> ParseOutput {
    let (ast, errors) = Parser::new(tokens, symbols).parse_file(file);
    tracing::debug!(nodes = ast.arena().len(), errors = errors.len(), "parsed");
    ParseOutput {
        ast: Rc::new(ast),
        lex_errors: Vec::new(),
        errors,
    }
}

/// Read and parse `source` in `mode`.
pub fn parse_source(
    source: &[u8],
    file: Rc<Path>,
    symbols: &SymbolTable,
    mode: Mode,
) -> ParseOutput {
    let lexed = lex(source, &file, symbols, mode);
    let mut output = parse(&lexed.tokens, file, symbols);
    output.lex_errors = lexed.errors;
    output
}
