//! The reader: a lazy token stream driven by a stack of open contexts.
//!
//! Whether the next bytes are literal text or code depends on what is open:
//! nothing (template top level) or a `"` means text, anything else means
//! code. A `{` directly at the top level or directly inside a `"` is a
//! *command* brace: newlines inside it separate statements, and its `}`
//! switches back to text.

use std::path::Path;
use std::rc::Rc;

use memchr::memmem;
use smallvec::SmallVec;
use tracing::trace;

use plet_diagnostic::Diagnostic;
use plet_ir::{
    Keyword, Operator, Pos, Punct, Span, Symbol, SymbolTable, Token, TokenFlags, TokenKind,
};

use crate::cursor::Cursor;
use crate::escape::read_escape;
use crate::lex_error::{LexError, LexErrorKind};

/// How a source file starts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Mode {
    /// The whole file is code, as if wrapped in `{ ... }`.
    Script,
    /// The file is literal text with embedded `{ ... }` blocks.
    Template,
}

/// An open bracket, string or pending end quote.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Context {
    Paren,
    Bracket,
    Brace,
    Quote,
    /// A `"` string's text has ended; the closing quote is next.
    EndQuote,
}

impl Context {
    fn closer(self) -> char {
        match self {
            Context::Paren => ')',
            Context::Bracket => ']',
            Context::Brace => '}',
            Context::Quote | Context::EndQuote => '"',
        }
    }

    fn opener(punct: Punct) -> Option<Context> {
        match punct {
            Punct::LParen => Some(Context::Paren),
            Punct::LBracket => Some(Context::Bracket),
            Punct::LBrace => Some(Context::Brace),
            _ => None,
        }
    }
}

#[inline]
fn is_name_byte(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphanumeric() || byte >= 0x80
}

pub struct Reader<'src> {
    source: &'src [u8],
    cursor: Cursor<'src>,
    file: Rc<Path>,
    symbols: &'src SymbolTable,
    contexts: SmallVec<[Context; 8]>,
    /// Depth of the contexts opened by the mode itself.
    base_depth: usize,
    peeked: Option<Token>,
    errors: Vec<LexError>,
    error_count: usize,
    silent: bool,
    /// Set by an unsupported encoding; the stream is over.
    fatal: bool,
}

impl<'src> Reader<'src> {
    /// Create a reader in template mode. Call [`start`](Self::start) to
    /// choose another mode.
    pub fn new(source: &'src [u8], file: Rc<Path>, symbols: &'src SymbolTable) -> Self {
        let mut reader = Reader {
            source,
            cursor: Cursor::new(source),
            file,
            symbols,
            contexts: SmallVec::new(),
            base_depth: 0,
            peeked: None,
            errors: Vec::new(),
            error_count: 0,
            silent: false,
            fatal: false,
        };
        reader.start(Mode::Template);
        reader
    }

    /// Rewind to the beginning of the source and start reading in `mode`.
    pub fn start(&mut self, mode: Mode) {
        self.cursor = Cursor::new(self.source);
        self.contexts.clear();
        self.peeked = None;
        self.errors.clear();
        self.error_count = 0;
        self.fatal = false;
        if mode == Mode::Script {
            self.contexts.push(Context::Brace);
        }
        self.base_depth = self.contexts.len();

        if self.cursor.starts_with(&[0xEF, 0xBB, 0xBF]) {
            self.cursor.advance_by(3);
        } else if self.cursor.starts_with(&[0xFE, 0xFF]) || self.cursor.starts_with(&[0xFF, 0xFE]) {
            let pos = self.cursor.pos();
            self.error(Span::point(pos), LexErrorKind::InvalidEncoding);
            self.error_count += 1;
            self.fatal = true;
        }
    }

    /// Suppress recording of error messages. Errors are still counted.
    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Number of malformed tokens read so far.
    pub fn errors(&self) -> usize {
        self.error_count
    }

    /// Recorded errors, unless the reader is silent.
    pub fn lex_errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn take_lex_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Recorded errors as diagnostics for this reader's file.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .cloned()
            .map(|e| e.into_diagnostic(&self.file))
            .collect()
    }

    pub fn file(&self) -> &Rc<Path> {
        &self.file
    }

    /// Current position of the underlying cursor.
    pub fn pos(&self) -> Pos {
        self.cursor.pos()
    }

    /// The next token, without consuming it.
    pub fn peek_token(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.read_token(),
        };
        self.peeked.insert(token)
    }

    /// Consume the next token. After the end of input this keeps returning
    /// `Eof`.
    pub fn pop_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.read_token(),
        }
    }

    fn read_token(&mut self) -> Token {
        let token = self.next_token();
        if token.is_malformed() {
            self.error_count += 1;
        }
        trace!(kind = ?token.kind, at = %token.span.start, "token");
        token
    }

    fn error(&mut self, span: Span, kind: LexErrorKind) {
        if !self.silent {
            self.errors.push(LexError::new(span, kind));
        }
    }

    fn next_token(&mut self) -> Token {
        loop {
            if self.fatal || self.cursor.is_eof() {
                return self.eof_token();
            }
            match self.contexts.last().copied() {
                None | Some(Context::Quote) => return self.read_text(),
                Some(top) => {
                    if let Some(token) = self.read_code(top) {
                        return token;
                    }
                }
            }
        }
    }

    fn eof_token(&mut self) -> Token {
        let pos = self.cursor.pos();
        let mut token = Token::new(TokenKind::Eof, Span::point(pos));
        if self.contexts.len() > self.base_depth {
            if let Some(&innermost) = self.contexts.last() {
                self.error(
                    Span::point(pos),
                    LexErrorKind::UnclosedContext {
                        expected: innermost.closer(),
                    },
                );
                token.flags |= TokenFlags::MALFORMED;
            }
            self.contexts.truncate(self.base_depth);
        }
        token
    }

    /// Literal text up to the next code block, or the text of a `"` string
    /// up to its next interpolation or its end.
    fn read_text(&mut self) -> Token {
        let in_quote = self.contexts.last() == Some(&Context::Quote);
        let start = self.cursor.pos();
        let mut buf = Vec::new();
        let mut malformed = false;
        let end = loop {
            let run = if in_quote {
                self.cursor.quoted_text_run()
            } else {
                self.cursor.text_run()
            };
            buf.extend_from_slice(self.cursor.advance_by(run));
            let pos = self.cursor.pos();
            match self.cursor.peek() {
                None => break pos,
                Some(b'{') => {
                    if self.cursor.peek_n(1) == Some(b'#') {
                        self.cursor.advance_by(2);
                        self.cursor.skip_block_comment();
                        continue;
                    }
                    self.cursor.bump();
                    self.contexts.push(Context::Brace);
                    break pos;
                }
                Some(b'\\') => {
                    self.cursor.bump();
                    if let Err(kind) = read_escape(&mut self.cursor, &mut buf, true) {
                        let span = Span::new(pos, self.cursor.pos());
                        self.error(span, kind);
                        malformed = true;
                    }
                }
                Some(b'"') => {
                    // Leave the quote for the next token.
                    self.contexts.pop();
                    self.contexts.push(Context::EndQuote);
                    break pos;
                }
                Some(byte) => {
                    self.cursor.bump();
                    buf.push(byte);
                }
            }
        };
        let mut token = Token::new(TokenKind::Text(buf.into_boxed_slice()), Span::new(start, end));
        if malformed {
            token.flags |= TokenFlags::MALFORMED;
        }
        token
    }

    /// One code token, or `None` when only whitespace, a comment or a
    /// command `}` was consumed.
    fn read_code(&mut self, top: Context) -> Option<Token> {
        let depth = self.contexts.len();
        let is_command =
            top == Context::Brace && (depth == 1 || self.contexts[depth - 2] == Context::Quote);
        self.cursor.eat_while(|b| {
            matches!(b, b' ' | b'\t' | b'\r') || (!is_command && b == b'\n')
        });
        let start = self.cursor.pos();
        let c = self.cursor.peek()?;
        let token = match c {
            b'\n' => {
                self.cursor.bump();
                self.simple(TokenKind::LineFeed, start)
            }
            b'}' if is_command => {
                self.cursor.bump();
                self.contexts.pop();
                return None;
            }
            b'\'' => self.read_string(),
            b'"' if top == Context::EndQuote => {
                self.cursor.bump();
                self.contexts.pop();
                self.simple(TokenKind::EndQuote, start)
            }
            b'"' if self.cursor.starts_with(b"\"\"\"") => self.read_verbatim(),
            b'"' => {
                self.cursor.bump();
                self.contexts.push(Context::Quote);
                self.simple(TokenKind::StartQuote, start)
            }
            b'#' => {
                self.cursor.skip_line();
                return None;
            }
            b'0'..=b'9' => self.read_number(),
            _ => {
                if let Some(punct) = Punct::from_byte(c) {
                    if c == b'{' && self.cursor.peek_n(1) == Some(b'#') {
                        self.cursor.advance_by(2);
                        self.cursor.skip_block_comment();
                        return None;
                    }
                    self.cursor.bump();
                    self.read_punct(punct, start)
                } else if Operator::is_operator_byte(c) {
                    self.read_operator()
                } else {
                    self.read_name()
                }
            }
        };
        Some(token)
    }

    fn simple(&self, kind: TokenKind, start: Pos) -> Token {
        Token::new(kind, Span::new(start, self.cursor.pos()))
    }

    fn malformed(&mut self, kind: TokenKind, start: Pos, error: LexErrorKind) -> Token {
        let span = Span::new(start, self.cursor.pos());
        self.error(span, error);
        let mut token = Token::new(kind, span);
        token.flags |= TokenFlags::MALFORMED;
        token
    }

    /// A bracket that was just consumed: openers push a context, closers
    /// pop one and check that it matches.
    fn read_punct(&mut self, punct: Punct, start: Pos) -> Token {
        if let Some(context) = Context::opener(punct) {
            self.contexts.push(context);
            return self.simple(TokenKind::Punct(punct), start);
        }
        let found = punct.as_char();
        match self.contexts.pop() {
            Some(open) if open.closer() == found => self.simple(TokenKind::Punct(punct), start),
            Some(open) => self.malformed(
                TokenKind::Punct(punct),
                start,
                LexErrorKind::MismatchedCloser {
                    found,
                    expected: open.closer(),
                },
            ),
            None => self.malformed(
                TokenKind::Punct(punct),
                start,
                LexErrorKind::UnexpectedByte(u8::try_from(found).unwrap_or(b'?')),
            ),
        }
    }

    fn read_operator(&mut self) -> Token {
        let start = self.cursor.pos();
        let Some(first) = self.cursor.bump() else {
            return self.eof_token();
        };
        let Some(mut op) = Operator::single(first) else {
            return self.malformed(
                TokenKind::Name(Symbol::EMPTY),
                start,
                LexErrorKind::UnexpectedByte(first),
            );
        };
        if let Some(longer) = self.cursor.peek().and_then(|next| op.extend(next)) {
            self.cursor.bump();
            op = longer;
        }
        self.simple(TokenKind::Operator(op), start)
    }

    fn read_number(&mut self) -> Token {
        let start = self.cursor.pos();
        let int_end = self.cursor.eat_while(|b| b.is_ascii_digit()).len();
        let mut len = int_end;
        let mut is_float = false;
        if self.cursor.peek() == Some(b'.') {
            is_float = true;
            self.cursor.bump();
            len += 1 + self.cursor.eat_while(|b| b.is_ascii_digit()).len();
        }
        if matches!(self.cursor.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.cursor.bump();
            len += 1;
            if matches!(self.cursor.peek(), Some(b'+' | b'-')) {
                self.cursor.bump();
                len += 1;
            }
            len += self.cursor.eat_while(|b| b.is_ascii_digit()).len();
        }
        let from = start.offset as usize;
        let text = std::str::from_utf8(&self.source[from..from + len]).unwrap_or("");
        if is_float {
            match text.parse::<f64>() {
                Ok(value) => self.simple(TokenKind::Float(value), start),
                Err(_) => self.malformed(TokenKind::Float(0.0), start, LexErrorKind::InvalidFloat),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.simple(TokenKind::Int(value), start),
                Err(_) => self.malformed(TokenKind::Int(0), start, LexErrorKind::IntOverflow),
            }
        }
    }

    fn read_name(&mut self) -> Token {
        let start = self.cursor.pos();
        let name = self.cursor.eat_while(is_name_byte);
        if name.is_empty() {
            let byte = self.cursor.bump().unwrap_or(0);
            return self.malformed(
                TokenKind::Name(Symbol::EMPTY),
                start,
                LexErrorKind::UnexpectedByte(byte),
            );
        }
        let kind = match Keyword::from_bytes(name) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Name(self.symbols.intern_bytes(name)),
        };
        self.simple(kind, start)
    }

    /// `'...'` with escapes.
    fn read_string(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.bump();
        let mut buf = Vec::new();
        let mut malformed = false;
        loop {
            buf.extend_from_slice(self.cursor.eat_while(|b| b != b'\'' && b != b'\\'));
            let pos = self.cursor.pos();
            match self.cursor.bump() {
                None => {
                    self.error(
                        Span::new(start, pos),
                        LexErrorKind::UnterminatedString { start },
                    );
                    malformed = true;
                    break;
                }
                Some(b'\'') => break,
                Some(_) => {
                    if let Err(kind) = read_escape(&mut self.cursor, &mut buf, false) {
                        let span = Span::new(pos, self.cursor.pos());
                        self.error(span, kind);
                        malformed = true;
                    }
                }
            }
        }
        let mut token = self.simple(TokenKind::String(buf.into_boxed_slice()), start);
        if malformed {
            token.flags |= TokenFlags::MALFORMED;
        }
        token
    }

    /// `"""..."""` without escapes.
    fn read_verbatim(&mut self) -> Token {
        let start = self.cursor.pos();
        self.cursor.advance_by(3);
        let rest = self.cursor.rest();
        let (body, terminated) = match memmem::find(rest, b"\"\"\"") {
            Some(len) => {
                let body = self.cursor.advance_by(len);
                self.cursor.advance_by(3);
                (body, true)
            }
            None => (self.cursor.advance_by(rest.len()), false),
        };
        let kind = TokenKind::String(body.into());
        let mut token = if terminated {
            self.simple(kind, start)
        } else {
            self.malformed(kind, start, LexErrorKind::UnterminatedString { start })
        };
        token.flags |= TokenFlags::VERBATIM;
        token
    }
}
