//! Token cursor for navigating the token stream.

use plet_ir::{Keyword, Operator, Punct, Span, Token, TokenKind};
use tracing::trace;

/// Position in a token list that always ends with `Eof`.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// # Panics
    /// Panics in debug builds if `tokens` does not end with `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind == TokenKind::Eof),
            "token list must end with Eof"
        );
        Cursor { tokens, pos: 0 }
    }

    /// Used for progress tracking.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current token; `Eof` once the list is exhausted.
    #[inline]
    pub fn current(&self) -> &'a Token {
        self.token_at(self.pos)
    }

    fn token_at(&self, index: usize) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[index.min(last)]
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token `n` positions ahead; `peek_kind(0)` is the current
    /// token.
    #[inline]
    pub fn peek_kind(&self, n: usize) -> &'a TokenKind {
        &self.token_at(self.pos + n).kind
    }

    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.token_at(self.pos - 1).span
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Consume the current token and return it. Never moves past `Eof`.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            trace!(kind = ?token.kind, at = %token.span.start, "advance");
            self.pos += 1;
        }
        token
    }

    #[inline]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_kind().is_keyword(keyword)
    }

    #[inline]
    pub fn check_operator(&self, operator: Operator) -> bool {
        self.current_kind().is_operator(operator)
    }

    #[inline]
    pub fn check_punct(&self, punct: Punct) -> bool {
        self.current_kind().is_punct(punct)
    }

    pub fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.check_keyword(keyword);
        if found {
            self.advance();
        }
        found
    }

    pub fn eat_operator(&mut self, operator: Operator) -> bool {
        let found = self.check_operator(operator);
        if found {
            self.advance();
        }
        found
    }

    pub fn eat_punct(&mut self, punct: Punct) -> bool {
        let found = self.check_punct(punct);
        if found {
            self.advance();
        }
        found
    }

    pub fn skip_line_feeds(&mut self) {
        while matches!(self.current_kind(), TokenKind::LineFeed) {
            self.advance();
        }
    }

    /// Whether the tokens at the cursor form a parenthesised lambda
    /// parameter list followed by `=>`: `()`, `(a)` or `(a, b, ...)`.
    pub fn at_lambda_params(&self) -> bool {
        if !self.check_punct(Punct::LParen) {
            return false;
        }
        let mut i = 1;
        if !self.peek_kind(i).is_punct(Punct::RParen) {
            loop {
                if !matches!(self.peek_kind(i), TokenKind::Name(_)) {
                    return false;
                }
                i += 1;
                match self.peek_kind(i) {
                    kind if kind.is_operator(Operator::Comma) => i += 1,
                    kind if kind.is_punct(Punct::RParen) => break,
                    _ => return false,
                }
            }
        }
        self.peek_kind(i + 1).is_operator(Operator::Arrow)
    }
}
