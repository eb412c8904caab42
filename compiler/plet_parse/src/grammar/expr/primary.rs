//! Primary expressions: literals, names, strings and bracketed forms.

use plet_ir::{Keyword, NodeId, NodeKind, Operator, Punct, Symbol, TokenKind};

use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Int(value) => NodeKind::Int(*value),
            TokenKind::Float(value) => NodeKind::Float(*value),
            TokenKind::String(bytes) => NodeKind::String(bytes.clone()),
            TokenKind::Name(name) => match *name {
                Symbol::TRUE => NodeKind::Bool(true),
                Symbol::FALSE => NodeKind::Bool(false),
                Symbol::NIL => NodeKind::Nil,
                name => NodeKind::Name(name),
            },
            TokenKind::StartQuote => return self.parse_interpolation(),
            TokenKind::Punct(Punct::LBracket) => return self.parse_array(),
            TokenKind::Punct(Punct::LBrace) => return self.parse_object(),
            TokenKind::Punct(Punct::LParen) => return self.parse_parenthesized(),
            TokenKind::Keyword(Keyword::If) => return self.parse_if(),
            TokenKind::Keyword(Keyword::For) => return self.parse_for(),
            TokenKind::Keyword(Keyword::Switch) => return self.parse_switch(),
            TokenKind::Keyword(Keyword::Do) => return self.parse_do(),
            found => {
                return Err(ParseError::new(
                    span,
                    ParseErrorKind::ExpectedExpression {
                        found: found.describe(),
                    },
                ));
            }
        };
        self.cursor.advance();
        Ok(self.alloc(kind, span))
    }

    /// `"text{expr}text"`: the parts between the quotes are a statement
    /// list rendered to one string.
    fn parse_interpolation(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let parts = self.parse_block();
        if !matches!(self.cursor.current_kind(), TokenKind::EndQuote) {
            return Err(ParseError::expected(
                self.cursor.current_span(),
                "end of string",
                self.cursor.current_kind(),
                "string",
            ));
        }
        self.cursor.advance();
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Interpolation(parts), span))
    }

    fn parse_array(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let items = self.parse_comma_list(Punct::RBracket, "array")?;
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Array(items), span))
    }

    /// `{key: value, ...}` with name, keyword, string, integer or
    /// `(expr)` keys.
    fn parse_object(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let mut entries = Vec::new();
        while !self.cursor.check_punct(Punct::RBrace) {
            let key = self.parse_object_key()?;
            if !self.cursor.eat_operator(Operator::Colon) {
                return Err(ParseError::expected(
                    self.cursor.current_span(),
                    "':'",
                    self.cursor.current_kind(),
                    "object",
                ));
            }
            let value = self.parse_expr()?;
            entries.push(key);
            entries.push(value);
            if !self.cursor.eat_operator(Operator::Comma) {
                break;
            }
        }
        self.expect_punct(Punct::RBrace, "'}'", "object")?;
        let entries = self.arena.alloc_list(&entries);
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Object(entries), span))
    }

    fn parse_object_key(&mut self) -> Result<NodeId, ParseError> {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Name(name) => NodeKind::Symbol(*name),
            TokenKind::Keyword(keyword) => NodeKind::Symbol(self.keyword_symbol(*keyword)),
            TokenKind::String(bytes) => NodeKind::String(bytes.clone()),
            TokenKind::Int(value) => NodeKind::Int(*value),
            TokenKind::Punct(Punct::LParen) => return self.parse_parenthesized(),
            found => {
                return Err(ParseError::expected(span, "an object key", found, "object"));
            }
        };
        self.cursor.advance();
        Ok(self.alloc(kind, span))
    }

    fn parse_parenthesized(&mut self) -> Result<NodeId, ParseError> {
        self.cursor.advance();
        let inner = self.parse_expr()?;
        self.expect_punct(Punct::RParen, "')'", "parenthesized expression")?;
        Ok(inner)
    }
}
