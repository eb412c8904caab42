//! Postfix operators: call, index and field access.

use plet_ir::{NodeId, NodeKind, NodeRange, Operator, Punct, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = self.arena.span(expr);
            if self.cursor.eat_punct(Punct::LParen) {
                let args = self.parse_comma_list(Punct::RParen, "call")?;
                let span = self.span_from(start);
                expr = self.alloc(NodeKind::Call { callee: expr, args }, span);
            } else if self.cursor.eat_punct(Punct::LBracket) {
                let index = self.parse_expr()?;
                self.expect_punct(Punct::RBracket, "']'", "index")?;
                let span = self.span_from(start);
                expr = self.alloc(NodeKind::Index { target: expr, index }, span);
            } else if self.cursor.eat_operator(Operator::Dot) {
                let name = match *self.cursor.current_kind() {
                    TokenKind::Name(name) => name,
                    TokenKind::Keyword(keyword) => self.keyword_symbol(keyword),
                    _ => {
                        return Err(ParseError::expected(
                            self.cursor.current_span(),
                            "a field name",
                            self.cursor.current_kind(),
                            ".",
                        ));
                    }
                };
                self.cursor.advance();
                let span = self.span_from(start);
                expr = self.alloc(NodeKind::Field { target: expr, name }, span);
            } else {
                return Ok(expr);
            }
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    /// The opener has been consumed.
    pub(crate) fn parse_comma_list(
        &mut self,
        close: Punct,
        construct: &'static str,
    ) -> Result<NodeRange, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check_punct(close) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat_operator(Operator::Comma) {
                break;
            }
        }
        self.expect_punct(close, close_description(close), construct)?;
        Ok(self.arena.alloc_list(&items))
    }

    pub(crate) fn expect_punct(
        &mut self,
        punct: Punct,
        expected: &'static str,
        construct: &'static str,
    ) -> Result<(), ParseError> {
        if self.cursor.eat_punct(punct) {
            Ok(())
        } else {
            Err(ParseError::expected(
                self.cursor.current_span(),
                expected,
                self.cursor.current_kind(),
                construct,
            ))
        }
    }
}

fn close_description(punct: Punct) -> &'static str {
    match punct {
        Punct::RParen => "')'",
        Punct::RBracket => "']'",
        Punct::RBrace => "'}'",
        Punct::LParen => "'('",
        Punct::LBracket => "'['",
        Punct::LBrace => "'{'",
    }
}
