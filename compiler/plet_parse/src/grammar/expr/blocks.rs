//! Block expressions: `if`, `for`, `switch` and `do`.
//!
//! Each one is usable both as a statement (`{if c then}...{end}` in a
//! template) and inside an expression (`x = if c then 1 else 2 end`).

use plet_ir::{Case, Keyword, NodeId, NodeKind, Operator, Span, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `if c then ... [else if c then ...]* [else ...] end`
    pub(crate) fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        self.parse_if_tail(start)
    }

    /// Everything after `if`. An `else if` chain nests one `If` node per
    /// branch, all closed by a single `end`.
    fn parse_if_tail(&mut self, start: Span) -> Result<NodeId, ParseError> {
        let cond = self.parse_expr()?;
        self.expect_keyword(Keyword::Then, "'then'", "if");
        let then_block = self.parse_block();

        let else_block = if self.cursor.eat_keyword(Keyword::Else) {
            if self.cursor.check_keyword(Keyword::If) {
                let nested_start = self.cursor.current_span();
                self.cursor.advance();
                let nested = self.parse_if_tail(nested_start)?;
                Some(self.arena.alloc_list(&[nested]))
            } else {
                let block = self.parse_block();
                self.expect_end("if");
                Some(block)
            }
        } else {
            self.expect_end("if");
            None
        };

        let span = self.span_from(start);
        Ok(self.alloc(
            NodeKind::If {
                cond,
                then_block,
                else_block,
            },
            span,
        ))
    }

    /// `for [k,] v in expr do ... end`
    pub(crate) fn parse_for(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();

        let first = self.expect_loop_variable()?;
        let (key, value) = if self.cursor.eat_operator(Operator::Comma) {
            (Some(first), self.expect_loop_variable()?)
        } else {
            (None, first)
        };
        if !self.cursor.eat_keyword(Keyword::In) {
            return Err(ParseError::expected(
                self.cursor.current_span(),
                "'in'",
                self.cursor.current_kind(),
                "for",
            ));
        }
        let collection = self.parse_expr()?;
        self.expect_keyword(Keyword::Do, "'do'", "for");

        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        self.expect_end("for");

        let span = self.span_from(start);
        Ok(self.alloc(
            NodeKind::For {
                key,
                value,
                collection,
                body,
            },
            span,
        ))
    }

    fn expect_loop_variable(&mut self) -> Result<plet_ir::Symbol, ParseError> {
        if let TokenKind::Name(name) = *self.cursor.current_kind() {
            self.cursor.advance();
            Ok(name)
        } else {
            Err(ParseError::expected(
                self.cursor.current_span(),
                "a loop variable",
                self.cursor.current_kind(),
                "for",
            ))
        }
    }

    /// `switch expr case e[, e]* ... default ... end`
    pub(crate) fn parse_switch(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let subject = self.parse_expr()?;
        self.skip_switch_padding();

        let mut cases = Vec::new();
        while self.cursor.check_keyword(Keyword::Case) {
            let case_start = self.cursor.current_span();
            self.cursor.advance();
            let mut values = vec![self.parse_expr()?];
            while self.cursor.eat_operator(Operator::Comma) {
                values.push(self.parse_expr()?);
            }
            let values = self.arena.alloc_list(&values);
            let body = self.parse_block();
            cases.push(Case {
                values,
                body,
                span: self.span_from(case_start),
            });
        }
        let default = if self.cursor.eat_keyword(Keyword::Default) {
            Some(self.parse_block())
        } else {
            None
        };
        self.expect_end("switch");

        let cases = self.arena.alloc_cases(&cases);
        let span = self.span_from(start);
        Ok(self.alloc(
            NodeKind::Switch {
                subject,
                cases,
                default,
            },
            span,
        ))
    }

    /// Line feeds and whitespace-only text between `switch` and its first
    /// `case` produce no output.
    fn skip_switch_padding(&mut self) {
        loop {
            match self.cursor.current_kind() {
                TokenKind::LineFeed => {}
                TokenKind::Text(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {}
                _ => return,
            }
            self.cursor.advance();
        }
    }

    /// `do ... end`
    pub(crate) fn parse_do(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let body = self.parse_block();
        self.expect_end("do");
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Block(body), span))
    }
}
