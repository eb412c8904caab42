//! Expression parsing.
//!
//! - `mod.rs`: entry point (`parse_expr`), lambdas, pipes and the binary
//!   precedence chain
//! - `operators.rs`: operator matching helpers
//! - `postfix.rs`: call, index and field access
//! - `primary.rs`: literals, names, strings, arrays, objects, parentheses
//! - `blocks.rs`: `if`, `for`, `switch` and `do`

mod blocks;
mod operators;
mod postfix;
mod primary;

use plet_ir::{BinaryOp, Keyword, NodeId, NodeKind, Operator, Punct, Symbol, TokenKind, UnaryOp};
use plet_ir::visitor::free_variables;
use plet_stack::ensure_sufficient_stack;

use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    /// Parse an expression.
    ///
    /// Uses `ensure_sufficient_stack` to prevent stack overflow
    /// on deeply nested expressions.
    pub(crate) fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> Result<NodeId, ParseError> {
        if self.at_lambda() {
            return self.parse_lambda();
        }
        self.parse_pipe()
    }

    fn at_lambda(&self) -> bool {
        match self.cursor.current_kind() {
            TokenKind::Name(_) => self.cursor.peek_kind(1).is_operator(Operator::Arrow),
            _ => self.cursor.at_lambda_params(),
        }
    }

    /// `x => e`, `(a, b) => e` or `() => e`.
    fn parse_lambda(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let mut params = Vec::new();
        if let TokenKind::Name(name) = *self.cursor.current_kind() {
            self.cursor.advance();
            params.push(name);
        } else {
            // Shape already checked by `at_lambda_params`.
            self.cursor.advance();
            while let TokenKind::Name(name) = *self.cursor.current_kind() {
                self.cursor.advance();
                params.push(name);
                self.cursor.eat_operator(Operator::Comma);
            }
            self.cursor.eat_punct(Punct::RParen);
        }
        self.cursor.eat_operator(Operator::Arrow);

        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.parse_expr();
        self.loop_depth = outer_loops;
        let body = body?;

        let free = free_variables(&self.arena, &params, body);
        let params = self.arena.alloc_symbols(&params);
        let free_variables = self.arena.alloc_symbols(&free);
        let span = self.span_from(start);
        Ok(self.alloc(
            NodeKind::Lambda {
                params,
                free_variables,
                body,
            },
            span,
        ))
    }

    /// `a | f(b)` is `f(a, b)`; `a | f` is `f(a)`.
    fn parse_pipe(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_conditional()?;
        while self.cursor.eat_operator(Operator::Pipe) {
            let rhs = self.parse_postfix()?;
            let span = self.arena.span(left).merge(self.arena.span(rhs));
            left = match *self.arena.kind(rhs) {
                NodeKind::Call { callee, args } => {
                    let mut all = Vec::with_capacity(args.len() + 1);
                    all.push(left);
                    all.extend_from_slice(self.arena.list(args));
                    let args = self.arena.alloc_list(&all);
                    self.arena.set_kind(rhs, NodeKind::Call { callee, args });
                    rhs
                }
                _ => {
                    let args = self.arena.alloc_list(&[left]);
                    self.alloc(NodeKind::Call { callee: rhs, args }, span)
                }
            };
        }
        Ok(left)
    }

    /// `c ? a : b`, right-associative.
    fn parse_conditional(&mut self) -> Result<NodeId, ParseError> {
        let cond = self.parse_or()?;
        if !self.cursor.eat_operator(Operator::Question) {
            return Ok(cond);
        }
        let then_branch = self.parse_conditional()?;
        if !self.cursor.eat_operator(Operator::Colon) {
            return Err(ParseError::expected(
                self.cursor.current_span(),
                "':'",
                self.cursor.current_kind(),
                "?",
            ));
        }
        let else_branch = self.parse_conditional()?;
        let span = self.arena.span(cond).merge(self.arena.span(else_branch));
        Ok(self.alloc(
            NodeKind::Conditional {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_or(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_and()?;
        while self.cursor.eat_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_not()?;
        while self.cursor.eat_keyword(Keyword::And) {
            let right = self.parse_not()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        if self.cursor.eat_keyword(Keyword::Not) {
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            let span = self.span_from(start);
            return Ok(self.alloc(
                NodeKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                span,
            ));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_comparison_op() {
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.cursor.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        if let Some(op) = self.match_unary_op() {
            self.cursor.advance();
            let operand = ensure_sufficient_stack(|| self.parse_unary())?;
            let span = self.span_from(start);
            return Ok(self.alloc(NodeKind::Unary { op, operand }, span));
        }
        self.parse_postfix()
    }

    fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        let span = self.arena.span(left).merge(self.arena.span(right));
        self.alloc(NodeKind::Binary { op, left, right }, span)
    }

    /// Intern the text of a keyword used where a name is expected
    /// (field names, object keys).
    fn keyword_symbol(&self, keyword: Keyword) -> Symbol {
        self.symbols.intern(keyword.as_str())
    }

    /// Report a missing closing keyword without failing the construct.
    fn expect_keyword(&mut self, keyword: Keyword, expected: &'static str, construct: &'static str) {
        if !self.cursor.eat_keyword(keyword) {
            let span = self.cursor.current_span();
            let found = self.cursor.current_kind();
            self.report(ParseError::expected(span, expected, found, construct));
        }
    }

    /// Consume `end`, or report the construct as unclosed.
    fn expect_end(&mut self, construct: &'static str) {
        if !self.cursor.eat_keyword(Keyword::End) {
            let span = self.cursor.current_span();
            let found = self.cursor.current_kind().describe();
            self.report(ParseError::new(
                span,
                ParseErrorKind::Unclosed { construct, found },
            ));
        }
    }
}
