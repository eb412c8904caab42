//! Statements and statement lists.

use plet_ir::{AssignOp, Keyword, NodeId, NodeKind, NodeRange, Operator, TokenKind};
use plet_stack::ensure_sufficient_stack;

use crate::recovery::{synchronize, BLOCK_END, STMT_BOUNDARY};
use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    /// Top-level statement list. Stray block keywords are reported and
    /// skipped.
    pub(crate) fn parse_top_level(&mut self) -> NodeRange {
        let mut stmts = Vec::new();
        loop {
            self.parse_statements_into(&mut stmts);
            if self.cursor.is_at_end() || self.halted() {
                break;
            }
            let span = self.cursor.current_span();
            let found = self.cursor.current_kind();
            self.report(ParseError::unexpected(span, found));
            self.cursor.advance();
        }
        self.arena.alloc_list(&stmts)
    }

    /// Statements up to a block keyword, an end quote or end of input.
    pub(crate) fn parse_block(&mut self) -> NodeRange {
        let mut stmts = Vec::new();
        self.parse_statements_into(&mut stmts);
        self.arena.alloc_list(&stmts)
    }

    fn parse_statements_into(&mut self, stmts: &mut Vec<NodeId>) {
        loop {
            self.cursor.skip_line_feeds();
            let kind = self.cursor.current_kind();
            if self.halted()
                || matches!(kind, TokenKind::Eof | TokenKind::EndQuote)
                || BLOCK_END.contains(kind)
            {
                return;
            }

            let before = self.cursor.position();
            let errors_before = self.error_count;
            match self.parse_statement() {
                Ok(Some(stmt)) => stmts.push(stmt),
                Ok(None) => {}
                Err(error) => {
                    let span = error.span;
                    self.report(error);
                    stmts.push(self.alloc(NodeKind::Error, span));
                }
            }

            if self.error_count > errors_before {
                synchronize(&mut self.cursor, STMT_BOUNDARY);
            } else if !self.at_statement_end() {
                let span = self.cursor.current_span();
                let found = self.cursor.current_kind();
                self.report(ParseError::unexpected(span, found));
                synchronize(&mut self.cursor, STMT_BOUNDARY);
            }
            if self.cursor.position() == before {
                self.cursor.advance();
            }
        }
    }

    /// Whether the token after a statement lets another statement follow.
    /// Statements inside brackets have no line feeds between them, so any
    /// token that can start a statement is accepted too.
    fn at_statement_end(&self) -> bool {
        let kind = self.cursor.current_kind();
        STMT_BOUNDARY.contains(kind) || starts_statement(kind)
    }

    /// One statement. `Ok(None)` for an empty text separator.
    fn parse_statement(&mut self) -> Result<Option<NodeId>, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Option<NodeId>, ParseError> {
        let start = self.cursor.current_span();
        let stmt = match self.cursor.current_kind() {
            TokenKind::Text(bytes) => {
                self.cursor.advance();
                if bytes.is_empty() {
                    return Ok(None);
                }
                self.alloc(NodeKind::Text(bytes.clone()), start)
            }
            TokenKind::Keyword(Keyword::Export) => {
                self.cursor.advance();
                self.parse_export(start)?
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.cursor.advance();
                let value = if STMT_BOUNDARY.contains(self.cursor.current_kind()) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                let span = self.span_from(start);
                self.alloc(NodeKind::Return(value), span)
            }
            TokenKind::Keyword(keyword @ (Keyword::Break | Keyword::Continue)) => {
                let keyword = *keyword;
                self.cursor.advance();
                if self.loop_depth == 0 {
                    return Err(ParseError::new(
                        start,
                        ParseErrorKind::OutsideLoop {
                            keyword: keyword.as_str(),
                        },
                    ));
                }
                let kind = if keyword == Keyword::Break {
                    NodeKind::Break
                } else {
                    NodeKind::Continue
                };
                self.alloc(kind, start)
            }
            _ => self.parse_expr_statement()?,
        };
        Ok(Some(stmt))
    }

    /// `export name [= expr]`
    fn parse_export(&mut self, start: plet_ir::Span) -> Result<NodeId, ParseError> {
        let TokenKind::Name(name) = *self.cursor.current_kind() else {
            return Err(ParseError::expected(
                self.cursor.current_span(),
                "a name",
                self.cursor.current_kind(),
                "export",
            ));
        };
        self.cursor.advance();
        let value = if self.cursor.eat_operator(Operator::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Export { name, value }, span))
    }

    /// An expression, or an assignment when an assignment operator follows.
    fn parse_expr_statement(&mut self) -> Result<NodeId, ParseError> {
        let target = self.parse_expr()?;
        let Some(op) = self.match_assign_op() else {
            return Ok(target);
        };
        if !matches!(
            self.arena.kind(target),
            NodeKind::Name(_) | NodeKind::Field { .. } | NodeKind::Index { .. }
        ) {
            return Err(ParseError::new(
                self.arena.span(target),
                ParseErrorKind::InvalidAssignTarget,
            ));
        }
        self.cursor.advance();
        let value = self.parse_expr()?;
        let span = self.arena.span(target).merge(self.arena.span(value));
        Ok(self.alloc(NodeKind::Assign { target, op, value }, span))
    }

    fn match_assign_op(&self) -> Option<AssignOp> {
        match self.cursor.current_kind() {
            TokenKind::Operator(Operator::Assign) => Some(AssignOp::Set),
            TokenKind::Operator(Operator::PlusAssign) => Some(AssignOp::Add),
            TokenKind::Operator(Operator::MinusAssign) => Some(AssignOp::Sub),
            TokenKind::Operator(Operator::StarAssign) => Some(AssignOp::Mul),
            TokenKind::Operator(Operator::SlashAssign) => Some(AssignOp::Div),
            _ => None,
        }
    }
}

/// Whether `kind` can begin a statement.
pub(crate) fn starts_statement(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Keyword(keyword) => matches!(
            keyword,
            Keyword::Export
                | Keyword::Return
                | Keyword::Break
                | Keyword::Continue
                | Keyword::If
                | Keyword::For
                | Keyword::Switch
                | Keyword::Do
                | Keyword::Not
        ),
        TokenKind::Operator(op) => matches!(op, Operator::Minus | Operator::Plus),
        TokenKind::Punct(punct) => matches!(
            punct,
            plet_ir::Punct::LParen | plet_ir::Punct::LBracket | plet_ir::Punct::LBrace
        ),
        TokenKind::Name(_)
        | TokenKind::Int(_)
        | TokenKind::Float(_)
        | TokenKind::String(_)
        | TokenKind::Text(_)
        | TokenKind::StartQuote => true,
        TokenKind::LineFeed | TokenKind::EndQuote | TokenKind::Eof => false,
    }
}
