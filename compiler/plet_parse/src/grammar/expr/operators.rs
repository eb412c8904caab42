//! Operator matching helpers.

use plet_ir::{BinaryOp, Operator, TokenKind, UnaryOp};

use crate::Parser;

impl Parser<'_> {
    pub(crate) fn match_comparison_op(&self) -> Option<BinaryOp> {
        match self.cursor.current_kind() {
            TokenKind::Operator(Operator::Eq) => Some(BinaryOp::Eq),
            TokenKind::Operator(Operator::NotEq) => Some(BinaryOp::NotEq),
            TokenKind::Operator(Operator::Lt) => Some(BinaryOp::Lt),
            TokenKind::Operator(Operator::LtEq) => Some(BinaryOp::LtEq),
            TokenKind::Operator(Operator::Gt) => Some(BinaryOp::Gt),
            TokenKind::Operator(Operator::GtEq) => Some(BinaryOp::GtEq),
            _ => None,
        }
    }

    pub(crate) fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.cursor.current_kind() {
            TokenKind::Operator(Operator::Plus) => Some(BinaryOp::Add),
            TokenKind::Operator(Operator::Minus) => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    pub(crate) fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.cursor.current_kind() {
            TokenKind::Operator(Operator::Star) => Some(BinaryOp::Mul),
            TokenKind::Operator(Operator::Slash) => Some(BinaryOp::Div),
            TokenKind::Operator(Operator::Percent) => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    pub(crate) fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.cursor.current_kind() {
            TokenKind::Operator(Operator::Minus) => Some(UnaryOp::Neg),
            TokenKind::Operator(Operator::Plus) => Some(UnaryOp::Plus),
            _ => None,
        }
    }
}
