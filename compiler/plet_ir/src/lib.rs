//! Plet IR: the data shared by every stage of the template engine.
//!
//! - Positions and spans
//! - Symbols and the symbol table
//! - Tokens produced by the reader
//! - The flat AST arena and its node kinds
//! - Free-variable analysis for lambdas
//!
//! # Design
//!
//! - **Intern names**: strings become `Symbol(u32)`.
//! - **Flatten the tree**: nodes refer to each other by `NodeId(u32)`, lists
//!   are ranges into shared storage.

mod arena;
pub mod ast;
mod span;
mod symbol;
mod token;
pub mod visitor;

pub use arena::{Ast, NodeArena};
pub use ast::{
    AssignOp, BinaryOp, Case, CaseRange, Node, NodeId, NodeKind, NodeRange, SymbolRange, UnaryOp,
};
pub use span::{Pos, Span};
pub use symbol::{Symbol, SymbolTable};
pub use token::{Keyword, Operator, Punct, Token, TokenFlags, TokenKind};
