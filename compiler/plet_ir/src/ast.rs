//! AST node types.
//!
//! Nodes are stored flat in a [`NodeArena`](crate::NodeArena) and refer to
//! each other through [`NodeId`]s. Statement lists, arguments and object
//! entries are [`NodeRange`]s into the arena's list storage.

use crate::{Span, Symbol};
use std::fmt;

/// Index into a node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Range of node ids in the arena's flattened list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct NodeRange {
    pub start: u32,
    pub len: u32,
}

impl NodeRange {
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// Range of symbols (lambda parameters, free variables).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SymbolRange {
    pub start: u32,
    pub len: u32,
}

impl SymbolRange {
    pub const EMPTY: SymbolRange = SymbolRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Range of `switch` cases.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct CaseRange {
    pub start: u32,
    pub len: u32,
}

/// One `case` arm: the values it matches and the statements it runs.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Case {
    pub values: NodeRange,
    pub body: NodeRange,
    pub span: Span,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// Assignment operator. Compound forms read the current value first.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    /// Binary operator applied by a compound assignment.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Set => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
        }
    }
}

/// Node payload.
#[derive(Clone, PartialEq, Debug)]
pub enum NodeKind {
    /// Literal template output.
    Text(Box<[u8]>),

    // Literals
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Box<[u8]>),
    /// Bare-name object key.
    Symbol(Symbol),
    /// `"...{expr}..."`: statements rendered to a single string.
    Interpolation(NodeRange),

    // Expressions
    Name(Symbol),
    Array(NodeRange),
    /// Alternating key and value nodes.
    Object(NodeRange),
    Call {
        callee: NodeId,
        args: NodeRange,
    },
    Index {
        target: NodeId,
        index: NodeId,
    },
    Field {
        target: NodeId,
        name: Symbol,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    /// `cond ? then_branch : else_branch`
    Conditional {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    Lambda {
        params: SymbolRange,
        free_variables: SymbolRange,
        body: NodeId,
    },

    // Statements and block expressions
    Assign {
        target: NodeId,
        op: AssignOp,
        value: NodeId,
    },
    If {
        cond: NodeId,
        then_block: NodeRange,
        else_block: Option<NodeRange>,
    },
    For {
        key: Option<Symbol>,
        value: Symbol,
        collection: NodeId,
        body: NodeRange,
    },
    Switch {
        subject: NodeId,
        cases: CaseRange,
        default: Option<NodeRange>,
    },
    /// `do ... end`
    Block(NodeRange),
    Export {
        name: Symbol,
        value: Option<NodeId>,
    },
    Return(Option<NodeId>),
    Break,
    Continue,

    /// Placeholder left by error recovery.
    Error,
}

/// An AST node with its source span.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}
