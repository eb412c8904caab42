//! Flat storage for AST nodes.

use std::path::Path;
use std::rc::Rc;

use crate::ast::{Case, CaseRange, Node, NodeId, NodeKind, NodeRange, SymbolRange};
use crate::{Span, Symbol};

/// Convert a length to `u32`.
///
/// # Panics
/// Panics if the arena grows beyond `u32::MAX` entries.
#[inline]
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("{what} arena exceeded {} entries", u32::MAX))
}

/// Arena holding every node of one parsed file.
///
/// # Index Spaces
///
/// - `nodes`: indexed by [`NodeId`]
/// - `lists`: flat `Vec<NodeId>` indexed by [`NodeRange`]
/// - `symbols`: indexed by [`SymbolRange`]
/// - `cases`: indexed by [`CaseRange`]
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    lists: Vec<NodeId>,
    symbols: Vec<Symbol>,
    cases: Vec<Case>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate based on source length (~1 node per 8 bytes).
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated = source_len / 8;
        NodeArena {
            nodes: Vec::with_capacity(estimated),
            lists: Vec::with_capacity(estimated / 2),
            symbols: Vec::new(),
            cases: Vec::new(),
        }
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(to_u32(self.nodes.len(), "node"));
        self.nodes.push(Node { kind, span });
        id
    }

    pub fn alloc_list(&mut self, ids: &[NodeId]) -> NodeRange {
        let start = to_u32(self.lists.len(), "list");
        self.lists.extend_from_slice(ids);
        NodeRange {
            start,
            len: to_u32(ids.len(), "list"),
        }
    }

    pub fn alloc_symbols(&mut self, symbols: &[Symbol]) -> SymbolRange {
        let start = to_u32(self.symbols.len(), "symbol");
        self.symbols.extend_from_slice(symbols);
        SymbolRange {
            start,
            len: to_u32(symbols.len(), "symbol"),
        }
    }

    pub fn alloc_cases(&mut self, cases: &[Case]) -> CaseRange {
        let start = to_u32(self.cases.len(), "case");
        self.cases.extend_from_slice(cases);
        CaseRange {
            start,
            len: to_u32(cases.len(), "case"),
        }
    }

    /// Replace a node's kind in place. Used by the parser to patch lambdas
    /// once their free variables are known.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    #[inline]
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len as usize]
    }

    #[inline]
    pub fn symbols(&self, range: SymbolRange) -> &[Symbol] {
        let start = range.start as usize;
        &self.symbols[start..start + range.len as usize]
    }

    #[inline]
    pub fn cases(&self, range: CaseRange) -> &[Case] {
        let start = range.start as usize;
        &self.cases[start..start + range.len as usize]
    }

    /// Number of nodes allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A parsed file: its node arena, top-level statements and path.
///
/// Immutable once built. Closures and modules share it through `Rc<Ast>`.
#[derive(Debug)]
pub struct Ast {
    arena: NodeArena,
    root: NodeRange,
    file: Rc<Path>,
}

impl Ast {
    pub fn new(arena: NodeArena, root: NodeRange, file: Rc<Path>) -> Self {
        Ast { arena, root, file }
    }

    #[inline]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Top-level statement list.
    #[inline]
    pub fn root(&self) -> NodeRange {
        self.root
    }

    #[inline]
    pub fn file(&self) -> &Rc<Path> {
        &self.file
    }
}

#[cfg(test)]
mod tests;
