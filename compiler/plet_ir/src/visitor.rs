//! AST visitor and free-variable analysis.
//!
//! Override `visit_node` to add behavior at specific nodes and call
//! [`walk_node`] to continue into children. The AST itself is immutable.

use rustc_hash::FxHashSet;

use crate::ast::{NodeId, NodeKind, NodeRange};
use crate::{NodeArena, Symbol};

pub trait Visitor {
    fn visit_node(&mut self, id: NodeId, arena: &NodeArena) {
        walk_node(self, id, arena);
    }

    fn visit_list(&mut self, range: NodeRange, arena: &NodeArena) {
        for &id in arena.list(range) {
            self.visit_node(id, arena);
        }
    }
}

/// Visit every direct child of `id`.
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, id: NodeId, arena: &NodeArena) {
    match arena.kind(id) {
        NodeKind::Text(_)
        | NodeKind::Nil
        | NodeKind::Bool(_)
        | NodeKind::Int(_)
        | NodeKind::Float(_)
        | NodeKind::String(_)
        | NodeKind::Symbol(_)
        | NodeKind::Name(_)
        | NodeKind::Break
        | NodeKind::Continue
        | NodeKind::Error
        | NodeKind::Return(None)
        | NodeKind::Export { value: None, .. } => {}

        NodeKind::Interpolation(list)
        | NodeKind::Array(list)
        | NodeKind::Object(list)
        | NodeKind::Block(list) => visitor.visit_list(*list, arena),

        NodeKind::Call { callee, args } => {
            visitor.visit_node(*callee, arena);
            visitor.visit_list(*args, arena);
        }
        NodeKind::Index { target, index } => {
            visitor.visit_node(*target, arena);
            visitor.visit_node(*index, arena);
        }
        NodeKind::Field { target, .. } => visitor.visit_node(*target, arena),
        NodeKind::Unary { operand, .. } => visitor.visit_node(*operand, arena),
        NodeKind::Binary { left, right, .. } => {
            visitor.visit_node(*left, arena);
            visitor.visit_node(*right, arena);
        }
        NodeKind::Conditional {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_node(*cond, arena);
            visitor.visit_node(*then_branch, arena);
            visitor.visit_node(*else_branch, arena);
        }
        NodeKind::Lambda { body, .. } => visitor.visit_node(*body, arena),
        NodeKind::Assign { target, value, .. } => {
            visitor.visit_node(*target, arena);
            visitor.visit_node(*value, arena);
        }
        NodeKind::If {
            cond,
            then_block,
            else_block,
        } => {
            visitor.visit_node(*cond, arena);
            visitor.visit_list(*then_block, arena);
            if let Some(else_block) = else_block {
                visitor.visit_list(*else_block, arena);
            }
        }
        NodeKind::For {
            collection, body, ..
        } => {
            visitor.visit_node(*collection, arena);
            visitor.visit_list(*body, arena);
        }
        NodeKind::Switch {
            subject,
            cases,
            default,
        } => {
            visitor.visit_node(*subject, arena);
            for case in arena.cases(*cases) {
                visitor.visit_list(case.values, arena);
                visitor.visit_list(case.body, arena);
            }
            if let Some(default) = default {
                visitor.visit_list(*default, arena);
            }
        }
        NodeKind::Export {
            value: Some(value), ..
        }
        | NodeKind::Return(Some(value)) => visitor.visit_node(*value, arena),
    }
}

/// Names bound inside a lambda body: assignment targets, loop variables and
/// exports. Nested lambdas are opaque.
struct BoundNames {
    bound: FxHashSet<Symbol>,
}

impl Visitor for BoundNames {
    fn visit_node(&mut self, id: NodeId, arena: &NodeArena) {
        match arena.kind(id) {
            NodeKind::Lambda { .. } => return,
            NodeKind::Assign { target, .. } => {
                if let NodeKind::Name(name) = arena.kind(*target) {
                    self.bound.insert(*name);
                }
            }
            NodeKind::For { key, value, .. } => {
                if let Some(key) = key {
                    self.bound.insert(*key);
                }
                self.bound.insert(*value);
            }
            NodeKind::Export { name, .. } => {
                self.bound.insert(*name);
            }
            _ => {}
        }
        walk_node(self, id, arena);
    }
}

/// Referenced names not in `bound`, in order of first appearance.
struct FreeNames<'a> {
    bound: &'a FxHashSet<Symbol>,
    seen: FxHashSet<Symbol>,
    free: Vec<Symbol>,
}

impl FreeNames<'_> {
    fn add(&mut self, name: Symbol) {
        if !self.bound.contains(&name) && self.seen.insert(name) {
            self.free.push(name);
        }
    }
}

impl Visitor for FreeNames<'_> {
    fn visit_node(&mut self, id: NodeId, arena: &NodeArena) {
        match arena.kind(id) {
            NodeKind::Name(name) => self.add(*name),
            // An inner lambda's free variables are already resolved; the
            // ones it does not bind itself must be captured from here.
            NodeKind::Lambda { free_variables, .. } => {
                for &name in arena.symbols(*free_variables) {
                    self.add(name);
                }
            }
            _ => walk_node(self, id, arena),
        }
    }
}

/// Compute the free variables of a lambda with `params` and `body`.
///
/// A name is free when it is referenced in the body but bound neither by a
/// parameter nor by an assignment, `for` or `export` inside the body.
/// Nested lambdas must already have their own free variables recorded.
pub fn free_variables(arena: &NodeArena, params: &[Symbol], body: NodeId) -> Vec<Symbol> {
    let mut bound = BoundNames {
        bound: params.iter().copied().collect(),
    };
    bound.visit_node(body, arena);

    let mut free = FreeNames {
        bound: &bound.bound,
        seen: FxHashSet::default(),
        free: Vec::new(),
    };
    free.visit_node(body, arena);
    free.free
}

#[cfg(test)]
mod tests;
