use super::*;
use crate::ast::{AssignOp, BinaryOp};
use crate::{Span, SymbolTable};
use pretty_assertions::assert_eq;

fn name(arena: &mut NodeArena, symbol: Symbol) -> NodeId {
    arena.alloc(NodeKind::Name(symbol), Span::DUMMY)
}

#[test]
fn test_params_are_not_free() {
    let symbols = SymbolTable::new();
    let x = symbols.intern("x");
    let y = symbols.intern("y");
    let mut arena = NodeArena::new();
    let left = name(&mut arena, x);
    let right = name(&mut arena, y);
    let body = arena.alloc(
        NodeKind::Binary {
            op: BinaryOp::Add,
            left,
            right,
        },
        Span::DUMMY,
    );
    assert_eq!(free_variables(&arena, &[x], body), vec![y]);
}

#[test]
fn test_assigned_and_loop_names_are_bound() {
    let symbols = SymbolTable::new();
    let total = symbols.intern("total");
    let item = symbols.intern("item");
    let items = symbols.intern("items");
    let mut arena = NodeArena::new();

    let target = name(&mut arena, total);
    let value = name(&mut arena, item);
    let assign = arena.alloc(
        NodeKind::Assign {
            target,
            op: AssignOp::Add,
            value,
        },
        Span::DUMMY,
    );
    let body = arena.alloc_list(&[assign]);
    let collection = name(&mut arena, items);
    let for_node = arena.alloc(
        NodeKind::For {
            key: None,
            value: item,
            collection,
            body,
        },
        Span::DUMMY,
    );
    let block = arena.alloc_list(&[for_node]);
    let block = arena.alloc(NodeKind::Block(block), Span::DUMMY);

    assert_eq!(free_variables(&arena, &[], block), vec![items]);
}

#[test]
fn test_nested_lambda_contributes_its_free_variables() {
    let symbols = SymbolTable::new();
    let a = symbols.intern("a");
    let b = symbols.intern("b");
    let c = symbols.intern("c");
    let mut arena = NodeArena::new();

    // inner: b => a + c, free [a, c]
    let inner_body = name(&mut arena, a);
    let params = arena.alloc_symbols(&[b]);
    let free = arena.alloc_symbols(&[a, c]);
    let inner = arena.alloc(
        NodeKind::Lambda {
            params,
            free_variables: free,
            body: inner_body,
        },
        Span::DUMMY,
    );

    // outer: a => inner
    assert_eq!(free_variables(&arena, &[a], inner), vec![c]);
}

#[test]
fn test_free_names_are_deduplicated_in_order() {
    let symbols = SymbolTable::new();
    let f = symbols.intern("f");
    let x = symbols.intern("x");
    let mut arena = NodeArena::new();
    let callee = name(&mut arena, f);
    let first = name(&mut arena, x);
    let second = name(&mut arena, x);
    let args = arena.alloc_list(&[first, second]);
    let call = arena.alloc(NodeKind::Call { callee, args }, Span::DUMMY);
    assert_eq!(free_variables(&arena, &[], call), vec![f, x]);
}
