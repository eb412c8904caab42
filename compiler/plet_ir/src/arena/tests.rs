use super::*;
use crate::Pos;

fn span(offset: u32) -> Span {
    Span::point(Pos::new(offset, 1, offset + 1))
}

#[test]
fn test_alloc_and_get() {
    let mut arena = NodeArena::new();
    let a = arena.alloc(NodeKind::Int(1), span(0));
    let b = arena.alloc(NodeKind::Int(2), span(2));
    assert_eq!(arena.kind(a), &NodeKind::Int(1));
    assert_eq!(arena.span(b), span(2));
    assert_eq!(arena.len(), 2);
}

#[test]
fn test_lists_are_independent() {
    let mut arena = NodeArena::new();
    let a = arena.alloc(NodeKind::Nil, span(0));
    let b = arena.alloc(NodeKind::Bool(true), span(1));
    let first = arena.alloc_list(&[a, b]);
    let second = arena.alloc_list(&[b]);
    let empty = arena.alloc_list(&[]);
    assert_eq!(arena.list(first), &[a, b]);
    assert_eq!(arena.list(second), &[b]);
    assert!(arena.list(empty).is_empty());
}

#[test]
fn test_set_kind_patches_node() {
    let mut arena = NodeArena::new();
    let id = arena.alloc(NodeKind::Error, span(0));
    arena.set_kind(id, NodeKind::Break);
    assert_eq!(arena.kind(id), &NodeKind::Break);
}
