use super::*;

enum Nested {
    Leaf(u32),
    Wrap(Box<Nested>),
}

fn depth(node: &Nested) -> u32 {
    ensure_sufficient_stack(|| match node {
        Nested::Leaf(n) => *n,
        Nested::Wrap(inner) => depth(inner) + 1,
    })
}

fn build(levels: u32) -> Nested {
    let mut node = Nested::Leaf(0);
    for _ in 0..levels {
        node = Nested::Wrap(Box::new(node));
    }
    node
}

#[test]
fn test_shallow_nesting() {
    assert_eq!(depth(&build(3)), 3);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let tree = build(200_000);
    assert_eq!(depth(&tree), 200_000);
    // Drop iteratively; the default recursive drop would overflow.
    let mut node = tree;
    while let Nested::Wrap(inner) = node {
        node = *inner;
    }
}

#[test]
fn test_passes_through_result() {
    let result: Result<u8, String> = ensure_sufficient_stack(|| Err("no".to_owned()));
    assert_eq!(result, Err("no".to_owned()));
}
