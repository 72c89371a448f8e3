// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for splicing fragments into a partially resolved model tree.

use kurbo::{Point, Size};
use understory_piece_tree::{ModelTree, PatchOutcome, Piece, PieceId};

fn node(id: &str) -> Piece {
    Piece::node(id, Point::new(5.0, 5.0), Size::new(40.0, 20.0))
}

fn count_id(piece: &Piece, id: &str) -> usize {
    let nested: usize = piece.children.iter().map(|c| count_id(c, id)).sum();
    usize::from(piece.id.as_str() == id) + nested
}

fn diagram() -> ModelTree {
    ModelTree::new(Piece::root_stub().with_children([
        node("$root$A").with_children([node("$root$A$1"), node("$root$A$2")]),
        Piece::other("$root$e0", "edge"),
        node("$root$B"),
    ]))
}

#[test]
fn patch_replaces_rather_than_appends() {
    let mut tree = diagram();
    let fragment = node("$root$A$2").with_children([node("$root$A$2$x"), node("$root$A$2$y")]);

    let outcome = tree.patch(fragment);

    assert_eq!(outcome, PatchOutcome::Replaced { depth: 2, index: 1 });
    assert_eq!(count_id(tree.root(), "$root$A$2"), 1);
    let a = &tree.root().children[0];
    assert_eq!(a.children.len(), 2);
    assert_eq!(a.children[1].id.as_str(), "$root$A$2");
    assert_eq!(a.children[1].children.len(), 2);
}

#[test]
fn patching_the_same_id_twice_keeps_a_single_child() {
    let mut tree = diagram();
    tree.patch(node("$root$B").with_children([node("$root$B$1")]));
    tree.patch(node("$root$B").with_children([node("$root$B$2")]));

    assert_eq!(count_id(tree.root(), "$root$B"), 1);
    let b = tree.find(&PieceId::new("$root$B")).unwrap();
    assert_eq!(b.children[0].id.as_str(), "$root$B$2");
    assert_eq!(tree.revision(), 2);
}

#[test]
fn unmatched_fragment_leaves_tree_unchanged() {
    let mut tree = diagram();
    let before = tree.root().clone();

    let outcome = tree.patch(node("$root$C$9"));

    assert!(matches!(outcome, PatchOutcome::Dropped(ref p) if p.id.as_str() == "$root$C$9"));
    assert_eq!(tree.root(), &before);
    assert_eq!(tree.revision(), 0);
}

#[test]
fn non_node_pieces_are_patchable_too() {
    let mut tree = diagram();
    let edge =
        Piece::other("$root$e0", "edge").with_children([Piece::other("$root$e0$l", "label")]);

    assert_eq!(tree.patch(edge), PatchOutcome::Replaced { depth: 1, index: 1 });
    assert_eq!(tree.len(), 7);
}
