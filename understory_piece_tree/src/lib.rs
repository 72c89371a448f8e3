// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_piece_tree --heading-base-level=0

//! Understory Piece Tree: the model side of progressive diagram delivery.
//!
//! Large diagrams are not shipped to a viewer in one go. The viewer starts
//! from a root stub and asks the model source for one piece at a time; every
//! answer is a [`Piece`] whose direct children are placeholders that get
//! requested later. This crate holds the data model for those pieces and the
//! operation that splices an answer into the partially built tree.
//!
//! - [`PieceId`]: hierarchical id; an ancestor's id prefixes all descendant ids.
//! - [`PieceKind`]: node pieces carry [`NodeGeometry`]; everything else is
//!   an opaque, tagged leaf.
//! - [`Piece`]: id, kind, and children in sibling order.
//! - [`ModelTree`]: the live tree with a revision counter.
//! - [`patch`]: replaces the placeholder matching a fragment's id.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_piece_tree::{ModelTree, PatchOutcome, Piece};
//!
//! let a = Piece::node("$root$A", Point::ZERO, Size::new(100.0, 100.0));
//! let mut tree = ModelTree::new(Piece::root_stub().with_children([a.to_stub()]));
//!
//! // The model source answers the request for `$root$A` with its children.
//! let resolved = a.with_children([Piece::other("$root$A$label", "label")]);
//! assert_eq!(tree.patch(resolved), PatchOutcome::Replaced { depth: 1, index: 0 });
//! assert_eq!(tree.len(), 3);
//! ```
//!
//! Fragments whose placeholder no longer exists (for example because a newer
//! model replaced the tree while the request was in flight) are not an error:
//! [`patch`] hands them back in [`PatchOutcome::Dropped`] and leaves the tree
//! unchanged.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod piece;
mod tree;

pub use piece::{NodeGeometry, Piece, PieceId, PieceKind, ROOT_ID};
pub use tree::{ModelTree, PatchOutcome, patch};
