// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live model tree and fragment patching.

use smallvec::SmallVec;

use crate::piece::{Piece, PieceId};

/// Child-index path from a tree root down to a placeholder.
type PiecePath = SmallVec<[usize; 8]>;

/// Result of splicing a fragment into a tree.
#[derive(Clone, Debug, PartialEq)]
pub enum PatchOutcome {
    /// The placeholder was found and replaced in place.
    Replaced {
        /// Depth of the replaced piece below the root (direct children are at depth 1).
        depth: usize,
        /// Sibling index of the replaced piece within its parent.
        index: usize,
    },
    /// The fragment's id was the root's id; the whole root was replaced.
    ReplacedRoot,
    /// No placeholder with the fragment's id exists; the fragment is handed back.
    Dropped(Piece),
}

impl PatchOutcome {
    /// Returns `true` if the fragment ended up in the tree.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Dropped(_))
    }
}

/// Splices `fragment` into the tree below `root`, replacing the placeholder
/// with the same id.
///
/// The search is depth-first. At every level the direct children are checked
/// for an exact id match first; only if none matches does the search descend,
/// and then only into children whose id is a prefix of the fragment's id.
/// The replacement keeps the placeholder's sibling index.
///
/// `root` itself is never matched, see [`ModelTree::patch`] for root
/// replacement. A fragment with no matching placeholder is returned in
/// [`PatchOutcome::Dropped`] and `root` is left untouched.
pub fn patch(root: &mut Piece, fragment: Piece) -> PatchOutcome {
    let mut path = PiecePath::new();
    if !find_placeholder(root, &fragment.id, &mut path) {
        return PatchOutcome::Dropped(fragment);
    }
    let Some((&index, ancestors)) = path.split_last() else {
        return PatchOutcome::Dropped(fragment);
    };
    let mut parent = root;
    for &i in ancestors {
        parent = &mut parent.children[i];
    }
    parent.children[index] = fragment;
    PatchOutcome::Replaced {
        depth: path.len(),
        index,
    }
}

fn find_placeholder(parent: &Piece, id: &PieceId, path: &mut PiecePath) -> bool {
    if let Some(index) = parent.children.iter().position(|child| child.id == *id) {
        path.push(index);
        return true;
    }
    for (index, child) in parent.children.iter().enumerate() {
        if !child.id.is_prefix_of(id) {
            continue;
        }
        path.push(index);
        if find_placeholder(child, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// The partially resolved diagram model.
///
/// `ModelTree` owns the root piece and tracks a monotonically increasing
/// revision that bumps on every applied patch, so views can cheaply tell
/// whether they need to re-render.
#[derive(Clone, Debug)]
pub struct ModelTree {
    root: Piece,
    revision: u64,
}

impl ModelTree {
    /// Creates a tree from its root piece, usually a childless stub.
    #[must_use]
    pub fn new(root: Piece) -> Self {
        Self { root, revision: 0 }
    }

    /// Returns the root piece.
    #[must_use]
    pub fn root(&self) -> &Piece {
        &self.root
    }

    /// Returns the id of the root piece.
    #[must_use]
    pub fn root_id(&self) -> &PieceId {
        &self.root.id
    }

    /// Returns the current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Counts all pieces currently in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Finds a piece by id, using the same prefix-bounded search as [`patch`].
    #[must_use]
    pub fn find(&self, id: &PieceId) -> Option<&Piece> {
        if self.root.id == *id {
            return Some(&self.root);
        }
        let mut path = PiecePath::new();
        if !find_placeholder(&self.root, id, &mut path) {
            return None;
        }
        let mut piece = &self.root;
        for &i in &path {
            piece = &piece.children[i];
        }
        Some(piece)
    }

    /// Splices a received fragment into the tree.
    ///
    /// A fragment carrying the root's id replaces the root; anything else is
    /// handled by [`patch`]. The revision bumps only if the tree changed.
    pub fn patch(&mut self, fragment: Piece) -> PatchOutcome {
        let outcome = if fragment.id == self.root.id {
            self.root = fragment;
            PatchOutcome::ReplacedRoot
        } else {
            patch(&mut self.root, fragment)
        };
        if outcome.is_applied() {
            self.revision += 1;
        }
        outcome
    }

    /// Consumes the tree and returns its root.
    #[must_use]
    pub fn into_root(self) -> Piece {
        self.root
    }
}
