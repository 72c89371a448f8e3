// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Piece identifiers, kinds, and the piece node itself.

use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use kurbo::{Point, Rect, Size};

/// Id of the synthetic piece standing for the root of a diagram.
pub const ROOT_ID: &str = "$root";

/// Hierarchical identifier of a diagram piece.
///
/// Child ids are built by appending to their ancestor's id, so an ancestor's
/// id is always a string prefix of every descendant's id. The patcher relies
/// on this to bound its search.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PieceId(String);

impl PieceId {
    /// Creates an id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id of the synthetic diagram root, see [`ROOT_ID`].
    #[must_use]
    pub fn root() -> Self {
        Self::new(ROOT_ID)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `self` is a string prefix of `other`.
    ///
    /// Equal ids count as prefixes of each other.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(self.0.as_str())
    }
}

impl Borrow<str> for PieceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PieceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PieceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PieceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parent-relative placement of a node piece.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeGeometry {
    /// Position relative to the parent node's origin.
    pub position: Point,
    /// Size of the node.
    pub size: Size,
}

impl NodeGeometry {
    /// Creates geometry from a parent-relative position and a size.
    #[must_use]
    pub const fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    /// Returns the parent-relative bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Returns the center of a node whose origin sits at `origin`.
    #[must_use]
    pub fn center_at(&self, origin: Point) -> Point {
        origin + self.size.to_vec2() * 0.5
    }
}

/// What a piece is.
///
/// Only [`PieceKind::Node`] pieces have a place on the canvas; every other
/// kind is an opaque leaf as far as piece ordering is concerned.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    /// A node with parent-relative geometry.
    Node(NodeGeometry),
    /// Any other element (graph root, edge, label, port, ...), tagged with its type name.
    Other(String),
}

impl PieceKind {
    /// Returns the node geometry for node pieces.
    #[must_use]
    pub fn node(&self) -> Option<&NodeGeometry> {
        match self {
            Self::Node(geometry) => Some(geometry),
            Self::Other(_) => None,
        }
    }

    /// Returns the type tag, `"node"` for node pieces.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Node(_) => "node",
            Self::Other(tag) => tag,
        }
    }
}

/// A fragment of the diagram model tree.
///
/// A piece received from the model source carries its direct children as
/// placeholders: they have an id and a kind (with geometry for nodes) but
/// their own children are not known until they are requested in turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    /// Hierarchical id.
    pub id: PieceId,
    /// Kind tag, with geometry for nodes.
    pub kind: PieceKind,
    /// Child pieces in sibling order.
    pub children: Vec<Piece>,
}

impl Piece {
    /// Creates a childless piece.
    #[must_use]
    pub fn new(id: impl Into<PieceId>, kind: PieceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// Creates a childless node piece.
    #[must_use]
    pub fn node(id: impl Into<PieceId>, position: Point, size: Size) -> Self {
        Self::new(id, PieceKind::Node(NodeGeometry::new(position, size)))
    }

    /// Creates a childless piece of a non-node kind.
    #[must_use]
    pub fn other(id: impl Into<PieceId>, type_tag: impl Into<String>) -> Self {
        Self::new(id, PieceKind::Other(type_tag.into()))
    }

    /// Creates the synthetic root stub with no children.
    #[must_use]
    pub fn root_stub() -> Self {
        Self::graph_stub(PieceId::root())
    }

    /// Creates a childless graph stub with the given root id.
    #[must_use]
    pub fn graph_stub(id: impl Into<PieceId>) -> Self {
        Self::other(id, "graph")
    }

    /// Replaces the children, builder style.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Returns the node geometry if this is a node piece.
    #[must_use]
    pub fn geometry(&self) -> Option<&NodeGeometry> {
        self.kind.node()
    }

    /// Returns `true` for node pieces.
    #[must_use]
    pub fn is_node(&self) -> bool {
        self.geometry().is_some()
    }

    /// Returns a copy of this piece without its children.
    ///
    /// This is the placeholder form a parent carries for a child it has not
    /// resolved yet.
    #[must_use]
    pub fn to_stub(&self) -> Self {
        Self::new(self.id.clone(), self.kind.clone())
    }

    /// Counts this piece and all of its descendants.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}
