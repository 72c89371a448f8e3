// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message shapes exchanged with the model source and the host view.
//!
//! These are shapes only; framing and wire encoding belong to the transport.

use core::fmt;

use kurbo::{Point, Rect};
use understory_piece_request::ViewportState;
use understory_piece_tree::{Piece, PieceId};

/// Correlates a piece request with its response.
///
/// Ids are handed out in increasing order by the coordinator and are never
/// reused within one coordinator's lifetime, not even across model updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RequestId(pub u64);

impl RequestId {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outbound: asks the model source for the full subtree rooted at `element_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestPiece {
    /// Echoed back in the matching [`PieceResponse`].
    pub request_id: RequestId,
    /// Id of the placeholder to resolve.
    pub element_id: PieceId,
}

/// Inbound: the model source's answer to a [`RequestPiece`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceResponse {
    /// The request this answers.
    pub response_id: RequestId,
    /// The resolved piece; its children may be unresolved stubs.
    pub fragment: Piece,
}

/// Outbound: asks the host for the current viewport.
///
/// The host answers with a [`ViewportReport`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportQuery;

/// Inbound: what the host view currently shows.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportReport {
    /// Diagram-space point shown at the canvas origin.
    pub scroll: Point,
    /// Uniform zoom factor.
    pub zoom: f64,
    /// Canvas bounds in device pixels; only the size matters for ordering.
    pub canvas_bounds: Rect,
}

impl ViewportReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(scroll: Point, zoom: f64, canvas_bounds: Rect) -> Self {
        Self {
            scroll,
            zoom,
            canvas_bounds,
        }
    }

    /// Converts the report into the snapshot consumed by request managers.
    #[must_use]
    pub fn to_viewport(&self) -> ViewportState {
        ViewportState::new(self.scroll, self.zoom, self.canvas_bounds.size())
    }
}

impl From<ViewportReport> for ViewportState {
    fn from(report: ViewportReport) -> Self {
        report.to_viewport()
    }
}

/// Inbound: the model source has a new model.
///
/// The payload is opaque to delivery; both variants restart delivery from a
/// fresh root stub.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelUpdate {
    /// The model was replaced wholesale.
    Replace {
        /// Id of the new model's root.
        root: PieceId,
    },
    /// The model changed incrementally.
    Update {
        /// Id of the model's root.
        root: PieceId,
    },
}

impl ModelUpdate {
    /// Returns the id of the root to request.
    #[must_use]
    pub fn root(&self) -> &PieceId {
        match self {
            Self::Replace { root } | Self::Update { root } => root,
        }
    }
}

impl Default for ModelUpdate {
    fn default() -> Self {
        Self::Replace {
            root: PieceId::root(),
        }
    }
}

/// A message the coordinator wants sent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outbound {
    /// Send to the model source.
    RequestPiece(RequestPiece),
    /// Send to the host view.
    QueryViewport(ViewportQuery),
}

impl Outbound {
    /// Returns the piece request, if this is one.
    #[must_use]
    pub fn as_request(&self) -> Option<&RequestPiece> {
        match self {
            Self::RequestPiece(request) => Some(request),
            Self::QueryViewport(_) => None,
        }
    }
}
