// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The piece request manager contract.

use core::fmt;

use understory_piece_tree::{Piece, PieceId};

use crate::cell_key::CellKeyError;
use crate::viewport::ViewportState;

/// Error returned when a manager refuses a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestError {
    /// The piece's grid cell cannot be packed into a cell key.
    Cell {
        /// The rejected piece.
        id: PieceId,
        /// Why the cell was rejected.
        source: CellKeyError,
    },
    /// The piece's absolute center is NaN or infinite.
    NonFinitePosition {
        /// The rejected piece.
        id: PieceId,
    },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell { id, source } => write!(f, "cannot place piece {id}: {source}"),
            Self::NonFinitePosition { id } => {
                write!(f, "cannot place piece {id}: position is not finite")
            }
        }
    }
}

impl core::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Cell { source, .. } => Some(source),
            Self::NonFinitePosition { .. } => None,
        }
    }
}

/// Decides which pending piece to request from the model source next.
///
/// A manager owns pieces from [`enqueue`](Self::enqueue) until
/// [`dequeue`](Self::dequeue) hands them back; it does not track them
/// afterwards. One manager serves one diagram view and is
/// [`reset`](Self::reset) whenever a new diagram (or a re-synthesis of the
/// same one) starts.
///
/// Enqueuing the same id twice is a caller error. Neither implementation in
/// this crate deduplicates: the piece is stored twice and is handed out twice.
pub trait PieceRequestManager {
    /// Records `piece` as pending.
    ///
    /// `parent_id` is the id of the piece whose response listed `piece` as a
    /// child; spatial managers use it to resolve absolute positions.
    fn enqueue(&mut self, parent_id: &PieceId, piece: Piece) -> Result<(), RequestError>;

    /// Removes and returns the next piece to request.
    fn dequeue(&mut self) -> Option<Piece>;

    /// Returns the piece [`dequeue`](Self::dequeue) would return, without removing it.
    fn peek(&self) -> Option<&Piece>;

    /// Drops all pending pieces and any per-diagram state.
    fn reset(&mut self);

    /// Informs the manager of the currently visible region.
    ///
    /// Managers that do not order by position treat this as a no-op.
    fn set_viewport(&mut self, viewport: &ViewportState);

    /// Number of pending pieces.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is pending.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}
