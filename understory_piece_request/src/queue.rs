// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-in, first-out manager.

use alloc::collections::VecDeque;

use understory_piece_tree::{Piece, PieceId};

use crate::manager::{PieceRequestManager, RequestError};
use crate::viewport::ViewportState;

/// Hands pieces out in the order they were enqueued.
///
/// Since the children of a response are enqueued together, this resolves a
/// diagram breadth-first. Both [`dequeue`](PieceRequestManager::dequeue) and
/// [`peek`](PieceRequestManager::peek) read the front of the queue. Every
/// piece kind is accepted and the viewport is ignored.
#[derive(Clone, Debug, Default)]
pub struct QueueManager {
    pending: VecDeque<Piece>,
}

impl QueueManager {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PieceRequestManager for QueueManager {
    fn enqueue(&mut self, _parent_id: &PieceId, piece: Piece) -> Result<(), RequestError> {
        self.pending.push_back(piece);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<Piece> {
        self.pending.pop_front()
    }

    fn peek(&self) -> Option<&Piece> {
        self.pending.front()
    }

    fn reset(&mut self) {
        self.pending.clear();
    }

    fn set_viewport(&mut self, _viewport: &ViewportState) {}

    fn len(&self) -> usize {
        self.pending.len()
    }

    fn name(&self) -> &'static str {
        "queue"
    }
}
