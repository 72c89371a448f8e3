// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The request/response state machine driving progressive delivery.

use understory_piece_request::{AnyManager, PieceRequestManager};
use understory_piece_tree::{ModelTree, PatchOutcome, Piece, PieceId};

use crate::config::DeliveryConfig;
use crate::protocol::{
    ModelUpdate, Outbound, PieceResponse, RequestId, RequestPiece, ViewportQuery, ViewportReport,
};
use crate::stats::DeliveryStats;

/// Where the coordinator is in the delivery loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeliveryState {
    /// Nothing in flight and nothing pending.
    #[default]
    Idle,
    /// The root piece of a new model has been requested.
    RootRequested,
    /// A non-root piece has been requested.
    AwaitingPiece,
    /// Pieces are pending; waiting for a fresh viewport before picking one.
    AwaitingViewport,
}

impl DeliveryState {
    /// Returns `true` while a piece request is outstanding.
    #[must_use]
    pub fn is_awaiting_piece(self) -> bool {
        matches!(self, Self::RootRequested | Self::AwaitingPiece)
    }
}

/// Drives progressive delivery of one diagram view.
///
/// The coordinator performs no I/O. Each `on_*` handler consumes one inbound
/// message and returns at most one [`Outbound`] message for the host to send.
/// At most one piece request is outstanding at any time: the next piece is
/// only picked after the previous response arrived and the host reported a
/// fresh viewport.
///
/// ```text
/// Idle ──model update──▶ RootRequested ──response──▶ AwaitingViewport
///   ▲                                                  │        ▲
///   │                                             report│        │response
///   └──────────── nothing pending ◀────────────────────┴▶ AwaitingPiece
/// ```
///
/// Responses are correlated by [`RequestId`]; a response for anything but the
/// in-flight request is stale and ignored. A matching response whose
/// placeholder is gone from the tree is dropped and delivery continues.
#[derive(Debug)]
pub struct DeliveryCoordinator<M> {
    manager: M,
    tree: Option<ModelTree>,
    state: DeliveryState,
    in_flight: Option<RequestPiece>,
    last_request: RequestId,
    stats: DeliveryStats,
}

impl DeliveryCoordinator<AnyManager> {
    /// Creates a coordinator with the manager described by `config`.
    #[must_use]
    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(AnyManager::from_config(&config.manager))
    }
}

impl<M: PieceRequestManager> DeliveryCoordinator<M> {
    /// Creates an idle coordinator around `manager`.
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            tree: None,
            state: DeliveryState::Idle,
            in_flight: None,
            last_request: RequestId(0),
            stats: DeliveryStats::default(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> DeliveryState {
        self.state
    }

    /// Returns the model tree built so far, if a model update was received.
    #[must_use]
    pub fn tree(&self) -> Option<&ModelTree> {
        self.tree.as_ref()
    }

    /// Returns the outstanding piece request.
    #[must_use]
    pub fn in_flight(&self) -> Option<&RequestPiece> {
        self.in_flight.as_ref()
    }

    /// Returns the request manager.
    #[must_use]
    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Returns the delivery counters.
    #[must_use]
    pub fn stats(&self) -> DeliveryStats {
        self.stats
    }

    /// Zeroes the delivery counters.
    pub fn reset_stats(&mut self) {
        self.stats = DeliveryStats::default();
    }

    /// Returns `true` if no request is outstanding and nothing is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == DeliveryState::Idle
    }

    /// Starts delivery of a new model.
    ///
    /// Discards all pending pieces and the partially built tree, then
    /// requests the root. A request still in flight for the previous model
    /// is abandoned; its response will be reported as stale.
    pub fn on_model_update(&mut self, update: &ModelUpdate) -> Outbound {
        let root = update.root().clone();
        if let Some(abandoned) = self.in_flight.take() {
            tracing::debug!(
                request = %abandoned.request_id,
                element = %abandoned.element_id,
                "abandoning in-flight request for superseded model"
            );
        }
        self.manager.reset();
        self.tree = Some(ModelTree::new(Piece::graph_stub(root.clone())));
        let outbound = self.request(root);
        self.transition(DeliveryState::RootRequested);
        outbound
    }

    /// Handles the model source's answer to a piece request.
    ///
    /// Returns a [`ViewportQuery`] if pieces remain pending, or `None` when
    /// the response was stale or delivery is complete.
    pub fn on_piece_response(&mut self, response: PieceResponse) -> Option<Outbound> {
        let PieceResponse {
            response_id,
            fragment,
        } = response;
        let Some(request) = self.in_flight.take_if(|r| r.request_id == response_id) else {
            self.stats.stale += 1;
            tracing::warn!(
                response = %response_id,
                id = %fragment.id,
                "ignoring response that does not match the in-flight request"
            );
            return None;
        };
        self.stats.received += 1;
        if request.element_id != fragment.id {
            tracing::warn!(
                requested = %request.element_id,
                received = %fragment.id,
                "response fragment id differs from the requested element"
            );
        }

        let parent_id = fragment.id.clone();
        let children = fragment.children.clone();
        match self.patch(fragment) {
            Some(outcome) if outcome.is_applied() => {
                self.stats.patched += 1;
                for child in children {
                    self.enqueue(&parent_id, child);
                }
            }
            _ => {
                self.stats.dropped += 1;
                tracing::warn!(id = %parent_id, "dropping fragment without a placeholder");
            }
        }

        if self.manager.peek().is_some() {
            self.transition(DeliveryState::AwaitingViewport);
            Some(Outbound::QueryViewport(ViewportQuery))
        } else {
            self.transition(DeliveryState::Idle);
            None
        }
    }

    /// Handles the host's viewport report.
    ///
    /// The viewport always reaches the manager. If the coordinator was
    /// waiting for it, the next piece is dequeued and requested; an
    /// unsolicited report never starts a request.
    pub fn on_viewport_report(&mut self, report: &ViewportReport) -> Option<Outbound> {
        self.manager.set_viewport(&report.to_viewport());
        if self.state != DeliveryState::AwaitingViewport {
            return None;
        }
        match self.manager.dequeue() {
            Some(piece) => {
                let outbound = self.request(piece.id);
                self.transition(DeliveryState::AwaitingPiece);
                Some(outbound)
            }
            None => {
                self.transition(DeliveryState::Idle);
                None
            }
        }
    }

    /// Consumes the coordinator and returns the tree and the manager.
    pub fn into_parts(self) -> (Option<ModelTree>, M) {
        (self.tree, self.manager)
    }

    fn patch(&mut self, fragment: Piece) -> Option<PatchOutcome> {
        let tree = self.tree.as_mut()?;
        let outcome = tree.patch(fragment);
        tracing::trace!(revision = tree.revision(), ?outcome, "patched model tree");
        Some(outcome)
    }

    fn enqueue(&mut self, parent_id: &PieceId, child: Piece) {
        if let Err(err) = self.manager.enqueue(parent_id, child) {
            self.stats.rejected += 1;
            tracing::error!(
                manager = self.manager.name(),
                parent = %parent_id,
                %err,
                "request manager rejected piece"
            );
        }
    }

    fn request(&mut self, element_id: PieceId) -> Outbound {
        self.last_request = self.last_request.next();
        let request = RequestPiece {
            request_id: self.last_request,
            element_id,
        };
        self.stats.requested += 1;
        tracing::debug!(
            request = %request.request_id,
            element = %request.element_id,
            "requesting piece"
        );
        self.in_flight = Some(request.clone());
        Outbound::RequestPiece(request)
    }

    fn transition(&mut self, next: DeliveryState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "delivery state");
        }
        self.state = next;
    }
}

impl Default for DeliveryCoordinator<AnyManager> {
    fn default() -> Self {
        Self::from_config(&DeliveryConfig::default())
    }
}
