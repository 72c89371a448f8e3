// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_progressive --heading-base-level=0

//! Understory Progressive: sans-IO coordination of piece-by-piece diagram delivery.
//!
//! A [`DeliveryCoordinator`] sits between a model source, which answers
//! requests for single pieces of a diagram, and a host view, which knows what
//! part of the diagram is on screen. The coordinator keeps the partially built
//! [`ModelTree`](understory_piece_tree::ModelTree), feeds newly discovered
//! children to a [`PieceRequestManager`](understory_piece_request::PieceRequestManager),
//! and decides what to send next. It never performs I/O itself: every handler
//! takes one inbound message and returns the outbound message, if any.
//!
//! The loop for one model:
//!
//! 1. [`ModelUpdate`] in, [`RequestPiece`] for the root out.
//! 2. [`PieceResponse`] in: the fragment is patched into the tree, its
//!    children are enqueued, and a [`ViewportQuery`] goes out if anything is
//!    pending.
//! 3. [`ViewportReport`] in: the manager picks the next piece with the fresh
//!    viewport, and a [`RequestPiece`] goes out. Back to step 2.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use understory_progressive::{
//!     DeliveryCoordinator, ModelUpdate, Outbound, PieceResponse, ViewportReport,
//! };
//! use understory_piece_tree::Piece;
//!
//! let mut coordinator = DeliveryCoordinator::default();
//! let Outbound::RequestPiece(root_request) = coordinator.on_model_update(&ModelUpdate::default())
//! else {
//!     unreachable!()
//! };
//!
//! // The model source answers with the root and one unresolved node.
//! let child = Piece::node("$root$A", Point::ZERO, Size::new(100.0, 100.0));
//! let root = Piece::root_stub().with_children([child]);
//! let next = coordinator.on_piece_response(PieceResponse {
//!     response_id: root_request.request_id,
//!     fragment: root,
//! });
//! assert!(matches!(next, Some(Outbound::QueryViewport(_))));
//!
//! // The host reports its viewport; the coordinator asks for `$root$A`.
//! let report = ViewportReport::new(Point::ZERO, 1.0, Rect::new(0.0, 0.0, 800.0, 600.0));
//! let next = coordinator.on_viewport_report(&report).unwrap();
//! assert_eq!(next.as_request().unwrap().element_id.as_str(), "$root$A");
//! ```
//!
//! Stale responses (for a request that is no longer in flight) and fragments
//! whose placeholder has disappeared are absorbed and counted in
//! [`DeliveryStats`]; they never surface as errors.
//!
//! ## Features
//!
//! - `std` (default): forwarded to Kurbo and the sibling crates.
//! - `libm`: `no_std` float math through Kurbo.
//! - `serde`: `Serialize`/`Deserialize` for [`DeliveryConfig`], the protocol
//!   messages and [`DeliveryStats`]. The configuration deserialization tests
//!   only build with this feature, so run `cargo test --all-features` to
//!   cover them.
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod coordinator;
mod protocol;
mod stats;

pub use config::DeliveryConfig;
pub use coordinator::{DeliveryCoordinator, DeliveryState};
pub use protocol::{
    ModelUpdate, Outbound, PieceResponse, RequestId, RequestPiece, ViewportQuery, ViewportReport,
};
pub use stats::DeliveryStats;
