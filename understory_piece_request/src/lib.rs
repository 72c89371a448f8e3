// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_piece_request --heading-base-level=0

//! Understory Piece Request: ordering of pending piece requests.
//!
//! When a diagram is delivered piece by piece, every resolved piece reveals
//! a handful of children that still have to be fetched. Which one to fetch
//! next decides how quickly the part of the diagram the user is looking at
//! fills in. This crate provides that decision behind one small contract,
//! [`PieceRequestManager`], with two implementations:
//!
//! - [`QueueManager`]: plain FIFO, resolving the diagram breadth-first.
//! - [`GridManager`]: buckets node pieces into a uniform grid by their
//!   absolute center and serves the viewport's cell first, then the rings of
//!   cells around it, then anything left.
//!
//! Supporting pieces:
//!
//! - [`CellKey`] / [`encode`] / [`decode`]: packs a grid cell into one `u32`
//!   as `(x << 16) | y`, accepting `0..=32767` per axis and rejecting
//!   everything else with [`CellKeyError`].
//! - [`RingCells`]: the cells at a given Chebyshev distance, edge-then-corner.
//! - [`ViewportState`]: scroll, zoom, and canvas size of the host view.
//! - [`ManagerConfig`] / [`AnyManager`]: pick the implementation at runtime.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_piece_request::{GridConfig, GridManager, PieceRequestManager, ViewportState};
//! use understory_piece_tree::{Piece, PieceId};
//!
//! let mut grid = GridManager::with_config(GridConfig::new(1000.0, 2));
//! let root = PieceId::root();
//! let size = Size::new(100.0, 100.0);
//! grid.enqueue(&root, Piece::node("$root$far", Point::new(5000.0, 0.0), size)).unwrap();
//! grid.enqueue(&root, Piece::node("$root$near", Point::new(0.0, 0.0), size)).unwrap();
//!
//! // The canvas shows the area around the origin.
//! grid.set_viewport(&ViewportState::new(Point::ZERO, 1.0, Size::new(800.0, 600.0)));
//! assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$near");
//! assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$far");
//! ```
//!
//! Ordering is a heuristic: within a ring the first non-empty cell wins,
//! which is not necessarily the one with the closest piece.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell_key;
mod config;
mod grid;
mod manager;
mod queue;
mod ring;
mod viewport;

pub use cell_key::{CellKey, CellKeyError, GridCell, MAX_AXIS, MAX_KEY, decode, encode};
pub use config::{AnyManager, ManagerConfig, ManagerKind};
pub use grid::{GridConfig, GridManager};
pub use manager::{PieceRequestManager, RequestError};
pub use queue::QueueManager;
pub use ring::RingCells;
pub use viewport::ViewportState;
