// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform-grid manager that serves pieces near the viewport first.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;
use understory_piece_tree::{Piece, PieceId};

use crate::cell_key::{CellKey, GridCell};
use crate::manager::{PieceRequestManager, RequestError};
use crate::ring::RingCells;
use crate::viewport::ViewportState;

/// Tuning for [`GridManager`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Edge length of a grid cell in diagram units.
    pub resolution: f64,
    /// How many rings around the viewport cell are searched before falling
    /// back to any non-empty cell.
    pub max_ring_count: u16,
}

impl GridConfig {
    /// Default cell edge length.
    pub const DEFAULT_RESOLUTION: f64 = 2000.0;
    /// Default ring search radius.
    pub const DEFAULT_MAX_RING_COUNT: u16 = 2;

    /// Creates a configuration, see [`GridConfig::sanitized`] for validation.
    #[must_use]
    pub fn new(resolution: f64, max_ring_count: u16) -> Self {
        Self {
            resolution,
            max_ring_count,
        }
        .sanitized()
    }

    /// Sets the cell edge length.
    #[must_use]
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self.sanitized()
    }

    /// Sets the ring search radius.
    #[must_use]
    pub fn with_max_ring_count(mut self, max_ring_count: u16) -> Self {
        self.max_ring_count = max_ring_count;
        self
    }

    /// Replaces a non-finite or non-positive resolution with the default.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            self.resolution = Self::DEFAULT_RESOLUTION;
        }
        self
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: Self::DEFAULT_RESOLUTION,
            max_ring_count: Self::DEFAULT_MAX_RING_COUNT,
        }
    }
}

/// Buckets pending node pieces into a uniform grid and serves them nearest
/// to the viewport first.
///
/// Each node piece is placed in the cell containing its center, computed in
/// absolute (root-relative) coordinates. Absolute positions are accumulated
/// as pieces are enqueued: a piece's absolute position is its parent's plus
/// its own relative position, or just its relative position if the parent
/// was never seen (top-level pieces).
///
/// Selection, shared by [`dequeue`](PieceRequestManager::dequeue) and
/// [`peek`](PieceRequestManager::peek):
/// 1. the front of the viewport cell,
/// 2. otherwise the front of the first non-empty cell found on the rings
///    `1..=max_ring_count` around it (see [`RingCells`] for the order),
/// 3. otherwise the front of the oldest non-empty cell anywhere.
///
/// Non-node pieces are ignored. Cells are FIFO.
#[derive(Clone, Debug, Default)]
pub struct GridManager {
    config: GridConfig,
    positions: HashMap<PieceId, Point>,
    cells: HashMap<CellKey, VecDeque<Piece>>,
    // Keys of non-empty cells, oldest first.
    cell_order: Vec<CellKey>,
    current: GridCell,
    pending: usize,
}

impl GridManager {
    /// Creates an empty manager with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty manager with the given configuration.
    #[must_use]
    pub fn with_config(config: GridConfig) -> Self {
        Self {
            config: config.sanitized(),
            ..Self::default()
        }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// Returns the cell containing the viewport center, as of the last
    /// [`set_viewport`](PieceRequestManager::set_viewport).
    #[must_use]
    pub fn current_cell(&self) -> GridCell {
        self.current
    }

    /// Returns the recorded absolute position of an enqueued node piece.
    #[must_use]
    pub fn absolute_position(&self, id: &PieceId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Returns the cell containing `point`, flooring towards negative infinity.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating cast; far-away cells are rejected when packed"
    )]
    pub fn cell_for(&self, point: Point) -> GridCell {
        let res = self.config.resolution;
        let scaled = Point::new(point.x / res, point.y / res).floor();
        GridCell::new(scaled.x as i32, scaled.y as i32)
    }

    /// Returns the number of pending pieces in `cell`.
    #[must_use]
    pub fn cell_len(&self, cell: GridCell) -> usize {
        cell.key()
            .ok()
            .and_then(|key| self.cells.get(&key))
            .map_or(0, VecDeque::len)
    }

    /// Returns the number of non-empty cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cell_order.len()
    }

    fn occupied(&self, cell: GridCell) -> Option<CellKey> {
        // Cells outside the packable range never hold pieces.
        let key = cell.key().ok()?;
        self.cells.contains_key(&key).then_some(key)
    }

    fn select(&self) -> Option<CellKey> {
        if self.pending == 0 {
            return None;
        }
        if let Some(key) = self.occupied(self.current) {
            return Some(key);
        }
        // The first non-empty ring is the one at the nearest occupied distance,
        // so only that ring is walked.
        let nearest = self.nearest_occupied_distance()?;
        if let Ok(radius) = u16::try_from(nearest)
            && radius <= self.config.max_ring_count
        {
            let hit = RingCells::new(self.current, radius).find_map(|c| self.occupied(c));
            if hit.is_some() {
                return hit;
            }
        }
        self.cell_order.first().copied()
    }

    /// Chebyshev distance from the viewport cell to the nearest non-empty cell.
    #[must_use]
    pub fn nearest_occupied_distance(&self) -> Option<u32> {
        self.cell_order
            .iter()
            .map(|key| key.cell().chebyshev_distance(self.current))
            .min()
    }
}

impl PieceRequestManager for GridManager {
    fn enqueue(&mut self, parent_id: &PieceId, piece: Piece) -> Result<(), RequestError> {
        let Some(geometry) = piece.geometry() else {
            return Ok(());
        };
        let absolute = match self.positions.get(parent_id) {
            Some(parent) => *parent + geometry.position.to_vec2(),
            None => geometry.position,
        };
        let center = geometry.center_at(absolute);
        if !center.is_finite() {
            return Err(RequestError::NonFinitePosition { id: piece.id });
        }
        let cell = self.cell_for(center);
        let key = match cell.key() {
            Ok(key) => key,
            Err(source) => return Err(RequestError::Cell { id: piece.id, source }),
        };
        tracing::trace!(id = %piece.id, x = cell.x, y = cell.y, "grid enqueue");
        self.positions.insert(piece.id.clone(), absolute);
        let queue = self.cells.entry(key).or_insert_with(|| {
            self.cell_order.push(key);
            VecDeque::new()
        });
        queue.push_back(piece);
        self.pending += 1;
        Ok(())
    }

    fn dequeue(&mut self) -> Option<Piece> {
        let key = self.select()?;
        let queue = self.cells.get_mut(&key)?;
        let piece = queue.pop_front()?;
        if queue.is_empty() {
            self.cells.remove(&key);
            self.cell_order.retain(|k| *k != key);
        }
        self.pending -= 1;
        Some(piece)
    }

    fn peek(&self) -> Option<&Piece> {
        let key = self.select()?;
        self.cells.get(&key)?.front()
    }

    fn reset(&mut self) {
        self.positions.clear();
        self.cells.clear();
        self.cell_order.clear();
        self.current = GridCell::ORIGIN;
        self.pending = 0;
    }

    fn set_viewport(&mut self, viewport: &ViewportState) {
        let Some(center) = viewport.center() else {
            tracing::debug!(?viewport, "ignoring viewport without a finite center");
            return;
        };
        let cell = self.cell_for(center);
        if cell != self.current {
            tracing::debug!(x = cell.x, y = cell.y, "viewport moved to new grid cell");
        }
        self.current = cell;
    }

    fn len(&self) -> usize {
        self.pending
    }

    fn name(&self) -> &'static str {
        "grid"
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};
    use understory_piece_tree::{Piece, PieceId};

    use super::{GridConfig, GridManager};
    use crate::cell_key::GridCell;
    use crate::manager::PieceRequestManager;
    use crate::viewport::ViewportState;

    fn node(id: &str, x: f64, y: f64) -> Piece {
        Piece::node(id, Point::new(x, y), Size::new(2.0, 2.0))
    }

    #[test]
    fn buckets_by_center_with_floor_division() {
        let grid = GridManager::with_config(GridConfig::new(2000.0, 2));
        assert_eq!(grid.cell_for(Point::new(4001.0, 100.0)), GridCell::new(2, 0));
        assert_eq!(grid.cell_for(Point::new(-1.0, -1.0)), GridCell::new(-1, -1));
        assert_eq!(grid.cell_for(Point::new(1999.9, 0.0)), GridCell::new(0, 0));
    }

    #[test]
    fn enqueue_buckets_by_position_plus_half_size() {
        let mut grid = GridManager::with_config(GridConfig::new(2000.0, 2));
        // Top-left (4000, 99) with a 2x2 size puts the center at (4001, 100).
        grid.enqueue(&PieceId::root(), node("$root$c", 4000.0, 99.0))
            .unwrap();
        assert_eq!(grid.cell_len(GridCell::new(2, 0)), 1);
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn ring_order_breaks_ties_within_the_nearest_ring() {
        let mut grid = GridManager::with_config(GridConfig::new(100.0, u16::MAX));
        let root = PieceId::root();
        // Both at distance 1 from (10, 10); the top edge comes before the right edge.
        grid.enqueue(&root, node("$root$right", 1150.0, 1050.0))
            .unwrap();
        grid.enqueue(&root, node("$root$top", 1050.0, 950.0))
            .unwrap();
        grid.enqueue(&root, node("$root$far", 1550.0, 1050.0))
            .unwrap();
        grid.set_viewport(&ViewportState::new(
            Point::new(1000.0, 1000.0),
            1.0,
            Size::new(100.0, 100.0),
        ));

        assert_eq!(grid.nearest_occupied_distance(), Some(1));
        assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$top");
        assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$right");
        assert_eq!(grid.nearest_occupied_distance(), Some(5));
        assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$far");
        assert_eq!(grid.nearest_occupied_distance(), None);
    }

    #[test]
    fn large_ring_limit_walks_only_the_nearest_ring() {
        let mut grid = GridManager::with_config(GridConfig::new(1.0, u16::MAX));
        grid.enqueue(&PieceId::root(), node("$root$far", 30_000.0, 30_000.0))
            .unwrap();

        // Rings 1..=30_000 are empty; walking them all would take billions of lookups.
        assert_eq!(grid.nearest_occupied_distance(), Some(30_001));
        assert_eq!(grid.peek().map(|p| p.id.as_str()), Some("$root$far"));
        assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$far");
        assert!(grid.is_empty());
    }

    #[test]
    fn child_positions_accumulate_through_parents() {
        let mut grid = GridManager::with_config(GridConfig::new(100.0, 2));
        let root = PieceId::root();
        grid.enqueue(&root, node("$root$A", 150.0, 0.0)).unwrap();
        grid.enqueue(&PieceId::new("$root$A"), node("$root$A$x", 60.0, 10.0))
            .unwrap();

        assert_eq!(
            grid.absolute_position(&PieceId::new("$root$A$x")),
            Some(Point::new(210.0, 10.0))
        );
        assert_eq!(grid.cell_len(GridCell::new(1, 0)), 1);
        assert_eq!(grid.cell_len(GridCell::new(2, 0)), 1);
    }

    #[test]
    fn non_nodes_are_ignored() {
        let mut grid = GridManager::new();
        grid.enqueue(&PieceId::root(), Piece::other("$root$e", "edge"))
            .unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.peek(), None);
    }

    #[test]
    fn negative_cells_are_rejected() {
        let mut grid = GridManager::with_config(GridConfig::new(100.0, 2));
        let err = grid
            .enqueue(&PieceId::root(), node("$root$neg", -50.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, super::RequestError::Cell { .. }));
        assert!(grid.is_empty());
        assert_eq!(grid.absolute_position(&PieceId::new("$root$neg")), None);
    }

    #[test]
    fn viewport_center_selects_current_cell() {
        let mut grid = GridManager::with_config(GridConfig::new(1000.0, 2));
        let vp = ViewportState::new(Point::new(2500.0, 0.0), 0.5, Size::new(1000.0, 1000.0));
        grid.set_viewport(&vp);
        assert_eq!(grid.current_cell(), GridCell::new(3, 1));

        let bad = ViewportState::new(Point::ZERO, 0.0, Size::new(10.0, 10.0));
        grid.set_viewport(&bad);
        assert_eq!(grid.current_cell(), GridCell::new(3, 1));
    }

    #[test]
    fn cells_are_fifo_and_emptied_cells_are_forgotten() {
        let mut grid = GridManager::with_config(GridConfig::new(100.0, 2));
        let root = PieceId::root();
        grid.enqueue(&root, node("$root$a", 10.0, 10.0)).unwrap();
        grid.enqueue(&root, node("$root$b", 20.0, 20.0)).unwrap();
        assert_eq!(grid.occupied_cells(), 1);

        assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$a");
        assert_eq!(grid.dequeue().unwrap().id.as_str(), "$root$b");
        assert_eq!(grid.occupied_cells(), 0);
        assert_eq!(grid.dequeue(), None);
    }

    #[test]
    fn invalid_resolution_falls_back_to_default() {
        assert_eq!(GridConfig::new(0.0, 1).resolution, GridConfig::DEFAULT_RESOLUTION);
        assert_eq!(GridConfig::new(f64::NAN, 1).resolution, GridConfig::DEFAULT_RESOLUTION);
        assert_eq!(GridConfig::default().max_ring_count, 2);
    }
}
