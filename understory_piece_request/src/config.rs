// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime selection of a manager implementation.

use understory_piece_tree::{Piece, PieceId};

use crate::grid::{GridConfig, GridManager};
use crate::manager::{PieceRequestManager, RequestError};
use crate::queue::QueueManager;
use crate::viewport::ViewportState;

/// Which manager implementation to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ManagerKind {
    /// [`GridManager`]: nearest to the viewport first.
    #[default]
    Grid,
    /// [`QueueManager`]: breadth-first.
    Queue,
}

/// Manager selection plus grid tuning.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManagerConfig {
    /// Implementation to build.
    pub kind: ManagerKind,
    /// Grid tuning, ignored by the queue manager.
    pub grid: GridConfig,
}

impl ManagerConfig {
    /// Selects the implementation.
    #[must_use]
    pub fn with_kind(mut self, kind: ManagerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the grid tuning.
    #[must_use]
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }
}

/// A manager whose implementation is picked at runtime.
#[derive(Clone, Debug)]
pub enum AnyManager {
    /// Spatial ordering.
    Grid(GridManager),
    /// FIFO ordering.
    Queue(QueueManager),
}

impl AnyManager {
    /// Builds the manager described by `config`.
    #[must_use]
    pub fn from_config(config: &ManagerConfig) -> Self {
        match config.kind {
            ManagerKind::Grid => Self::Grid(GridManager::with_config(config.grid)),
            ManagerKind::Queue => Self::Queue(QueueManager::new()),
        }
    }

    /// Returns which implementation this is.
    #[must_use]
    pub fn kind(&self) -> ManagerKind {
        match self {
            Self::Grid(_) => ManagerKind::Grid,
            Self::Queue(_) => ManagerKind::Queue,
        }
    }

    fn inner(&self) -> &dyn PieceRequestManager {
        match self {
            Self::Grid(m) => m,
            Self::Queue(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn PieceRequestManager {
        match self {
            Self::Grid(m) => m,
            Self::Queue(m) => m,
        }
    }
}

impl Default for AnyManager {
    fn default() -> Self {
        Self::from_config(&ManagerConfig::default())
    }
}

impl PieceRequestManager for AnyManager {
    fn enqueue(&mut self, parent_id: &PieceId, piece: Piece) -> Result<(), RequestError> {
        self.inner_mut().enqueue(parent_id, piece)
    }

    fn dequeue(&mut self) -> Option<Piece> {
        self.inner_mut().dequeue()
    }

    fn peek(&self) -> Option<&Piece> {
        self.inner().peek()
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }

    fn set_viewport(&mut self, viewport: &ViewportState) {
        self.inner_mut().set_viewport(viewport);
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}
