// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing of grid cell coordinates into a single integer key.

use core::fmt;

/// Largest coordinate accepted on either axis.
pub const MAX_AXIS: i32 = 0x7FFF;

/// Largest valid packed key, `(MAX_AXIS << 16) | MAX_AXIS`.
pub const MAX_KEY: u32 = ((MAX_AXIS as u32) << 16) | MAX_AXIS as u32;

/// Error returned for coordinates or keys outside the packable domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKeyError {
    /// A coordinate pair with an axis outside `0..=MAX_AXIS`.
    OutOfRange {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// A raw key that no coordinate pair encodes to.
    KeyOutOfRange(u32),
}

impl fmt::Display for CellKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { x, y } => write!(
                f,
                "grid cell ({x}, {y}) is outside the packable range 0..={MAX_AXIS} per axis"
            ),
            Self::KeyOutOfRange(key) => {
                write!(f, "cell key {key:#x} does not encode a valid grid cell")
            }
        }
    }
}

impl core::error::Error for CellKeyError {}

/// A grid cell coordinate pair.
///
/// Cells may lie anywhere on the `i32` plane; only cells inside
/// `0..=MAX_AXIS` on both axes can be packed into a [`CellKey`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridCell {
    /// The origin cell.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a cell from its column and row.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Packs this cell into a key.
    pub fn key(self) -> Result<CellKey, CellKeyError> {
        CellKey::encode(self.x, self.y)
    }

    /// Chebyshev (chessboard) distance to `other`.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

/// A packed grid cell coordinate, `(x << 16) | y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u32);

impl CellKey {
    /// Packs a coordinate pair.
    ///
    /// Both axes must be within `0..=MAX_AXIS`. Out-of-range input is a
    /// caller error and is reported, never clamped.
    pub fn encode(x: i32, y: i32) -> Result<Self, CellKeyError> {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(ux), Ok(uy)) if x <= MAX_AXIS && y <= MAX_AXIS => Ok(Self((ux << 16) | uy)),
            _ => Err(CellKeyError::OutOfRange { x, y }),
        }
    }

    /// Validates a raw key.
    ///
    /// Keys above [`MAX_KEY`] are rejected, as are keys whose low half is
    /// above [`MAX_AXIS`] since no coordinate pair packs to them.
    pub fn from_raw(raw: u32) -> Result<Self, CellKeyError> {
        if raw > MAX_KEY || raw & 0xFFFF > MAX_AXIS as u32 {
            return Err(CellKeyError::KeyOutOfRange(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the raw packed value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Unpacks the coordinate pair.
    #[must_use]
    pub fn cell(self) -> GridCell {
        // Both halves are at most MAX_AXIS, which always fits an i32.
        let x = (self.0 >> 16) as i32;
        let y = (self.0 & 0xFFFF) as i32;
        GridCell::new(x, y)
    }
}

/// Packs `(x, y)` into a raw key, see [`CellKey::encode`].
pub fn encode(x: i32, y: i32) -> Result<u32, CellKeyError> {
    CellKey::encode(x, y).map(CellKey::raw)
}

/// Unpacks a raw key into `(x, y)`, see [`CellKey::from_raw`].
pub fn decode(key: u32) -> Result<(i32, i32), CellKeyError> {
    let cell = CellKey::from_raw(key)?.cell();
    Ok((cell.x, cell.y))
}
