// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumeration of the cells at a fixed Chebyshev distance.

use crate::cell_key::GridCell;

/// Iterator over the square ring of cells at Chebyshev distance `radius`
/// around a center cell.
///
/// For `radius > 0` the ring has `8 * radius` cells. They are produced edge by
/// edge without corners (top, bottom, left, right, each in increasing
/// coordinate order) followed by the four corners (top-left, top-right,
/// bottom-left, bottom-right). A radius of `0` yields just the center.
///
/// Coordinates saturate at the `i32` bounds; such cells are never packable,
/// so callers simply find them empty.
///
/// ```rust
/// use understory_piece_request::{GridCell, RingCells};
///
/// let ring: Vec<_> = RingCells::new(GridCell::ORIGIN, 1).collect();
/// assert_eq!(ring.len(), 8);
/// assert_eq!(ring[0], GridCell::new(0, -1));
/// assert_eq!(ring[4], GridCell::new(-1, -1));
/// ```
#[derive(Clone, Debug)]
pub struct RingCells {
    center: GridCell,
    radius: i32,
    segment: Segment,
    step: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    Corners,
    Done,
}

impl RingCells {
    /// Creates the ring of cells at distance `radius` around `center`.
    #[must_use]
    pub fn new(center: GridCell, radius: u16) -> Self {
        let segment = if radius == 0 {
            Segment::Center
        } else {
            Segment::Top
        };
        Self {
            center,
            radius: i32::from(radius),
            segment,
            step: 0,
        }
    }

    fn offset(&self, dx: i32, dy: i32) -> GridCell {
        GridCell::new(
            self.center.x.saturating_add(dx),
            self.center.y.saturating_add(dy),
        )
    }

    fn remaining(&self) -> usize {
        let r = self.radius;
        let edge = 2 * r - 1;
        let left = match self.segment {
            Segment::Center => 1,
            Segment::Top => 4 * edge + 4 - self.step,
            Segment::Bottom => 3 * edge + 4 - self.step,
            Segment::Left => 2 * edge + 4 - self.step,
            Segment::Right => edge + 4 - self.step,
            Segment::Corners => 4 - self.step,
            Segment::Done => 0,
        };
        usize::try_from(left).unwrap_or(0)
    }
}

impl Iterator for RingCells {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        let r = self.radius;
        let edge = 2 * r - 1;
        loop {
            match self.segment {
                Segment::Center => {
                    self.segment = Segment::Done;
                    return Some(self.center);
                }
                Segment::Top | Segment::Bottom | Segment::Left | Segment::Right
                    if self.step < edge =>
                {
                    let t = 1 - r + self.step;
                    self.step += 1;
                    let (dx, dy) = match self.segment {
                        Segment::Top => (t, -r),
                        Segment::Bottom => (t, r),
                        Segment::Left => (-r, t),
                        _ => (r, t),
                    };
                    return Some(self.offset(dx, dy));
                }
                Segment::Top => self.advance(Segment::Bottom),
                Segment::Bottom => self.advance(Segment::Left),
                Segment::Left => self.advance(Segment::Right),
                Segment::Right => self.advance(Segment::Corners),
                Segment::Corners if self.step < 4 => {
                    let (dx, dy) = [(-r, -r), (r, -r), (-r, r), (r, r)][self.step as usize];
                    self.step += 1;
                    return Some(self.offset(dx, dy));
                }
                Segment::Corners | Segment::Done => {
                    self.segment = Segment::Done;
                    return None;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for RingCells {}

impl RingCells {
    fn advance(&mut self, next: Segment) {
        self.segment = next;
        self.step = 0;
    }
}
