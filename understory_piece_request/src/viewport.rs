// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Snapshot of what the host canvas currently shows.
///
/// The canvas maps the diagram plane with a scroll offset (in diagram
/// coordinates) and a uniform zoom factor. A snapshot is taken right before
/// each piece request so that ordering decisions use a fresh view.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Diagram-space point shown at the canvas origin.
    pub scroll: Point,
    /// Uniform zoom factor; `2.0` shows the diagram at twice its size.
    pub zoom: f64,
    /// Canvas size in device pixels.
    pub canvas: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scroll: Point::ZERO,
            zoom: 1.0,
            canvas: Size::ZERO,
        }
    }
}

impl ViewportState {
    /// Creates a viewport snapshot.
    #[must_use]
    pub const fn new(scroll: Point, zoom: f64, canvas: Size) -> Self {
        Self {
            scroll,
            zoom,
            canvas,
        }
    }

    /// Returns `true` if the zoom is positive and every component is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.zoom.is_finite()
            && self.zoom > 0.0
            && self.scroll.is_finite()
            && self.canvas.is_finite()
    }

    /// Transform from canvas (device) coordinates to diagram coordinates.
    ///
    /// Returns `None` for invalid snapshots, see [`ViewportState::is_valid`].
    #[must_use]
    pub fn view_to_world(&self) -> Option<Affine> {
        self.is_valid()
            .then(|| Affine::translate(self.scroll.to_vec2()) * Affine::scale(1.0 / self.zoom))
    }

    /// Returns the diagram-space rectangle currently visible.
    #[must_use]
    pub fn visible_world_rect(&self) -> Option<Rect> {
        let to_world = self.view_to_world()?;
        Some(to_world.transform_rect_bbox(self.canvas.to_rect()))
    }

    /// Returns the diagram-space point at the center of the canvas.
    ///
    /// This is `scroll + canvas / (2 * zoom)`.
    #[must_use]
    pub fn center(&self) -> Option<Point> {
        let to_world = self.view_to_world()?;
        let half = Vec2::new(self.canvas.width, self.canvas.height) * 0.5;
        Some(to_world * half.to_point())
    }
}
