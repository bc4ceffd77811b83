//! Frame geometry in reference units and its mapping to display pixels.
//!
//! All authored constants live in a fixed 499×605 reference space. A
//! [`Viewport`] carries the single ratio that converts reference units to
//! the current surface's pixels; export targets use their own ratio. The
//! rounded-rect clip is expressed as pure geometry (a path plus a signed
//! distance) so any raster backend can consume it.

use kurbo::{BezPath, Point, Rect, RoundedRect, Shape};

/// Width of the reference coordinate space, in reference units.
pub const REFERENCE_WIDTH: f64 = 499.0;
/// Height of the reference coordinate space, in reference units.
pub const REFERENCE_HEIGHT: f64 = 605.0;
/// Corner radius of the decorative frame, in reference units.
pub const FRAME_CORNER_RADIUS: f64 = 20.0;

/// The decorative frame rectangle, in reference units.
///
/// Mutated only by [`FrameRect::expand_by`] and [`FrameRect::set_size`],
/// both of which keep the visual center fixed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
}

impl Default for FrameRect {
    fn default() -> Self {
        Self {
            x: 155.0,
            y: 247.0,
            width: 170.0,
            height: 207.0,
            corner_radius: FRAME_CORNER_RADIUS,
        }
    }
}

impl FrameRect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Scales width and height by `factor` about the current center.
    pub fn expand_by(&mut self, factor: f64) {
        let c = self.center();
        self.width *= factor;
        self.height *= factor;
        self.x = c.x - self.width / 2.0;
        self.y = c.y - self.height / 2.0;
    }

    /// Sets an explicit size (reference units) about the current center.
    pub fn set_size(&mut self, width: f64, height: f64) {
        let c = self.center();
        self.width = width;
        self.height = height;
        self.x = c.x - self.width / 2.0;
        self.y = c.y - self.height / 2.0;
    }

    /// The same frame converted into a pixel space.
    pub fn scaled(&self, units_to_pixels: f64) -> FrameRect {
        FrameRect {
            x: self.x * units_to_pixels,
            y: self.y * units_to_pixels,
            width: self.width * units_to_pixels,
            height: self.height * units_to_pixels,
            corner_radius: self.corner_radius * units_to_pixels,
        }
    }

    /// Whether a point (same units as the frame) falls inside the
    /// bounding box. Drag starts and cursor hints use the box, not the
    /// rounded outline, matching the interactive hit test.
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Effective corner radius, capped so opposite corners never overlap.
    fn radius(&self) -> f64 {
        self.corner_radius
            .clamp(0.0, (self.width.min(self.height) / 2.0).max(0.0))
    }

    /// The rounded-rect outline as a path, for backends that consume
    /// path geometry directly.
    pub fn rounded_path(&self) -> BezPath {
        RoundedRect::new(
            self.x,
            self.y,
            self.x + self.width,
            self.y + self.height,
            self.radius(),
        )
        .to_path(0.1)
    }

    /// Signed distance from a point to the rounded outline; negative
    /// inside.
    pub fn signed_distance(&self, x: f64, y: f64) -> f64 {
        let r = self.radius();
        let c = self.center();
        let hx = self.width / 2.0 - r;
        let hy = self.height / 2.0 - r;
        let qx = (x - c.x).abs() - hx;
        let qy = (y - c.y).abs() - hy;
        let outside = (qx.max(0.0)).hypot(qy.max(0.0));
        outside + qx.max(qy).min(0.0) - r
    }

    /// Anti-aliased clip coverage at a pixel center, in `0.0..=1.0`.
    pub fn coverage(&self, x: f64, y: f64) -> f64 {
        (0.5 - self.signed_distance(x, y)).clamp(0.0, 1.0)
    }
}

/// Live drawing surface derived from a container width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels, proportional to the reference aspect.
    pub height: f64,
    /// `width / REFERENCE_WIDTH`.
    pub scale_ratio: f64,
}

impl Viewport {
    /// Derives the surface from a container width. A missing or
    /// non-positive width falls back to the reference width.
    pub fn from_container_width(container_width: Option<f64>) -> Self {
        let width = container_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(REFERENCE_WIDTH);
        Self {
            width,
            height: width * REFERENCE_HEIGHT / REFERENCE_WIDTH,
            scale_ratio: width / REFERENCE_WIDTH,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_container_width(None)
    }
}
