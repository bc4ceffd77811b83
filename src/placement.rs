//! Pan/zoom placement of the user image relative to the frame.
//!
//! `scale` maps intrinsic image pixels to display pixels; `offset_x` /
//! `offset_y` displace the image center from the frame center, also in
//! display pixels. Every operation clamps into the valid envelope instead
//! of rejecting input, so no invalid state is reachable:
//!
//! 1. `scale >= min_cover_scale` (the frame is always fully covered)
//! 2. `scale <= min_cover_scale * MAX_ZOOM_FACTOR`
//! 3. `|offset| <= max(0, (displayed - frame) / 2)` per axis

/// Maximum zoom, as a multiple of the cover scale.
pub const MAX_ZOOM_FACTOR: f64 = 4.0;
/// Multiplicative zoom change per wheel notch (±8%).
pub const WHEEL_ZOOM_INTENSITY: f64 = 0.08;
/// Multiplicative zoom change per zoom button press.
pub const BUTTON_ZOOM_STEP: f64 = 1.1;

/// Frame size in display pixels, the clamp context for all placement ops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePx {
    pub width: f64,
    pub height: f64,
}

/// The minimum scale at which `image_width × image_height` covers the
/// frame on both axes.
pub fn min_cover_scale(frame: FramePx, image_width: u32, image_height: u32) -> f64 {
    let iw = f64::from(image_width.max(1));
    let ih = f64::from(image_height.max(1));
    (frame.width / iw).max(frame.height / ih)
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    /// Cover placement: image scaled to exactly cover the frame, centered.
    pub fn cover(frame: FramePx, image_width: u32, image_height: u32) -> Self {
        Self {
            scale: min_cover_scale(frame, image_width, image_height),
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Displayed image size in display pixels, floored at 1px per axis.
    pub fn displayed_size(&self, image_width: u32, image_height: u32) -> (f64, f64) {
        (
            (f64::from(image_width) * self.scale).max(1.0),
            (f64::from(image_height) * self.scale).max(1.0),
        )
    }

    pub fn pan(&mut self, dx: f64, dy: f64, frame: FramePx, image_width: u32, image_height: u32) {
        self.offset_x += dx;
        self.offset_y += dy;
        self.clamp_offsets(frame, image_width, image_height);
    }

    /// Multiplies the scale by `factor` and clamps into the zoom envelope,
    /// then re-clamps offsets against the new displayed size.
    pub fn zoom(&mut self, factor: f64, frame: FramePx, image_width: u32, image_height: u32) {
        let min = min_cover_scale(frame, image_width, image_height);
        self.scale = (self.scale * factor).clamp(min, min * MAX_ZOOM_FACTOR);
        self.clamp_offsets(frame, image_width, image_height);
    }

    /// Raises the scale to the cover minimum if it fell below it (after a
    /// frame resize). Never lowers an already-larger scale.
    pub fn ensure_cover(&mut self, frame: FramePx, image_width: u32, image_height: u32) {
        let min = min_cover_scale(frame, image_width, image_height);
        if self.scale < min {
            self.scale = min;
        }
        self.scale = self.scale.min(min * MAX_ZOOM_FACTOR);
        self.clamp_offsets(frame, image_width, image_height);
    }

    pub fn clamp_offsets(&mut self, frame: FramePx, image_width: u32, image_height: u32) {
        let (dw, dh) = self.displayed_size(image_width, image_height);
        let max_x = ((dw - frame.width) / 2.0).max(0.0);
        let max_y = ((dh - frame.height) / 2.0).max(0.0);
        self.offset_x = self.offset_x.clamp(-max_x, max_x);
        self.offset_y = self.offset_y.clamp(-max_y, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FramePx = FramePx {
        width: 170.0,
        height: 207.0,
    };

    #[test]
    fn cover_scale_matches_reference_case() {
        // Frame {155, 247, 170, 207}, reference width 499, image 300×400,
        // scale ratio 1.
        let scale = min_cover_scale(FRAME, 300, 400);
        assert!((scale - 170.0 / 300.0).abs() < 1e-12);
        assert!((scale - 0.5667).abs() < 1e-3);

        let p = Placement::cover(FRAME, 300, 400);
        assert_eq!(p.offset_x, 0.0);
        assert_eq!(p.offset_y, 0.0);

        let (dw, dh) = p.displayed_size(300, 400);
        assert!((dw - 170.0).abs() < 1e-9);
        assert!((dh - 226.666).abs() < 1e-2);
        assert!(dw >= FRAME.width && dh >= FRAME.height);
    }

    #[test]
    fn pan_sequences_respect_offset_envelope() {
        let mut p = Placement::cover(FRAME, 300, 400);
        p.zoom(2.0, FRAME, 300, 400);

        let moves = [
            (500.0, -900.0),
            (-3.0, 4.0),
            (0.25, 0.25),
            (-1e6, 1e6),
            (12.0, -7.5),
        ];
        for (dx, dy) in moves {
            p.pan(dx, dy, FRAME, 300, 400);
            let (dw, dh) = p.displayed_size(300, 400);
            let max_x = ((dw - FRAME.width) / 2.0).max(0.0);
            let max_y = ((dh - FRAME.height) / 2.0).max(0.0);
            assert!(p.offset_x.abs() <= max_x + 1e-9);
            assert!(p.offset_y.abs() <= max_y + 1e-9);
        }
    }

    #[test]
    fn pan_at_cover_scale_is_pinned_on_snug_axis() {
        // At cover scale the x axis fits exactly, so no x pan is possible.
        let mut p = Placement::cover(FRAME, 300, 400);
        p.pan(50.0, 10.0, FRAME, 300, 400);
        assert_eq!(p.offset_x, 0.0);
        assert!(p.offset_y > 0.0);
    }

    #[test]
    fn zoom_sequences_stay_in_envelope() {
        let mut p = Placement::cover(FRAME, 300, 400);
        let min = min_cover_scale(FRAME, 300, 400);

        for factor in [1.1, 1.1, 0.5, 10.0, 1.0 / 1.1, 0.01, 1.08] {
            p.zoom(factor, FRAME, 300, 400);
            assert!(p.scale >= min - 1e-12);
            assert!(p.scale <= min * MAX_ZOOM_FACTOR + 1e-12);
        }
    }

    #[test]
    fn zoom_out_reclamps_offsets() {
        let mut p = Placement::cover(FRAME, 300, 400);
        p.zoom(4.0, FRAME, 300, 400);
        p.pan(1e6, 1e6, FRAME, 300, 400);
        assert!(p.offset_x > 0.0);

        p.zoom(1e-6, FRAME, 300, 400);
        // Back at cover scale: the snug axis offset collapses to zero.
        assert_eq!(p.offset_x, 0.0);
    }

    #[test]
    fn ensure_cover_raises_but_never_lowers() {
        let mut p = Placement::cover(FRAME, 300, 400);
        p.zoom(2.0, FRAME, 300, 400);
        let zoomed = p.scale;

        // A larger frame raises the minimum above the current scale.
        let big = FramePx {
            width: 600.0,
            height: 600.0,
        };
        p.ensure_cover(big, 300, 400);
        assert!((p.scale - min_cover_scale(big, 300, 400)).abs() < 1e-12);

        // A smaller frame leaves an already-larger scale alone.
        let mut q = Placement {
            scale: zoomed,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let small = FramePx {
            width: 10.0,
            height: 10.0,
        };
        q.ensure_cover(small, 300, 400);
        assert_eq!(q.scale, zoomed);
    }

    #[test]
    fn degenerate_image_size_does_not_divide_by_zero() {
        let scale = min_cover_scale(FRAME, 0, 0);
        assert!(scale.is_finite());
    }
}
