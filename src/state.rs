//! The compositor state machine: one explicit struct owns the frame
//! geometry, viewport, loaded image and placement, and every user
//! interaction is a method that mutates it deterministically. No globals,
//! no rendering surface required.

use std::sync::Arc;

use crate::{
    decode::PreparedImage,
    geometry::{FrameRect, Viewport},
    placement::{BUTTON_ZOOM_STEP, FramePx, Placement, WHEEL_ZOOM_INTENSITY},
};

/// Pointer and single-touch events, already in surface pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    Cancel,
}

/// Token tying an asynchronous image load to the state generation that
/// started it. A commit with a stale ticket is ignored, so a slow load
/// can never overwrite a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Clone, Copy, Debug)]
struct DragState {
    last_x: f64,
    last_y: f64,
}

/// Serializable snapshot of the editable state (the bitmap itself is not
/// part of it).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub frame: FrameRect,
    pub viewport: Viewport,
    pub placement: Placement,
}

#[derive(Clone, Debug)]
pub struct CompositorState {
    frame: FrameRect,
    viewport: Viewport,
    placement: Placement,
    image: Option<Arc<PreparedImage>>,
    drag: Option<DragState>,
    load_gen: u64,
}

impl Default for CompositorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositorState {
    pub fn new() -> Self {
        Self {
            frame: FrameRect::default(),
            viewport: Viewport::default(),
            placement: Placement {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
            },
            image: None,
            drag: None,
            load_gen: 0,
        }
    }

    pub fn frame(&self) -> &FrameRect {
        &self.frame
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn image(&self) -> Option<&Arc<PreparedImage>> {
        self.image.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            viewport: self.viewport,
            placement: self.placement,
        }
    }

    /// Restores frame/viewport/placement from a snapshot, keeping the
    /// currently loaded image. Placement is re-clamped so the invariants
    /// hold against the restored geometry.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.frame = snapshot.frame;
        self.viewport = snapshot.viewport;
        self.placement = snapshot.placement;
        self.reclamp();
    }

    /// Frame size in display pixels under the live viewport.
    fn frame_px(&self) -> FramePx {
        FramePx {
            width: self.frame.width * self.viewport.scale_ratio,
            height: self.frame.height * self.viewport.scale_ratio,
        }
    }

    /// Viewport resize. Placement deliberately stays in raw display
    /// pixels (the visual crop is not rescaled); it is only re-clamped so
    /// the cover/offset invariants hold at the new scale ratio.
    pub fn set_container_width(&mut self, container_width: Option<f64>) {
        self.viewport = Viewport::from_container_width(container_width);
        self.reclamp();
    }

    /// Starts a new image load, superseding any in-flight one.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_gen += 1;
        tracing::debug!(generation = self.load_gen, "image load started");
        LoadTicket(self.load_gen)
    }

    /// Commits a finished load. Returns `false` (and changes nothing) if a
    /// newer load has started since the ticket was issued.
    pub fn commit_load(&mut self, ticket: LoadTicket, image: Arc<PreparedImage>) -> bool {
        if ticket.0 != self.load_gen {
            tracing::debug!(
                stale = ticket.0,
                current = self.load_gen,
                "stale image load dropped"
            );
            return false;
        }
        self.placement = Placement::cover(self.frame_px(), image.width, image.height);
        self.image = Some(image);
        self.drag = None;
        true
    }

    /// Back to cover scale, centered. Keeps the loaded image.
    pub fn reset(&mut self) {
        let Some(img) = self.image.clone() else {
            return;
        };
        self.placement = Placement::cover(self.frame_px(), img.width, img.height);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        let Some(img) = self.image.clone() else {
            return;
        };
        self.placement.pan(dx, dy, self.frame_px(), img.width, img.height);
    }

    /// Wheel zoom: ±8% per notch, positive notches zoom in.
    pub fn wheel_zoom(&mut self, notches: f64) {
        if notches == 0.0 {
            return;
        }
        let step = 1.0 + notches.signum() * WHEEL_ZOOM_INTENSITY;
        self.zoom_by(step.powi(notches.abs().round().max(1.0) as i32));
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(BUTTON_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / BUTTON_ZOOM_STEP);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        let Some(img) = self.image.clone() else {
            return;
        };
        self.placement
            .zoom(factor, self.frame_px(), img.width, img.height);
    }

    pub fn expand_frame_by(&mut self, factor: f64) {
        self.frame.expand_by(factor);
        self.reclamp();
    }

    pub fn set_frame_size(&mut self, width: f64, height: f64) {
        self.frame.set_size(width, height);
        self.reclamp();
    }

    /// Feeds one pointer/touch event through the drag interpreter.
    /// Returns `true` when the event changed the placement (a redraw is
    /// needed). Everything is a no-op while no image is loaded.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        if self.image.is_none() {
            return false;
        }
        match event {
            PointerEvent::Down { x, y } => {
                let frame_px = self.frame.scaled(self.viewport.scale_ratio);
                if frame_px.hit_test(x, y) {
                    self.drag = Some(DragState { last_x: x, last_y: y });
                }
                false
            }
            PointerEvent::Move { x, y } => {
                let Some(drag) = self.drag.as_mut() else {
                    return false;
                };
                let dx = x - drag.last_x;
                let dy = y - drag.last_y;
                drag.last_x = x;
                drag.last_y = y;
                self.pan(dx, dy);
                true
            }
            PointerEvent::Up | PointerEvent::Leave | PointerEvent::Cancel => {
                self.drag = None;
                false
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Cursor hint: whether a surface-pixel point is over the frame.
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        self.frame.scaled(self.viewport.scale_ratio).hit_test(x, y)
    }

    fn reclamp(&mut self) {
        let Some(img) = self.image.clone() else {
            return;
        };
        self.placement
            .ensure_cover(self.frame_px(), img.width, img.height);
    }
}
