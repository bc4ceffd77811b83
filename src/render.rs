//! Resolution-independent CPU compositor.
//!
//! The same routine renders the live preview and the HD export: a target
//! carries its own `units_to_pixels` factor, and the stored placement
//! (which lives in *live* display pixels) is re-projected by
//! `target_units_to_pixels / live_units_to_pixels`. Rendering at the live
//! resolution therefore reproduces the preview exactly, and any export
//! multiplier preserves the relative layout.
//!
//! Layers, bottom to top:
//! 1. background image scaled to the full surface
//! 2. the user image, bilinear-sampled, clipped to the rounded frame
//! 3. the frame border stroke (white at 0.85 alpha), drawn unclipped

use crate::{
    decode::PreparedImage,
    error::{AfficheError, AfficheResult},
    geometry::{FrameRect, REFERENCE_HEIGHT, REFERENCE_WIDTH, Viewport},
    placement::Placement,
    raster::{over, sample_bilinear},
    state::CompositorState,
};

/// Border stroke color, straight alpha (white at 85% opacity).
const BORDER_RGBA: [f32; 4] = [255.0, 255.0, 255.0, 0.85 * 255.0];

/// An RGBA8 output surface, premultiplied.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// A render resolution: surface size plus the reference-unit scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
    pub units_to_pixels: f64,
}

impl RenderTarget {
    /// The live preview surface.
    pub fn live(viewport: &Viewport) -> Self {
        Self {
            width: viewport.width.round().max(1.0) as u32,
            height: viewport.height.round().max(1.0) as u32,
            units_to_pixels: viewport.scale_ratio,
        }
    }

    /// An export surface at `multiplier` pixels per reference unit.
    pub fn export(multiplier: f64) -> Self {
        Self {
            width: (REFERENCE_WIDTH * multiplier).round().max(1.0) as u32,
            height: (REFERENCE_HEIGHT * multiplier).round().max(1.0) as u32,
            units_to_pixels: multiplier,
        }
    }
}

/// Renders the full composite for a state at an arbitrary target.
#[tracing::instrument(skip_all, fields(width = target.width, height = target.height))]
pub fn render_state(
    state: &CompositorState,
    background: &PreparedImage,
    target: &RenderTarget,
) -> AfficheResult<FrameRgba> {
    render_composite(
        state.frame(),
        state.placement(),
        state.viewport().scale_ratio,
        state.image().map(|img| img.as_ref()),
        background,
        target,
    )
}

/// Renders background + clipped user image + border at the target
/// resolution. `live_scale_ratio` is the pixel density the placement was
/// authored at; `image == None` renders the background alone.
pub fn render_composite(
    frame: &FrameRect,
    placement: &Placement,
    live_scale_ratio: f64,
    image: Option<&PreparedImage>,
    background: &PreparedImage,
    target: &RenderTarget,
) -> AfficheResult<FrameRgba> {
    if target.width == 0 || target.height == 0 || target.units_to_pixels <= 0.0 {
        return Err(AfficheError::render("target surface is degenerate"));
    }
    if live_scale_ratio <= 0.0 {
        return Err(AfficheError::render("live scale ratio must be positive"));
    }

    let w = target.width as usize;
    let h = target.height as usize;
    let mut data = vec![0u8; w * h * 4];

    draw_background(&mut data, w, h, background);

    let frame_px = frame.scaled(target.units_to_pixels);

    if let Some(img) = image {
        // Placement is stored relative to the live surface's density;
        // re-project it into the target's.
        let reproject = target.units_to_pixels / live_scale_ratio;
        let draw_w = (f64::from(img.width) * placement.scale * reproject).max(1.0);
        let draw_h = (f64::from(img.height) * placement.scale * reproject).max(1.0);
        let center = frame_px.center();
        let draw_x = center.x - draw_w / 2.0 + placement.offset_x * reproject;
        let draw_y = center.y - draw_h / 2.0 + placement.offset_y * reproject;

        let (x0, y0, x1, y1) = clip_span(&frame_px, 1.0, w, h);
        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f64 + 0.5;
                let cy = py as f64 + 0.5;
                let cov = frame_px.coverage(cx, cy);
                if cov <= 0.0 {
                    continue;
                }
                let u = (cx - draw_x) / draw_w * f64::from(img.width);
                let v = (cy - draw_y) / draw_h * f64::from(img.height);
                let src = sample_bilinear(img, u, v);
                blend_px(&mut data, w, px, py, src, cov as f32);
            }
        }
    }

    draw_border(&mut data, w, h, &frame_px, target.units_to_pixels);

    Ok(FrameRgba {
        width: target.width,
        height: target.height,
        data,
        premultiplied: true,
    })
}

fn draw_background(data: &mut [u8], w: usize, h: usize, background: &PreparedImage) {
    let sx = f64::from(background.width) / w as f64;
    let sy = f64::from(background.height) / h as f64;
    for py in 0..h {
        for px in 0..w {
            let src = sample_bilinear(
                background,
                (px as f64 + 0.5) * sx,
                (py as f64 + 0.5) * sy,
            );
            let idx = (py * w + px) * 4;
            data[idx..idx + 4].copy_from_slice(&src);
        }
    }
}

fn draw_border(data: &mut [u8], w: usize, h: usize, frame_px: &FrameRect, units_to_pixels: f64) {
    let line_width = 2.0 * units_to_pixels.max(1.0);
    let half = line_width / 2.0;

    let alpha = BORDER_RGBA[3] / 255.0;
    let premul = |c: f32| (c * alpha).round() as u8;
    let stroke: [u8; 4] = [
        premul(BORDER_RGBA[0]),
        premul(BORDER_RGBA[1]),
        premul(BORDER_RGBA[2]),
        (BORDER_RGBA[3]).round() as u8,
    ];

    let (x0, y0, x1, y1) = clip_span(frame_px, half + 1.0, w, h);
    for py in y0..y1 {
        for px in x0..x1 {
            let dist = frame_px
                .signed_distance(px as f64 + 0.5, py as f64 + 0.5)
                .abs();
            let cov = (0.5 + (half - dist)).clamp(0.0, 1.0);
            if cov <= 0.0 {
                continue;
            }
            blend_px(data, w, px, py, stroke, cov as f32);
        }
    }
}

/// Pixel span of the frame's bounding box inflated by `margin`, clipped
/// to the surface.
fn clip_span(frame_px: &FrameRect, margin: f64, w: usize, h: usize) -> (usize, usize, usize, usize) {
    let x0 = ((frame_px.x - margin).floor().max(0.0)) as usize;
    let y0 = ((frame_px.y - margin).floor().max(0.0)) as usize;
    let x1 = ((frame_px.x + frame_px.width + margin).ceil().max(0.0) as usize).min(w);
    let y1 = ((frame_px.y + frame_px.height + margin).ceil().max(0.0) as usize).min(h);
    (x0.min(x1), y0.min(y1), x1, y1)
}

fn blend_px(data: &mut [u8], w: usize, px: usize, py: usize, src: [u8; 4], opacity: f32) {
    let idx = (py * w + px) * 4;
    let dst = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];
    let out = over(dst, src, opacity);
    data[idx..idx + 4].copy_from_slice(&out);
}
