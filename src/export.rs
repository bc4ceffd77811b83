//! High-resolution export: the live composite re-rendered at a fixed
//! multiple of the reference space and encoded as PNG.

use std::io::Cursor;

use anyhow::Context;

use crate::{
    decode::PreparedImage,
    error::AfficheResult,
    raster::unpremultiply_rgba8_in_place,
    render::{FrameRgba, RenderTarget, render_state},
    state::CompositorState,
};

/// Pixels per reference unit in the exported image.
pub const EXPORT_QUALITY_FACTOR: f64 = 3.0;
/// Download filename for the exported composite.
pub const EXPORT_FILENAME: &str = "affiche_hd.png";

/// Renders the HD composite. The background is taken as a parameter so
/// callers can re-decode it independently of the preview's copy.
#[tracing::instrument(skip_all)]
pub fn export_hd(
    state: &CompositorState,
    background: &PreparedImage,
) -> AfficheResult<FrameRgba> {
    let target = RenderTarget::export(EXPORT_QUALITY_FACTOR);
    let out = render_state(state, background, &target)?;
    tracing::info!(width = out.width, height = out.height, "exported HD composite");
    Ok(out)
}

/// Encodes a rendered surface as PNG bytes (straight alpha).
pub fn encode_png(frame: &FrameRgba) -> AfficheResult<Vec<u8>> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .context("surface buffer does not match its dimensions")?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::{REFERENCE_HEIGHT, REFERENCE_WIDTH};

    fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> Arc<PreparedImage> {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Arc::new(PreparedImage {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    #[test]
    fn export_is_reference_times_quality_factor() {
        let mut state = CompositorState::new();
        let ticket = state.begin_load();
        state.commit_load(ticket, solid_image(300, 400, [255, 0, 0, 255]));

        let bg = solid_image(8, 8, [10, 10, 10, 255]);
        let out = export_hd(&state, &bg).unwrap();
        assert_eq!(out.width, (REFERENCE_WIDTH * 3.0) as u32);
        assert_eq!(out.height, (REFERENCE_HEIGHT * 3.0) as u32);
        assert_eq!(out.width, 1497);
        assert_eq!(out.height, 1815);
    }

    #[test]
    fn encode_png_round_trips_dimensions() {
        let frame = FrameRgba {
            width: 3,
            height: 2,
            data: vec![255; 3 * 2 * 4],
            premultiplied: true,
        };
        let png = encode_png(&frame).unwrap();
        let back = image::load_from_memory(&png).unwrap();
        assert_eq!(back.width(), 3);
        assert_eq!(back.height(), 2);
    }

    #[test]
    fn filename_is_stable() {
        assert_eq!(EXPORT_FILENAME, "affiche_hd.png");
    }
}
