//! Circular-cutout composite for the upload endpoint. Independent of the
//! interactive compositor: the upload is cover-resized into a 100×100
//! cell, masked to a disc, and pasted onto a static template.

use std::io::Cursor;

use anyhow::Context;
use image::{RgbaImage, imageops};

use crate::error::AfficheResult;

/// Side of the square cell the upload is resized into.
pub const BADGE_SIZE: u32 = 100;
/// Disc radius, centered in the cell.
pub const BADGE_RADIUS: u32 = 50;
/// Top-left position of the cell on the template.
pub const BADGE_OFFSET: (i64, i64) = (50, 50);

/// Decodes an upload and produces the masked 100×100 cell: cover-resized
/// (centered both ways), opaque inside the disc, transparent outside.
pub fn circular_cell(photo_bytes: &[u8]) -> AfficheResult<RgbaImage> {
    let photo = image::load_from_memory(photo_bytes).context("decode uploaded photo")?;
    let mut cell = photo
        .resize_to_fill(BADGE_SIZE, BADGE_SIZE, imageops::FilterType::Triangle)
        .to_rgba8();

    let r2 = i64::from(BADGE_RADIUS) * i64::from(BADGE_RADIUS);
    let c = i64::from(BADGE_RADIUS);
    for (x, y, px) in cell.enumerate_pixels_mut() {
        let dx = i64::from(x) - c;
        let dy = i64::from(y) - c;
        px.0[3] = if dx * dx + dy * dy <= r2 { 255 } else { 0 };
    }
    Ok(cell)
}

/// Full composite: the circular cell pasted onto the template at the
/// fixed offset.
#[tracing::instrument(skip_all)]
pub fn compose_badge(template_bytes: &[u8], photo_bytes: &[u8]) -> AfficheResult<RgbaImage> {
    let mut template = image::load_from_memory(template_bytes)
        .context("decode template image")?
        .to_rgba8();
    let cell = circular_cell(photo_bytes)?;
    imageops::overlay(&mut template, &cell, BADGE_OFFSET.0, BADGE_OFFSET.1);
    Ok(template)
}

/// JPEG bytes of a composite (alpha flattened).
pub fn encode_jpeg(img: &RgbaImage) -> AfficheResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .context("encode jpeg")?;
    Ok(buf)
}
