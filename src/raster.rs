//! Premultiplied-RGBA8 pixel primitives shared by the renderer.

use crate::decode::PreparedImage;

pub type PremulRgba8 = [u8; 4];

/// Source-over blend of premultiplied pixels, with an extra opacity
/// applied to the source.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = mul_div255(u16::from(dst[3]), inv).saturating_add(sa);

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Bilinear sample at pixel coordinates `(x, y)`. Samples outside the
/// image rect are transparent; in-bounds taps clamp to the edge so
/// border pixels do not bleed toward transparency. Premultiplied pixels
/// interpolate without fringing.
pub fn sample_bilinear(img: &PreparedImage, x: f64, y: f64) -> PremulRgba8 {
    let w = img.width as i64;
    let h = img.height as i64;
    if w == 0 || h == 0 || x < 0.0 || y < 0.0 || x > w as f64 || y > h as f64 {
        return [0, 0, 0, 0];
    }

    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let tx = (fx - x0 as f64) as f32;
    let ty = (fy - y0 as f64) as f32;

    let fetch = |px: i64, py: i64| -> [f32; 4] {
        let px = px.clamp(0, w - 1);
        let py = py.clamp(0, h - 1);
        let idx = ((py * w + px) * 4) as usize;
        let p = &img.rgba8_premul[idx..idx + 4];
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
    };

    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1, y0);
    let p01 = fetch(x0, y0 + 1);
    let p11 = fetch(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = p00[i] * (1.0 - tx) + p10[i] * tx;
        let bot = p01[i] * (1.0 - tx) + p11[i] * tx;
        out[i] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Converts a premultiplied buffer back to straight alpha, for encoders.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

pub fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
