//! Aspect-preserving preview scaling.

use anyhow::{Context, Result};
use fast_image_resize as fir;
use image::RgbaImage;

/// Compute the contain-fit dimensions for a `src_w x src_h` bitmap inside a
/// `box_w x box_h` bounding box, preserving aspect ratio. Sources smaller
/// than the box scale up.
#[must_use]
pub fn contain_dimensions(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let iw = src_w.max(1) as f32;
    let ih = src_h.max(1) as f32;
    let bw = box_w.max(1) as f32;
    let bh = box_h.max(1) as f32;
    let scale = (bw / iw).min(bh / ih).max(0.0);
    let scale = if scale.is_finite() { scale } else { 1.0 };
    let w = (iw * scale).round().clamp(1.0, bw);
    let h = (ih * scale).round().clamp(1.0, bh);
    (w as u32, h as u32)
}

/// Scale `source` to fit within `box_w x box_h` using a Catmull-Rom
/// convolution. Returns a plain clone when the source already has the
/// target dimensions.
pub fn fit_within(source: &RgbaImage, box_w: u32, box_h: u32) -> Result<RgbaImage> {
    if source.width() == 0 || source.height() == 0 {
        anyhow::bail!("cannot scale an empty bitmap");
    }
    let (target_w, target_h) = contain_dimensions(source.width(), source.height(), box_w, box_h);
    if source.width() == target_w && source.height() == target_h {
        return Ok(source.clone());
    }

    let src_view = fir::images::ImageRef::new(
        source.width(),
        source.height(),
        source.as_raw(),
        fir::PixelType::U8x4,
    )
    .context("failed to create source view for preview resize")?;
    let mut dst_image = fir::images::Image::new(target_w, target_h, fir::PixelType::U8x4);
    let options = fir::ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::CatmullRom));
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_view, &mut dst_image, Some(&options))
        .context("preview resize failed")?;
    let buffer = dst_image.into_vec();
    RgbaImage::from_raw(target_w, target_h, buffer)
        .ok_or_else(|| anyhow::anyhow!("failed to construct resized RGBA image"))
}
