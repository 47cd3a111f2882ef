// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SVG logo decoding — rasterise a vector logo into an RGBA bitmap with
// `resvg`, fitted inside a bounding box.

use image::{Rgba, RgbaImage};
use qrwerk_core::error::{QrError, Result};
use resvg::{tiny_skia, usvg};
use tracing::{debug, instrument};

/// Decode `svg` and rasterise it to fit within `max_width` × `max_height`,
/// preserving its aspect ratio. Transparent areas stay transparent.
#[instrument(skip(svg), fields(svg_len = svg.len()))]
pub fn rasterize_svg(svg: &[u8], max_width: u32, max_height: u32) -> Result<RgbaImage> {
    if max_width == 0 || max_height == 0 {
        return Err(QrError::ImageDecode(
            "logo bounding box has zero size".into(),
        ));
    }

    let tree = usvg::Tree::from_data(svg, &usvg::Options::default())
        .map_err(|err| QrError::ImageDecode(format!("failed to decode logo: {err}")))?;

    let size = tree.size();
    let (src_w, src_h) = (size.width(), size.height());
    if src_w <= 0.0 || src_h <= 0.0 {
        return Err(QrError::ImageDecode("logo has no drawable area".into()));
    }

    let scale = (max_width as f32 / src_w).min(max_height as f32 / src_h);
    let width = ((src_w * scale).round() as u32).clamp(1, max_width);
    let height = ((src_h * scale).round() as u32).clamp(1, max_height);

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| QrError::ImageDecode("drawing surface unavailable".into()))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied alpha; `image` expects straight alpha.
    let mut bitmap = RgbaImage::new(width, height);
    for (dst, src) in bitmap.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    debug!(src_w, src_h, width, height, "logo rasterised");
    Ok(bitmap)
}
