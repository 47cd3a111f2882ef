// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logo compositor — place a vector logo in the centre of a QR raster on top
// of an opaque white backing square. Operates on in-memory images using the
// `image` and `imageproc` crates.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrwerk_core::error::{QrError, Result};
use tracing::{debug, info, instrument};

use super::logo::rasterize_svg;

/// Logo side length as a fraction of the QR image width.
pub const LOGO_SCALE: f32 = 0.15;

/// Extra white margin around the logo, as a fraction of the QR image width.
pub const LOGO_PADDING: f32 = 0.02;

const BACKING: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Where the logo and its backing go on a QR image of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoBox {
    /// Top-left corner of the logo square.
    pub x: u32,
    pub y: u32,
    /// Side of the logo square.
    pub size: u32,
    /// White margin added on every side of the logo square.
    pub padding: u32,
}

impl LogoBox {
    /// Centred box for a `width` × `height` QR image. Both the logo size
    /// and the padding scale with the width.
    pub fn centered(width: u32, height: u32) -> Self {
        let size = ((width as f32 * LOGO_SCALE).round() as u32).min(width.min(height));
        let padding = (width as f32 * LOGO_PADDING).round() as u32;
        Self {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
            padding,
        }
    }

    /// The backing rectangle: the logo square inflated by `padding`.
    pub fn backing_rect(&self) -> Rect {
        let x = self.x.saturating_sub(self.padding);
        let y = self.y.saturating_sub(self.padding);
        let side = self.size + 2 * self.padding;
        Rect::at(x as i32, y as i32).of_size(side, side)
    }
}

/// Compositing pipeline operating on a single QR raster.
///
/// Operations consume `self` and return a new `LogoCompositor`, so a failed
/// step never leaves a half-drawn image behind.
pub struct LogoCompositor {
    image: RgbaImage,
}

impl LogoCompositor {
    /// Wrap an already-rendered QR raster.
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn logo_box(&self) -> LogoBox {
        LogoBox::centered(self.width(), self.height())
    }

    /// Decode `logo_svg`, paint the white backing, then draw the logo,
    /// fitted inside the centred logo square.
    #[instrument(skip(self, logo_svg), fields(width = self.width(), logo_len = logo_svg.len()))]
    pub fn composite_svg(self, logo_svg: &[u8]) -> Result<Self> {
        let placement = self.logo_box();
        // Decode before touching the image.
        let logo = rasterize_svg(logo_svg, placement.size, placement.size)?;
        Ok(self.composite_bitmap(&logo, placement))
    }

    /// Paint the backing rectangle and overlay an already-decoded logo,
    /// centred inside `placement`.
    pub fn composite_bitmap(mut self, logo: &RgbaImage, placement: LogoBox) -> Self {
        draw_filled_rect_mut(&mut self.image, placement.backing_rect(), BACKING);

        let offset_x = placement.x + placement.size.saturating_sub(logo.width()) / 2;
        let offset_y = placement.y + placement.size.saturating_sub(logo.height()) / 2;
        imageops::overlay(&mut self.image, logo, offset_x as i64, offset_y as i64);

        info!(
            x = offset_x,
            y = offset_y,
            logo_w = logo.width(),
            logo_h = logo.height(),
            padding = placement.padding,
            "Logo composited"
        );
        self
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Serialise an RGBA image to PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| QrError::Encoding(format!("PNG encoding failed: {err}")))?;
    debug!(bytes = buffer.len(), "PNG encoded");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE_LOGO: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20"><rect width="20" height="20" fill="#0000ff"/></svg>"##;

    fn black_square(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn box_scales_with_width() {
        let b = LogoBox::centered(600, 600);
        assert_eq!((b.x, b.y, b.size, b.padding), (255, 255, 90, 12));

        let b = LogoBox::centered(2400, 2400);
        assert_eq!((b.x, b.size, b.padding), (1020, 360, 48));

        let rect = LogoBox::centered(1200, 1200).backing_rect();
        assert_eq!((rect.left(), rect.top()), (486, 486));
        assert_eq!((rect.width(), rect.height()), (228, 228));
    }

    #[test]
    fn logo_is_centred_on_white_backing() {
        let composed = LogoCompositor::new(black_square(600))
            .composite_svg(BLUE_LOGO)
            .unwrap()
            .into_image();

        // Centre is logo.
        assert_eq!(composed.get_pixel(300, 300), &Rgba([0, 0, 255, 255]));
        // Padding ring is white.
        assert_eq!(composed.get_pixel(250, 300), &Rgba([255, 255, 255, 255]));
        assert_eq!(composed.get_pixel(243, 243), &Rgba([255, 255, 255, 255]));
        // Outside the backing is untouched.
        assert_eq!(composed.get_pixel(242, 300), &Rgba([0, 0, 0, 255]));
        assert_eq!(composed.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn bad_logo_fails_without_output() {
        let result = LogoCompositor::new(black_square(600)).composite_svg(b"<svg");
        assert!(matches!(result, Err(QrError::ImageDecode(_))));
    }

    #[test]
    fn png_encoding_keeps_dimensions() {
        let bytes = encode_png(&black_square(64)).unwrap();
        let reloaded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (64, 64));
    }
}
