// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR encoder — turns content into a module matrix (via the `qrcode` crate)
// and renders that matrix as an exact-size raster or as SVG markup.

use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use qrwerk_core::error::{QrError, Result};
use qrwerk_core::types::{EncodeOptions, ErrorCorrection};
use tracing::{debug, instrument};

/// Encoder seam used by the composition pipeline.
///
/// Both methods must produce the same symbol for the same content and
/// options, so the raster and vector artifacts always agree.
pub trait QrEncoder: Send + Sync {
    /// Render `content` as a `pixel_width` square RGBA image.
    fn encode_raster(&self, content: &str, options: &EncodeOptions) -> Result<RgbaImage>;

    /// Render `content` as a standalone SVG document.
    fn encode_vector(&self, content: &str, options: &EncodeOptions) -> Result<String>;
}

/// Default encoder backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleEncoder;

impl QrEncoder for ModuleEncoder {
    #[instrument(skip(self, content), fields(content_len = content.len(), width = options.pixel_width))]
    fn encode_raster(&self, content: &str, options: &EncodeOptions) -> Result<RgbaImage> {
        let matrix = ModuleMatrix::encode(content, options.error_correction)?;
        render_raster(&matrix, options)
    }

    #[instrument(skip(self, content), fields(content_len = content.len(), width = options.pixel_width))]
    fn encode_vector(&self, content: &str, options: &EncodeOptions) -> Result<String> {
        let matrix = ModuleMatrix::encode(content, options.error_correction)?;
        render_svg(&matrix, options)
    }
}

/// Square grid of dark/light modules, without quiet zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    pub fn encode(content: &str, level: ErrorCorrection) -> Result<Self> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), ec_level(level))
            .map_err(|err| QrError::Encoding(format!("{err}")))?;
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();
        debug!(modules = width, ?level, "symbol encoded");
        Ok(Self { width, dark })
    }

    /// Modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at (`x`, `y`) is dark. Coordinates outside the
    /// symbol (the quiet zone) are light.
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        let w = self.width as i64;
        if x < 0 || y < 0 || x >= w || y >= w {
            return false;
        }
        self.dark[(y * w + x) as usize]
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::Low => EcLevel::L,
        ErrorCorrection::Medium => EcLevel::M,
        ErrorCorrection::Quartile => EcLevel::Q,
        ErrorCorrection::High => EcLevel::H,
    }
}

/// Side length of the symbol plus quiet zone, in modules.
fn total_modules(matrix: &ModuleMatrix, options: &EncodeOptions) -> u32 {
    matrix.width() as u32 + 2 * options.margin
}

/// Render exactly `pixel_width` × `pixel_width` pixels. Each pixel samples
/// the module it falls in, so module edges may differ by one pixel when the
/// width is not a multiple of the module count.
fn render_raster(matrix: &ModuleMatrix, options: &EncodeOptions) -> Result<RgbaImage> {
    let size = options.pixel_width;
    let total = total_modules(matrix, options);
    if size < total {
        return Err(QrError::Encoding(format!(
            "pixel width {size} is smaller than the {total} modules of the symbol"
        )));
    }

    let margin = options.margin as i64;
    let dark = Rgba(options.dark.rgba());
    let light = Rgba(options.light.rgba());
    let module_of = |px: u32| (px as u64 * total as u64 / size as u64) as i64 - margin;

    let image = RgbaImage::from_fn(size, size, |x, y| {
        if matrix.is_dark(module_of(x), module_of(y)) {
            dark
        } else {
            light
        }
    });
    debug!(size, total, "raster rendered");
    Ok(image)
}

/// Render the symbol as SVG. The `viewBox` is in module units and the
/// declared width/height is `pixel_width`.
fn render_svg(matrix: &ModuleMatrix, options: &EncodeOptions) -> Result<String> {
    if options.pixel_width == 0 {
        return Err(QrError::Encoding("pixel width must be positive".into()));
    }
    let total = total_modules(matrix, options);
    let margin = options.margin as i64;

    let mut path = String::new();
    for y in 0..matrix.width() as i64 {
        for x in 0..matrix.width() as i64 {
            if matrix.is_dark(x, y) {
                if !path.is_empty() {
                    path.push(' ');
                }
                path += &format!("M{},{}h1v1h-1z", x + margin, y + margin);
            }
        }
    }

    let mut svg = String::new();
    svg += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    svg += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {1} {1}\" shape-rendering=\"crispEdges\">\n",
        options.pixel_width, total
    );
    svg += &format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        options.light.to_hex()
    );
    svg += &format!("\t<path d=\"{}\" fill=\"{}\"/>\n", path, options.dark.to_hex());
    svg += "</svg>\n";
    Ok(svg)
}
