// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the qrwerk generator.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{QrError, Result};

/// Output resolution of the raster artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    Low,
    #[default]
    Medium,
    High,
}

impl ResolutionTier {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Width (and height) of the raster artifact in pixels.
    pub fn pixel_width(&self) -> u32 {
        match self {
            Self::Low => 600,
            Self::Medium => 1200,
            Self::High => 2400,
        }
    }

    /// Stable keyword used in forms and config files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Label shown in the quality selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low (600\u{d7}600)",
            Self::Medium => "Medium (1200\u{d7}1200)",
            Self::High => "High (2400\u{d7}2400)",
        }
    }
}

/// A validated `#rrggbb` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FillColor {
    rgb: [u8; 3],
}

impl FillColor {
    pub const BLACK: Self = Self { rgb: [0, 0, 0] };
    pub const WHITE: Self = Self { rgb: [255, 255, 255] };

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { rgb: [r, g, b] }
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand. Case-insensitive.
    pub fn parse(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| QrError::Encoding(format!("invalid colour {trimmed:?}: missing '#'")))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(QrError::Encoding(format!(
                "invalid colour {trimmed:?}: not a hex value"
            )));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            n => {
                return Err(QrError::Encoding(format!(
                    "invalid colour {trimmed:?}: expected 3 or 6 hex digits, got {n}"
                )));
            }
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|err| QrError::Encoding(format!("invalid colour {trimmed:?}: {err}")))
        };
        Ok(Self {
            rgb: [channel(0)?, channel(2)?, channel(4)?],
        })
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    /// Fully opaque RGBA bytes.
    pub fn rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.rgb;
        [r, g, b, 255]
    }

    /// Canonical lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.rgb;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for FillColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for FillColor {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FillColor> for String {
    fn from(color: FillColor) -> Self {
        color.to_hex()
    }
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    High,
}

/// Parameters handed to the encoder for one representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub dark: FillColor,
    pub light: FillColor,
    /// Output width in pixels (raster) or declared width (vector).
    pub pixel_width: u32,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub error_correction: ErrorCorrection,
}

impl EncodeOptions {
    pub const DEFAULT_MARGIN: u32 = 1;

    pub fn for_input(input: &EncodingInput, error_correction: ErrorCorrection) -> Self {
        Self {
            dark: input.fill_color,
            light: FillColor::WHITE,
            pixel_width: input.resolution.pixel_width(),
            margin: Self::DEFAULT_MARGIN,
            error_correction,
        }
    }
}

/// Everything the user controls apart from the logo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingInput {
    /// Raw text as typed (may be empty).
    pub content: String,
    pub fill_color: FillColor,
    pub resolution: ResolutionTier,
}

/// An uploaded vector logo. Only SVG payloads can be constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoAsset {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl LogoAsset {
    /// Accept a logo upload, rejecting anything that is not a vector image.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let mime_type = mime_type.into();
        if !is_vector_mime(&mime_type) {
            return Err(QrError::InvalidFileType(mime_type));
        }
        Ok(Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for LogoAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoAsset")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Whether a MIME type names a vector image we can composite.
pub fn is_vector_mime(mime_type: &str) -> bool {
    mime_type.to_ascii_lowercase().contains("svg")
}

/// Infer a MIME type from a file extension (desktop pickers only give paths).
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "svg" | "svgz" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// The generated output pair for the current input.
#[derive(Clone, PartialEq, Eq)]
pub struct QrArtifact {
    /// The exact string that was encoded.
    pub content: String,
    /// PNG-encoded raster, logo included when present.
    pub raster_png: Vec<u8>,
    /// Raster width (and height) in pixels.
    pub raster_width: u32,
    /// SVG markup. Never contains the logo.
    pub vector_markup: String,
    pub has_logo: bool,
    pub is_default_placeholder: bool,
}

impl QrArtifact {
    /// `data:` URL suitable for an `<img src>` preview.
    pub fn raster_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.raster_png))
    }
}

impl std::fmt::Debug for QrArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrArtifact")
            .field("content", &self.content)
            .field("raster_png_len", &self.raster_png.len())
            .field("raster_width", &self.raster_width)
            .field("vector_markup_len", &self.vector_markup.len())
            .field("has_logo", &self.has_logo)
            .field("is_default_placeholder", &self.is_default_placeholder)
            .finish()
    }
}

/// Lifecycle of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
    Ready,
    Failed,
}

/// Download formats offered once a user artifact exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    Raster,
    Vector,
    Document,
}

impl ExportFormat {
    pub const ALL: [Self; 3] = [Self::Raster, Self::Vector, Self::Document];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Raster => "png",
            Self::Vector => "svg",
            Self::Document => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Raster => "image/png",
            Self::Vector => "image/svg+xml",
            Self::Document => "application/pdf",
        }
    }

    /// Upper-case name used in notifications ("PNG", "SVG", "PDF").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Raster => "PNG",
            Self::Vector => "SVG",
            Self::Document => "PDF",
        }
    }
}

/// A serialised artifact ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write to an explicit path (e.g. one chosen in a save dialog).
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)
            .map_err(|err| QrError::Export(format!("failed to write {}: {err}", path.display())))
    }
}

/// Standard paper sizes for document export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}
