// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — lay a QR raster out on a single page using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use qrwerk_core::PaperSize;
use qrwerk_core::error::{QrError, Result};
use tracing::{debug, info, instrument};

/// Fraction of the page width taken by the QR image.
pub const IMAGE_WIDTH_RATIO: f32 = 0.8;
/// Distance from the top edge of the page to the top of the image.
const TOP_MARGIN_MM: f32 = 20.0;
/// Gap between the bottom of the image and the caption baseline.
const CAPTION_GAP_MM: f32 = 10.0;
const CAPTION_FONT_PT: f32 = 16.0;
/// Nominal resolution the raster is embedded at; scaling is applied on top.
const EMBED_DPI: f32 = 300.0;

/// Creates a one-page PDF holding a QR image and a caption.
pub struct PdfWriter {
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    caption: String,
}

impl PdfWriter {
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
            caption: "QR Code".into(),
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set the text printed under the image.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Place the PNG `image_bytes` horizontally centred at 80% of the page
    /// width, 20 mm below the top edge, with the caption centred 10 mm
    /// under it.
    #[instrument(skip(self, image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn create_from_qr(&self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("QR Code");

        info!(paper = ?self.paper_size, title, "Creating QR PDF");

        let dynamic_image = ::image::load_from_memory(image_bytes).map_err(|err| {
            QrError::ImageDecode(format!("failed to decode image for PDF: {err}"))
        })?;

        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;

        // printpdf wants raw RGB8.
        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        let rendered_w_pt = page_w_pt * IMAGE_WIDTH_RATIO;
        let native_w_pt = img_width as f32 / EMBED_DPI * 72.0;
        let scale = rendered_w_pt / native_w_pt;
        let rendered_h_pt = img_height as f32 / EMBED_DPI * 72.0 * scale;

        // PDF origin is bottom-left.
        let x_offset = (page_w_pt - rendered_w_pt) / 2.0;
        let y_offset = page_h_pt - Mm(TOP_MARGIN_MM).into_pt().0 - rendered_h_pt;

        let caption_w_pt = estimate_helvetica_width(&self.caption, CAPTION_FONT_PT);
        let caption_x = (page_w_pt - caption_w_pt) / 2.0;
        let caption_y = y_offset - Mm(CAPTION_GAP_MM).into_pt().0;

        let ops = vec![
            Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_offset)),
                    translate_y: Some(Pt(y_offset)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(EMBED_DPI),
                    rotate: None,
                },
            },
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: Pt(caption_x),
                    y: Pt(caption_y),
                },
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(CAPTION_FONT_PT),
                font: BuiltinFont::Helvetica,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(self.caption.clone())],
                font: BuiltinFont::Helvetica,
            },
            Op::EndTextSection,
        ];

        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        debug!(rendered_w_pt, rendered_h_pt, scale, x_offset, y_offset, "QR placed on page");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }
}

/// Rough Helvetica advance width of `text` in points, for centring.
fn estimate_helvetica_width(text: &str, font_size_pt: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            ' ' => 0.278,
            'i' | 'j' | 'l' | '.' | ',' | '\'' => 0.25,
            'm' | 'w' | 'M' | 'W' => 0.85,
            c if c.is_ascii_uppercase() => 0.7,
            c if c.is_ascii_digit() => 0.556,
            _ => 0.55,
        })
        .sum();
    em * font_size_pt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encode_png;
    use image::{Rgba, RgbaImage};

    fn sample_png() -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(600, 600, Rgba([0, 0, 0, 255]))).unwrap()
    }

    #[test]
    fn produces_single_page_pdf() {
        let bytes = PdfWriter::new(PaperSize::A4).create_from_qr(&sample_png()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_draws_image_and_caption() {
        let mut writer = PdfWriter::new(PaperSize::A4);
        writer.set_caption("Scan me");
        let bytes = writer.create_from_qr(&sample_png()).unwrap();

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        let ops = lopdf::content::Content::decode(&content).unwrap().operations;

        assert!(ops.iter().any(|op| op.operator == "Do"), "image XObject drawn");
        assert!(
            ops.iter().any(|op| op.operator == "Tj" || op.operator == "TJ"),
            "caption text shown"
        );
    }

    fn number(obj: &lopdf::Object) -> f32 {
        match obj {
            lopdf::Object::Integer(i) => *i as f32,
            lopdf::Object::Real(r) => *r as f32,
            other => panic!("not a number: {other:?}"),
        }
    }

    fn operands(ops: &[lopdf::content::Operation], operator: &str) -> Vec<f32> {
        ops.iter()
            .rev()
            .find(|op| op.operator == operator)
            .unwrap_or_else(|| panic!("no {operator} operator"))
            .operands
            .iter()
            .map(number)
            .collect()
    }

    #[test]
    fn a4_layout_matches_fixed_geometry() {
        let png = encode_png(&RgbaImage::from_pixel(1200, 1200, Rgba([0, 0, 0, 255]))).unwrap();
        let bytes = PdfWriter::new(PaperSize::A4).create_from_qr(&png).unwrap();

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        let ops = lopdf::content::Content::decode(&content).unwrap().operations;

        let page_w = Mm(210.0).into_pt().0;
        let page_h = Mm(297.0).into_pt().0;
        let mm = |v: f32| Mm(v).into_pt().0;
        let close = |a: f32, b: f32| (a - b).abs() < 0.5;

        // Image placement: [w 0 0 h x y] cm.
        let cm = operands(&ops, "cm");
        let (w, h, x, y) = (cm[0], cm[3], cm[4], cm[5]);
        assert!(close(w, page_w * IMAGE_WIDTH_RATIO), "width {w}");
        assert!(close(h, w), "square image keeps its aspect ratio");
        assert!(close(x, (page_w - w) / 2.0), "x {x}");
        assert!(close(page_h - (y + h), mm(TOP_MARGIN_MM)), "top gap {}", page_h - (y + h));

        // Caption baseline 10 mm under the image.
        let td = operands(&ops, "Td");
        assert!(close(td[1], y - mm(CAPTION_GAP_MM)), "caption y {}", td[1]);
        assert!(td[0] > x && td[0] < page_w / 2.0, "caption is centred");
    }

    #[test]
    fn undecodable_image_is_rejected() {
        let result = PdfWriter::new(PaperSize::A4).create_from_qr(b"not a png");
        assert!(matches!(result, Err(QrError::ImageDecode(_))));
    }

    #[test]
    fn width_estimate_grows_with_text() {
        let short = estimate_helvetica_width("QR", 16.0);
        let long = estimate_helvetica_width("QR Code", 16.0);
        assert!(long > short);
        assert!((long - 64.5).abs() < 5.0);
    }
}
