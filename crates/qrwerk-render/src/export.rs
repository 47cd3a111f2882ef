// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export — serialise the live artifact as PNG, SVG or a one-page PDF.

use qrwerk_core::AppConfig;
use qrwerk_core::error::{QrError, Result};
use qrwerk_core::types::{ExportFormat, ExportedFile, PaperSize, QrArtifact};
use tracing::{info, instrument};

use crate::pdf::PdfWriter;

/// Turns a `QrArtifact` into downloadable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    file_stem: String,
    paper_size: PaperSize,
    caption: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl Exporter {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            file_stem: config.export_file_stem.clone(),
            paper_size: config.document_paper_size,
            caption: config.document_caption.clone(),
        }
    }

    /// Suggested file name, e.g. `qr-code.png`.
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.file_stem, format.extension())
    }

    #[instrument(skip(self, artifact), fields(content_len = artifact.content.len()))]
    pub fn export(&self, artifact: &QrArtifact, format: ExportFormat) -> Result<ExportedFile> {
        let bytes = match format {
            ExportFormat::Raster => artifact.raster_png.clone(),
            ExportFormat::Vector => artifact.vector_markup.clone().into_bytes(),
            ExportFormat::Document => {
                let mut writer = PdfWriter::new(self.paper_size);
                writer.set_title(self.caption.clone());
                writer.set_caption(self.caption.clone());
                writer
                    .create_from_qr(&artifact.raster_png)
                    .map_err(|err| QrError::Export(format!("PDF export failed: {err}")))?
            }
        };

        if bytes.is_empty() {
            return Err(QrError::Export(format!(
                "{} artifact is empty",
                format.label()
            )));
        }

        info!(format = format.label(), bytes = bytes.len(), "artifact exported");
        Ok(ExportedFile {
            file_name: self.file_name(format),
            mime_type: format.mime_type(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CompositionPipeline;
    use qrwerk_core::types::{EncodingInput, ResolutionTier};

    async fn artifact() -> QrArtifact {
        let input = EncodingInput {
            content: "example.com".into(),
            resolution: ResolutionTier::Low,
            ..Default::default()
        };
        CompositionPipeline::default()
            .generate_plain(&input)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn raster_export_is_the_png() {
        let artifact = artifact().await;
        let file = Exporter::default()
            .export(&artifact, ExportFormat::Raster)
            .unwrap();
        assert_eq!(file.file_name, "qr-code.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.bytes, artifact.raster_png);
    }

    #[tokio::test]
    async fn vector_export_is_the_markup() {
        let artifact = artifact().await;
        let file = Exporter::default()
            .export(&artifact, ExportFormat::Vector)
            .unwrap();
        assert_eq!(file.file_name, "qr-code.svg");
        assert_eq!(file.bytes, artifact.vector_markup.as_bytes());
    }

    #[tokio::test]
    async fn document_export_is_a_pdf() {
        let file = Exporter::default()
            .export(&artifact().await, ExportFormat::Document)
            .unwrap();
        assert_eq!(file.file_name, "qr-code.pdf");
        assert!(file.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn file_stem_comes_from_config() {
        let config = AppConfig {
            export_file_stem: "ticket".into(),
            ..AppConfig::default()
        };
        let exporter = Exporter::from_config(&config);
        assert_eq!(exporter.file_name(ExportFormat::Document), "ticket.pdf");
    }

    #[test]
    fn broken_raster_fails_document_export() {
        let artifact = QrArtifact {
            content: "x".into(),
            raster_png: b"junk".to_vec(),
            raster_width: 600,
            vector_markup: "<svg/>".into(),
            has_logo: false,
            is_default_placeholder: false,
        };
        let err = Exporter::default()
            .export(&artifact, ExportFormat::Document)
            .unwrap_err();
        assert!(matches!(err, QrError::Export(_)));
    }
}
