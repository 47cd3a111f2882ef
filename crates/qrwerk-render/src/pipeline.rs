// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition pipeline — turns the current input (and optional logo) into a
// complete `QrArtifact`.
//
// Each CPU-bound step runs on Tokio's blocking pool and is awaited in order.
// A run either yields a whole artifact or an error; nothing is published
// half-way, so callers keep their previous artifact on failure.

use std::sync::Arc;

use image::RgbaImage;
use qrwerk_core::content::{PLACEHOLDER_CONTENT, validate_and_format};
use qrwerk_core::error::{QrError, Result};
use qrwerk_core::types::{EncodeOptions, EncodingInput, ErrorCorrection, LogoAsset, QrArtifact};
use tracing::{debug, info, instrument};

use crate::encoder::{ModuleEncoder, QrEncoder};
use crate::image::{LogoCompositor, encode_png};

/// Produces raster + vector artifacts from user input.
///
/// Cheap to clone: the encoder is shared behind an `Arc`.
#[derive(Clone)]
pub struct CompositionPipeline {
    encoder: Arc<dyn QrEncoder>,
}

impl Default for CompositionPipeline {
    fn default() -> Self {
        Self::new(Arc::new(ModuleEncoder))
    }
}

impl CompositionPipeline {
    pub fn new(encoder: Arc<dyn QrEncoder>) -> Self {
        Self { encoder }
    }

    /// Encode the normalised content as raster and vector at the highest
    /// error-correction level.
    #[instrument(skip_all, fields(width = input.resolution.pixel_width()))]
    pub async fn generate_plain(&self, input: &EncodingInput) -> Result<QrArtifact> {
        let content = validate_and_format(&input.content);
        if content.is_empty() {
            return Err(QrError::MissingContent);
        }
        let options = EncodeOptions::for_input(input, ErrorCorrection::High);

        let raster = self.encode_raster(&content, &options).await?;
        let vector = self.encode_vector(&content, &options).await?;
        let raster_png = run_blocking(move || encode_png(&raster)).await?;

        info!(content_len = content.len(), "QR code generated");
        Ok(QrArtifact {
            content,
            raster_png,
            raster_width: options.pixel_width,
            vector_markup: vector,
            has_logo: false,
            is_default_placeholder: false,
        })
    }

    /// Encode the normalised content and composite `logo` onto the raster.
    /// The vector form never carries the logo.
    #[instrument(skip_all, fields(width = input.resolution.pixel_width(), logo = logo.file_name()))]
    pub async fn generate_with_logo(
        &self,
        input: &EncodingInput,
        logo: &LogoAsset,
    ) -> Result<QrArtifact> {
        let content = validate_and_format(&input.content);
        if content.is_empty() {
            return Err(QrError::MissingContent);
        }
        let options = EncodeOptions::for_input(input, ErrorCorrection::High);

        let baseline = self.encode_raster(&content, &options).await?;
        let vector = self.encode_vector(&content, &options).await?;

        let logo_svg = logo.bytes().to_vec();
        let composited = run_blocking(move || {
            LogoCompositor::new(baseline)
                .composite_svg(&logo_svg)
                .map(LogoCompositor::into_image)
        })
        .await?;
        let raster_png = run_blocking(move || encode_png(&composited)).await?;

        info!(content_len = content.len(), "QR code with logo generated");
        Ok(QrArtifact {
            content,
            raster_png,
            raster_width: options.pixel_width,
            vector_markup: vector,
            has_logo: true,
            is_default_placeholder: false,
        })
    }

    /// Encode the fixed placeholder URL at medium error correction, using the
    /// current colour and resolution.
    #[instrument(skip_all, fields(width = input.resolution.pixel_width()))]
    pub async fn generate_placeholder(&self, input: &EncodingInput) -> Result<QrArtifact> {
        let content = PLACEHOLDER_CONTENT.to_string();
        let options = EncodeOptions::for_input(input, ErrorCorrection::Medium);

        let raster = self.encode_raster(&content, &options).await?;
        let vector = self.encode_vector(&content, &options).await?;
        let raster_png = run_blocking(move || encode_png(&raster)).await?;

        debug!("placeholder generated");
        Ok(QrArtifact {
            content,
            raster_png,
            raster_width: options.pixel_width,
            vector_markup: vector,
            has_logo: false,
            is_default_placeholder: true,
        })
    }

    async fn encode_raster(&self, content: &str, options: &EncodeOptions) -> Result<RgbaImage> {
        let encoder = Arc::clone(&self.encoder);
        let content = content.to_string();
        let options = options.clone();
        run_blocking(move || encoder.encode_raster(&content, &options)).await
    }

    async fn encode_vector(&self, content: &str, options: &EncodeOptions) -> Result<String> {
        let encoder = Arc::clone(&self.encoder);
        let content = content.to_string();
        let options = options.clone();
        run_blocking(move || encoder.encode_vector(&content, &options)).await
    }
}

/// Run a CPU-bound step on the blocking pool and flatten the join error.
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| QrError::Encoding(format!("render task aborted: {err}")))?
}
