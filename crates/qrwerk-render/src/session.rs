// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generator session — the single owned state object behind the form.
//
// Holds the user's input, the optional logo and the live artifact, drives
// the Idle → Generating → Ready/Failed state machine, and reports every
// outcome to a `Notifier`. Failures never replace the last good artifact.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use qrwerk_core::AppConfig;
use qrwerk_core::content::validate_and_format;
use qrwerk_core::error::{QrError, Result};
use qrwerk_core::human_errors::Notification;
use qrwerk_core::types::{
    EncodingInput, ExportFormat, ExportedFile, FillColor, GenerationState, LogoAsset,
    QrArtifact, ResolutionTier,
};
use tracing::{debug, error, info, instrument, warn};

use crate::export::Exporter;
use crate::pipeline::CompositionPipeline;

/// Fire-and-forget sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Shared in-memory notification queue. The UI drains it after each
/// operation and shows the entries as toasts.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything queued so far.
    pub fn drain(&self) -> Vec<Notification> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        debug!(level = ?notification.level, message = %notification.message, "notification");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub input: EncodingInput,
    pub logo_name: Option<String>,
    pub artifact: Option<QrArtifact>,
    pub state: GenerationState,
    pub export_enabled: bool,
}

/// Which pipeline entry point produced a result; picks the toast wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Placeholder,
    Plain,
    WithLogo,
}

impl RunKind {
    fn success_message(self) -> Option<&'static str> {
        match self {
            RunKind::WithLogo => Some("QR code with logo created successfully"),
            RunKind::Placeholder | RunKind::Plain => None,
        }
    }

    fn failure_notification(self, err: &QrError) -> Notification {
        match self {
            RunKind::Placeholder => Notification::error("Failed to generate default QR code"),
            RunKind::Plain | RunKind::WithLogo => Notification::from_error(err),
        }
    }
}

pub struct GeneratorSession {
    pipeline: CompositionPipeline,
    exporter: Exporter,
    notifier: Arc<dyn Notifier>,
    input: EncodingInput,
    logo: Option<LogoAsset>,
    artifact: Option<QrArtifact>,
    state: GenerationState,
    /// True only while the live artifact came from a user generation.
    /// Gates export.
    new_qr_generated: bool,
}

impl GeneratorSession {
    pub fn new(
        pipeline: CompositionPipeline,
        exporter: Exporter,
        notifier: Arc<dyn Notifier>,
        input: EncodingInput,
    ) -> Self {
        Self {
            pipeline,
            exporter,
            notifier,
            input,
            logo: None,
            artifact: None,
            state: GenerationState::Idle,
            new_qr_generated: false,
        }
    }

    /// Session with the default encoder and the form defaults from `config`.
    pub fn from_config(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        let input = EncodingInput {
            content: String::new(),
            fill_color: config.default_fill_color,
            resolution: config.default_resolution,
        };
        Self::new(
            CompositionPipeline::default(),
            Exporter::from_config(config),
            notifier,
            input,
        )
    }

    // -- Accessors ------------------------------------------------------------

    pub fn input(&self) -> &EncodingInput {
        &self.input
    }

    pub fn logo(&self) -> Option<&LogoAsset> {
        self.logo.as_ref()
    }

    pub fn artifact(&self) -> Option<&QrArtifact> {
        self.artifact.as_ref()
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn export_enabled(&self) -> bool {
        self.new_qr_generated
    }

    pub fn suggested_file_name(&self, format: ExportFormat) -> String {
        self.exporter.file_name(format)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            input: self.input.clone(),
            logo_name: self.logo.as_ref().map(|logo| logo.file_name().to_string()),
            artifact: self.artifact.clone(),
            state: self.state,
            export_enabled: self.new_qr_generated,
        }
    }

    // -- Input edits ------------------------------------------------------------

    /// Initial load: show the placeholder so the preview is never empty.
    pub async fn start(&mut self) -> Result<()> {
        info!("generator session starting");
        self.show_placeholder().await
    }

    /// Replace the content. Clearing it (with no logo) after a user
    /// generation reverts to the placeholder.
    pub async fn set_content(&mut self, content: impl Into<String>) -> Result<()> {
        self.input.content = content.into();
        if self.new_qr_generated && self.logo.is_none() && self.content_is_empty() {
            debug!("content and logo cleared, reverting to placeholder");
            return self.show_placeholder().await;
        }
        Ok(())
    }

    /// Set the fill colour from a hex string. Invalid values leave the
    /// current colour in place.
    pub fn set_fill_color(&mut self, hex: &str) -> Result<()> {
        self.input.fill_color = FillColor::parse(hex)?;
        Ok(())
    }

    pub fn set_resolution(&mut self, resolution: ResolutionTier) {
        self.input.resolution = resolution;
    }

    // -- Generation -------------------------------------------------------------

    /// The user's "Generate" action.
    #[instrument(skip(self), fields(has_logo = self.logo.is_some()))]
    pub async fn generate(&mut self) -> Result<()> {
        let logo = self.logo.clone();
        match (logo, self.content_is_empty()) {
            (None, true) => self.show_placeholder().await,
            (Some(_), true) => {
                let err = QrError::MissingContent;
                warn!("logo present but no content, refusing to generate");
                self.notifier.notify(Notification::from_error(&err));
                Err(err)
            }
            (Some(logo), false) => {
                self.state = GenerationState::Generating;
                let result = self.pipeline.generate_with_logo(&self.input, &logo).await;
                self.publish(result, RunKind::WithLogo)
            }
            (None, false) => {
                self.state = GenerationState::Generating;
                let result = self.pipeline.generate_plain(&self.input).await;
                self.publish(result, RunKind::Plain)
            }
        }
    }

    /// Accept a logo upload and regenerate. Non-SVG files are rejected
    /// before anything changes.
    #[instrument(skip(self, file_name, bytes), fields(bytes_len = bytes.len()))]
    pub async fn upload_logo(
        &mut self,
        file_name: impl Into<String>,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        let logo = match LogoAsset::new(file_name, mime_type, bytes) {
            Ok(logo) => logo,
            Err(err) => {
                warn!(error = %err, "logo upload rejected");
                self.notifier.notify(Notification::from_error(&err));
                return Err(err);
            }
        };
        info!(file = logo.file_name(), mime = logo.mime_type(), "logo accepted");
        self.logo = Some(logo);
        self.generate().await
    }

    /// Discard the logo. With no content left, fall back to the placeholder.
    pub async fn remove_logo(&mut self) -> Result<()> {
        if self.logo.take().is_none() {
            return Ok(());
        }
        self.notifier.notify(Notification::success("Logo removed"));
        if self.content_is_empty() {
            return self.show_placeholder().await;
        }
        Ok(())
    }

    async fn show_placeholder(&mut self) -> Result<()> {
        self.state = GenerationState::Generating;
        let result = self.pipeline.generate_placeholder(&self.input).await;
        self.publish(result, RunKind::Placeholder)
    }

    /// Swap in a finished artifact, or record the failure and keep the old one.
    fn publish(&mut self, result: Result<QrArtifact>, kind: RunKind) -> Result<()> {
        match result {
            Ok(artifact) => {
                self.new_qr_generated = !artifact.is_default_placeholder;
                info!(?artifact, "artifact published");
                self.artifact = Some(artifact);
                self.state = GenerationState::Ready;
                if let Some(message) = kind.success_message() {
                    self.notifier.notify(Notification::success(message));
                }
                Ok(())
            }
            Err(err) => {
                error!(error = %err, ?kind, "generation failed");
                self.state = GenerationState::Failed;
                self.notifier.notify(kind.failure_notification(&err));
                Err(err)
            }
        }
    }

    fn content_is_empty(&self) -> bool {
        validate_and_format(&self.input.content).is_empty()
    }

    // -- Export -------------------------------------------------------------------

    /// Serialise the live artifact. Only allowed once a user artifact exists.
    pub async fn export(&self, format: ExportFormat) -> Result<ExportedFile> {
        let result = self.export_artifact(format).await;
        if let Err(ref err) = result {
            error!(error = %err, format = format.label(), "export failed");
            self.notifier.notify(Notification::from_error(err));
        }
        result
    }

    /// Export and write to `path` (typically chosen in a save dialog).
    pub async fn save_export(&self, format: ExportFormat, path: &Path) -> Result<()> {
        let file = self.export(format).await?;
        if let Err(err) = file.write_to_path(path) {
            error!(error = %err, path = %path.display(), "failed to write export");
            self.notifier.notify(Notification::from_error(&err));
            return Err(err);
        }
        info!(path = %path.display(), "export saved");

        let message = match format {
            ExportFormat::Document => "PDF downloaded successfully".to_string(),
            other => format!("QR code downloaded as {}", other.label()),
        };
        self.notifier.notify(Notification::success(message));
        Ok(())
    }

    async fn export_artifact(&self, format: ExportFormat) -> Result<ExportedFile> {
        if !self.new_qr_generated {
            return Err(QrError::Export("generate a QR code before downloading".into()));
        }
        let artifact = self
            .artifact
            .clone()
            .ok_or_else(|| QrError::Export("no QR code to export".into()))?;
        let exporter = self.exporter.clone();
        tokio::task::spawn_blocking(move || exporter.export(&artifact, format))
            .await
            .map_err(|err| QrError::Export(format!("export task aborted: {err}")))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use image::RgbaImage;
    use qrwerk_core::content::PLACEHOLDER_CONTENT;
    use qrwerk_core::human_errors::NotificationLevel;
    use qrwerk_core::types::EncodeOptions;

    use super::*;
    use crate::encoder::{ModuleEncoder, QrEncoder};
    use crate::pipeline::tests::RED_LOGO;

    /// Real encoder that can be switched into a failing mode and counts
    /// raster encodes (one per pipeline run).
    #[derive(Default)]
    struct SwitchableEncoder {
        failing: AtomicBool,
        raster_calls: AtomicUsize,
    }

    impl SwitchableEncoder {
        fn runs(&self) -> usize {
            self.raster_calls.load(Ordering::SeqCst)
        }
    }

    impl QrEncoder for SwitchableEncoder {
        fn encode_raster(&self, content: &str, options: &EncodeOptions) -> Result<RgbaImage> {
            self.raster_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(QrError::Encoding("encoder offline".into()));
            }
            ModuleEncoder.encode_raster(content, options)
        }

        fn encode_vector(&self, content: &str, options: &EncodeOptions) -> Result<String> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(QrError::Encoding("encoder offline".into()));
            }
            ModuleEncoder.encode_vector(content, options)
        }
    }

    struct Harness {
        session: GeneratorSession,
        log: NotificationLog,
        encoder: Arc<SwitchableEncoder>,
    }

    fn unstarted() -> Harness {
        let log = NotificationLog::new();
        let encoder = Arc::new(SwitchableEncoder::default());
        let input = EncodingInput {
            resolution: ResolutionTier::Low,
            ..Default::default()
        };
        let session = GeneratorSession::new(
            CompositionPipeline::new(encoder.clone()),
            Exporter::default(),
            Arc::new(log.clone()),
            input,
        );
        Harness {
            session,
            log,
            encoder,
        }
    }

    async fn started() -> Harness {
        let mut h = unstarted();
        h.session.start().await.unwrap();
        h
    }

    #[tokio::test]
    async fn placeholder_failure_has_its_own_message() {
        let mut h = unstarted();
        h.encoder.failing.store(true, Ordering::SeqCst);

        assert!(h.session.start().await.is_err());
        assert_eq!(h.session.state(), GenerationState::Failed);
        assert!(h.session.artifact().is_none());
        let notes = h.log.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].message, "Failed to generate default QR code");
    }

    #[tokio::test]
    async fn plain_failure_keeps_generic_message() {
        let mut h = started().await;
        h.encoder.failing.store(true, Ordering::SeqCst);
        h.session.set_content("example.com").await.unwrap();

        assert!(h.session.generate().await.is_err());
        let notes = h.log.drain();
        assert_eq!(notes[0].message, "Failed to generate QR code");
    }

    #[tokio::test]
    async fn editing_content_never_runs_pipeline_before_first_generate() {
        let mut h = started().await;
        let placeholder = h.session.artifact().cloned();
        let runs = h.encoder.runs();

        // Clearing an already-empty field on the placeholder does nothing.
        h.session.set_content("").await.unwrap();
        assert_eq!(h.encoder.runs(), runs);

        // Typing without pressing Generate leaves the preview alone.
        h.session.set_content("example.com").await.unwrap();
        assert_eq!(h.encoder.runs(), runs);
        assert_eq!(h.session.artifact().cloned(), placeholder);
        assert!(!h.session.export_enabled());

        // Clearing again still does not re-render the placeholder.
        h.session.set_content("").await.unwrap();
        assert_eq!(h.encoder.runs(), runs);
        assert!(h.log.drain().is_empty());
    }

    #[tokio::test]
    async fn start_shows_placeholder_with_export_disabled() {
        let h = started().await;
        let artifact = h.session.artifact().unwrap();
        assert_eq!(artifact.content, PLACEHOLDER_CONTENT);
        assert!(artifact.is_default_placeholder);
        assert_eq!(h.session.state(), GenerationState::Ready);
        assert!(!h.session.export_enabled());
        assert!(h.log.drain().is_empty());
    }

    #[tokio::test]
    async fn bare_host_generates_https_and_enables_export() {
        let mut h = started().await;
        h.session.set_content("example.com").await.unwrap();
        h.session.generate().await.unwrap();

        let artifact = h.session.artifact().unwrap();
        assert_eq!(artifact.content, "https://example.com");
        assert!(!artifact.is_default_placeholder);
        assert!(h.session.export_enabled());
    }

    #[tokio::test]
    async fn generate_twice_gives_same_vector() {
        let mut h = started().await;
        h.session.set_content("https://example.com/a").await.unwrap();
        h.session.generate().await.unwrap();
        let first = h.session.artifact().unwrap().vector_markup.clone();
        h.session.generate().await.unwrap();
        assert_eq!(h.session.artifact().unwrap().vector_markup, first);
    }

    #[tokio::test]
    async fn logo_without_content_is_refused() {
        let mut h = started().await;
        let before = h.session.artifact().cloned();

        let err = h
            .session
            .upload_logo("logo.svg", "image/svg+xml", RED_LOGO.to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, QrError::MissingContent));
        assert_eq!(h.session.artifact().cloned(), before);
        let notes = h.log.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
        assert!(notes[0].message.contains("provide content"));
    }

    #[tokio::test]
    async fn non_svg_upload_changes_nothing() {
        let mut h = started().await;
        h.session.set_content("example.com").await.unwrap();
        h.session.generate().await.unwrap();
        let before = h.session.snapshot();

        let err = h
            .session
            .upload_logo("photo.png", "image/png", vec![0x89, b'P', b'N', b'G'])
            .await
            .unwrap_err();

        assert!(matches!(err, QrError::InvalidFileType(_)));
        assert_eq!(h.session.snapshot(), before);
        assert!(h.session.logo().is_none());
        let notes = h.log.drain();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("SVG"));
    }

    #[tokio::test]
    async fn logo_upload_with_content_composites() {
        let mut h = started().await;
        h.session.set_content("example.com").await.unwrap();
        h.session
            .upload_logo("logo.svg", "image/svg+xml", RED_LOGO.to_vec())
            .await
            .unwrap();

        let artifact = h.session.artifact().unwrap();
        assert!(artifact.has_logo);
        assert!(h.session.export_enabled());
        assert_eq!(h.session.snapshot().logo_name.as_deref(), Some("logo.svg"));
        let notes = h.log.drain();
        assert_eq!(notes[0].level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn removing_logo_with_empty_content_reverts_to_placeholder() {
        let mut h = started().await;
        h.session.set_content("example.com").await.unwrap();
        h.session
            .upload_logo("logo.svg", "image/svg+xml", RED_LOGO.to_vec())
            .await
            .unwrap();

        h.session.set_content("").await.unwrap();
        // Logo still present, so no revert yet.
        assert!(h.session.artifact().unwrap().has_logo);

        h.session.remove_logo().await.unwrap();
        let artifact = h.session.artifact().unwrap();
        assert!(artifact.is_default_placeholder);
        assert!(!h.session.export_enabled());
        assert!(h.log.drain().iter().any(|n| n.message == "Logo removed"));
    }

    #[tokio::test]
    async fn clearing_content_reverts_to_placeholder() {
        let mut h = started().await;
        h.session.set_content("example.com").await.unwrap();
        h.session.generate().await.unwrap();

        h.session.set_content("   ").await.unwrap();
        assert!(h.session.artifact().unwrap().is_default_placeholder);
        assert!(!h.session.export_enabled());
    }

    #[tokio::test]
    async fn encoder_failure_keeps_last_good_artifact() {
        let mut h = started().await;
        h.session.set_content("example.com").await.unwrap();
        h.session.generate().await.unwrap();
        let good = h.session.artifact().cloned();

        h.encoder.failing.store(true, Ordering::SeqCst);
        h.session.set_content("other.org").await.unwrap();
        assert!(h.session.generate().await.is_err());

        assert_eq!(h.session.state(), GenerationState::Failed);
        assert_eq!(h.session.artifact().cloned(), good);
        assert!(h.session.export_enabled(), "export gate unchanged by failure");
        let notes = h.log.drain();
        assert_eq!(notes.last().unwrap().level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn export_is_refused_for_placeholder() {
        let h = started().await;
        let err = h.session.export(ExportFormat::Raster).await.unwrap_err();
        assert!(matches!(err, QrError::Export(_)));
        assert_eq!(h.log.drain().len(), 1);
    }

    #[tokio::test]
    async fn save_export_writes_file_and_notifies() {
        let mut h = started().await;
        h.session.set_content("example.com").await.unwrap();
        h.session.generate().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(h.session.suggested_file_name(ExportFormat::Vector));
        h.session
            .save_export(ExportFormat::Vector, &path)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, h.session.artifact().unwrap().vector_markup);
        let notes = h.log.drain();
        assert_eq!(notes.last().unwrap().message, "QR code downloaded as SVG");
    }

    #[tokio::test]
    async fn invalid_colour_keeps_previous_one() {
        let mut h = started().await;
        h.session.set_fill_color("#336699").unwrap();
        assert!(h.session.set_fill_color("blue").is_err());
        assert_eq!(h.session.input().fill_color.to_hex(), "#336699");
    }
}
