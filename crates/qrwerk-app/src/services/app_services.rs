// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the generator session and provides
// async-friendly methods for the Dioxus UI to call.
//
// The session is wrapped in a `tokio::sync::Mutex` so that generation runs
// are serialised: a run started while another is in flight waits its turn
// and the last one to finish wins. Every method returns a fresh
// `SessionSnapshot`; errors have already been logged and turned into
// notifications by the session, so they are not propagated further.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use qrwerk_core::error::Result;
use qrwerk_core::human_errors::Notification;
use qrwerk_core::types::{ExportFormat, ResolutionTier, mime_from_extension};
use qrwerk_core::{AppConfig, QrError};
use qrwerk_render::{GeneratorSession, NotificationLog, Notifier, SessionSnapshot};
use tracing::{debug, info, warn};

use super::data_dir;

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<tokio::sync::Mutex<GeneratorSession>>,
    notifications: NotificationLog,
    config: Arc<AppConfig>,
    data_dir: PathBuf,
}

impl AppServices {
    /// Initialise all services. Call once at app startup.
    ///
    /// Reads `config.json` from the data directory if present. A malformed
    /// file is an error; the caller should fall back to defaults.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let config = AppConfig::load(&dir)?;
        Ok(Self::with_config(dir, config))
    }

    /// Services with default settings, used when `init` fails. The failure
    /// is queued as a notification so the user sees it once the UI is up.
    pub fn fallback(cause: &QrError) -> Self {
        warn!(error = %cause, "using default settings");
        let svc = Self::with_config(data_dir::data_dir(), AppConfig::default());
        svc.notifications.notify(Notification::from_error(cause));
        svc
    }

    fn with_config(data_dir: PathBuf, config: AppConfig) -> Self {
        let notifications = NotificationLog::new();
        let session = GeneratorSession::from_config(&config, Arc::new(notifications.clone()));
        Self {
            session: Arc::new(tokio::sync::Mutex::new(session)),
            notifications,
            config: Arc::new(config),
            data_dir,
        }
    }

    // -- Session operations ------------------------------------------------

    /// Initial load: render the placeholder.
    pub async fn start(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        settle("start", session.start().await);
        session.snapshot()
    }

    pub async fn set_content(&self, content: String) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        settle("set_content", session.set_content(content).await);
        session.snapshot()
    }

    /// Returns whether `hex` was accepted.
    pub async fn set_fill_color(&self, hex: &str) -> (SessionSnapshot, bool) {
        let mut session = self.session.lock().await;
        let accepted = session.set_fill_color(hex).is_ok();
        (session.snapshot(), accepted)
    }

    pub async fn set_resolution(&self, resolution: ResolutionTier) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.set_resolution(resolution);
        session.snapshot()
    }

    pub async fn generate(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        settle("generate", session.generate().await);
        session.snapshot()
    }

    /// Read a logo file picked by the user and hand it to the session. The
    /// MIME type is inferred from the file extension.
    pub async fn upload_logo_file(&self, path: &Path) -> SessionSnapshot {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "logo".into());
        let mime_type = mime_from_extension(
            &path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default(),
        );

        let mut session = self.session.lock().await;
        match tokio::fs::read(path).await {
            Ok(bytes) => settle(
                "upload_logo",
                session.upload_logo(file_name, mime_type, bytes).await,
            ),
            Err(err) => {
                let err = QrError::from(err);
                warn!(error = %err, path = %path.display(), "failed to read logo file");
                self.notifications.notify(Notification::from_error(&err));
            }
        }
        session.snapshot()
    }

    pub async fn remove_logo(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        settle("remove_logo", session.remove_logo().await);
        session.snapshot()
    }

    /// Export the live artifact and write it to `path`.
    pub async fn save_export(&self, format: ExportFormat, path: &Path) -> SessionSnapshot {
        let session = self.session.lock().await;
        settle("save_export", session.save_export(format, path).await);
        session.snapshot()
    }

    /// Default file name offered by the save dialog.
    pub async fn suggested_file_name(&self, format: ExportFormat) -> String {
        self.session.lock().await.suggested_file_name(format)
    }

    // -- Notifications / config --------------------------------------------

    /// Take every notification queued since the last call.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Errors were already reported by the session; only trace them here.
fn settle(action: &str, result: Result<()>) {
    if let Err(err) = result {
        debug!(action, error = %err, "session operation did not complete");
    }
}
