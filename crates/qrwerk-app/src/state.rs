// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use qrwerk_core::AppConfig;
use qrwerk_core::human_errors::Notification;
use qrwerk_core::types::{GenerationState, QrArtifact};
use qrwerk_render::SessionSnapshot;

/// A notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// Shared state accessible to all components via `use_context`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Latest copy of the generator session.
    pub session: Option<SessionSnapshot>,
    /// `data:` URL of the live raster, rebuilt only when the artifact changes.
    pub preview_url: Option<String>,
    /// Content field as typed.
    pub content: String,
    /// Hex colour field as typed, which may be invalid mid-edit.
    pub color_text: String,
    pub color_valid: bool,
    pub download_menu_open: bool,
    pub toasts: Vec<Toast>,
    next_toast_id: u64,
    /// Pipeline runs started from the UI that have not published yet.
    pending_runs: u32,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            session: None,
            preview_url: None,
            content: String::new(),
            color_text: config.default_fill_color.to_hex(),
            color_valid: true,
            download_menu_open: false,
            toasts: Vec::new(),
            next_toast_id: 0,
            pending_runs: 0,
        }
    }

    /// Take in a new snapshot and queue `notifications` as toasts.
    /// Returns the ids of the new toasts so the caller can expire them.
    pub fn apply(&mut self, snapshot: SessionSnapshot, notifications: Vec<Notification>) -> Vec<u64> {
        let previous = self.session.as_ref().and_then(|s| s.artifact.as_ref());
        if previous != snapshot.artifact.as_ref() {
            self.preview_url = snapshot.artifact.as_ref().map(QrArtifact::raster_data_url);
        }
        if !snapshot.export_enabled {
            self.download_menu_open = false;
        }
        self.session = Some(snapshot);

        notifications
            .into_iter()
            .map(|notification| self.push_toast(notification))
            .collect()
    }

    pub fn push_toast(&mut self, notification: Notification) -> u64 {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toasts.push(Toast { id, notification });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    pub fn export_enabled(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.export_enabled)
    }

    /// Mark a run as started, before its task is spawned.
    pub fn begin_run(&mut self) {
        self.pending_runs += 1;
    }

    /// Mark a run as finished, after its snapshot has been applied.
    pub fn finish_run(&mut self) {
        self.pending_runs = self.pending_runs.saturating_sub(1);
    }

    pub fn generating(&self) -> bool {
        self.pending_runs > 0
    }

    /// Pixel width of the live raster.
    pub fn raster_width(&self) -> Option<u32> {
        self.session
            .as_ref()
            .and_then(|s| s.artifact.as_ref())
            .map(|a| a.raster_width)
    }

    pub fn logo_name(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.logo_name.as_deref())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrwerk_core::types::EncodingInput;

    fn snapshot(content: &str, export_enabled: bool) -> SessionSnapshot {
        SessionSnapshot {
            input: EncodingInput::default(),
            logo_name: None,
            artifact: Some(QrArtifact {
                content: content.into(),
                raster_png: vec![1, 2, 3],
                raster_width: 600,
                vector_markup: "<svg/>".into(),
                has_logo: false,
                is_default_placeholder: !export_enabled,
            }),
            state: GenerationState::Ready,
            export_enabled,
        }
    }

    #[test]
    fn apply_builds_preview_and_toasts() {
        let mut state = AppState::default();
        let ids = state.apply(
            snapshot("https://example.com", true),
            vec![Notification::success("done")],
        );
        assert_eq!(ids, vec![0]);
        assert!(state.preview_url.as_deref().unwrap().starts_with("data:image/png;base64,"));
        assert!(state.export_enabled());

        state.dismiss(0);
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn generating_tracks_pending_runs() {
        let mut state = AppState::default();
        assert!(!state.generating());

        state.begin_run();
        state.begin_run();
        assert!(state.generating());

        state.apply(snapshot("https://example.com", true), Vec::new());
        state.finish_run();
        assert!(state.generating(), "second run still in flight");

        state.finish_run();
        assert!(!state.generating());
        assert_eq!(state.raster_width(), Some(600));

        state.finish_run();
        assert!(!state.generating(), "extra finish does not underflow");
    }

    #[test]
    fn losing_export_closes_download_menu() {
        let mut state = AppState::default();
        state.download_menu_open = true;
        state.apply(snapshot("placeholder", false), Vec::new());
        assert!(!state.download_menu_open);
    }
}
