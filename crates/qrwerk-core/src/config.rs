// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{FillColor, PaperSize, ResolutionTier};

/// File name looked up inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Start-up defaults for the generator form and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fill colour preselected in the form.
    pub default_fill_color: FillColor,
    /// Resolution tier preselected in the form.
    pub default_resolution: ResolutionTier,
    /// Stem of exported file names (`<stem>.png`, `<stem>.svg`, `<stem>.pdf`).
    pub export_file_stem: String,
    /// Page size of the PDF export.
    pub document_paper_size: PaperSize,
    /// Caption printed under the code in the PDF export.
    pub document_caption: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_fill_color: FillColor::BLACK,
            default_resolution: ResolutionTier::Medium,
            export_file_stem: "qr-code".into(),
            document_paper_size: PaperSize::A4,
            document_caption: "QR Code".into(),
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `dir`. A missing file yields the defaults;
    /// a malformed one is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config = serde_json::from_str(&data)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
