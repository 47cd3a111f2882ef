// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for qrwerk.

use thiserror::Error;

/// Top-level error type for all qrwerk operations.
#[derive(Debug, Error)]
pub enum QrError {
    // -- Input errors --
    #[error("unsupported logo file type: {0}")]
    InvalidFileType(String),

    #[error("no content to encode")]
    MissingContent,

    // -- Rendering errors --
    #[error("QR encoding failed: {0}")]
    Encoding(String),

    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    // -- Output errors --
    #[error("export failed: {0}")]
    Export(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QrError>;
