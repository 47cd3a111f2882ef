// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages and the toast notifications built from them.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the notification is presented.

use crate::error::QrError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change something (pick another file, type some content).
    ActionRequired,
    /// Retrying the same action may work.
    Transient,
    /// Retrying will not help: bad input or a broken file.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `QrError` into a `HumanError`.
pub fn humanize_error(err: &QrError) -> HumanError {
    match err {
        QrError::InvalidFileType(_) => HumanError {
            message: "Only SVG files are supported for logo upload".into(),
            suggestion: "Export your logo as an SVG file and upload it again.".into(),
            severity: Severity::ActionRequired,
        },

        QrError::MissingContent => HumanError {
            message: "Please provide content for the QR code".into(),
            suggestion: "Type a URL or some text before generating a code with a logo.".into(),
            severity: Severity::ActionRequired,
        },

        QrError::Encoding(detail) => {
            if detail.contains("colour") {
                HumanError {
                    message: "Failed to generate QR code. Please check your input.".into(),
                    suggestion: "The fill colour must be a hex code such as #1a2b3c.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if detail.contains("too long") {
                HumanError {
                    message: "Failed to generate QR code. Please check your input.".into(),
                    suggestion: "The content is too long to fit in a QR code. Try a shorter text or URL.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Failed to generate QR code".into(),
                    suggestion: format!("Try again. ({detail})"),
                    severity: Severity::Transient,
                }
            }
        }

        QrError::ImageDecode(_) => HumanError {
            message: "Failed to generate QR code with logo".into(),
            suggestion: "The logo file may be damaged. Try opening it in another program, or upload a different SVG.".into(),
            severity: Severity::Permanent,
        },

        QrError::Export(_) => HumanError {
            message: "Failed to download QR code".into(),
            suggestion: "Generate a QR code first, then check you can write to the chosen folder.".into(),
            severity: Severity::Transient,
        },

        QrError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick a different location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        QrError::Serialization(_) => HumanError {
            message: "The settings file could not be read.".into(),
            suggestion: "Default settings are being used. Fix or delete config.json to silence this.".into(),
            severity: Severity::Permanent,
        },
    }
}

/// How a notification should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A non-blocking message for the user (rendered as a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Notification for a failed operation. Problems the user can fix are
    /// warnings; everything else is an error.
    pub fn from_error(err: &QrError) -> Self {
        let human = humanize_error(err);
        match human.severity {
            Severity::ActionRequired => Self::warning(human.message),
            Severity::Transient | Severity::Permanent => Self::error(human.message),
        }
    }
}
