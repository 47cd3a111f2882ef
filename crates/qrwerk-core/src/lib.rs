// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qrwerk — Core types, error definitions and configuration shared across all crates.

pub mod config;
pub mod content;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::AppConfig;
pub use content::{PLACEHOLDER_CONTENT, validate_and_format};
pub use error::QrError;
pub use types::*;
