// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content normalisation — turn raw form input into the string we encode.
//
// The encoder is content-agnostic: URLs and free text are both just bytes in
// the symbol. Normalisation only decides whether a bare host like
// `example.com` should become a scannable `https://` link.

use tracing::debug;
use url::Url;

/// Encoded whenever the user has supplied neither content nor a logo.
pub const PLACEHOLDER_CONTENT: &str = "https://example.com/qr-generator";

/// Normalise raw input for encoding.
///
/// - empty or whitespace-only input yields `""` (placeholder path);
/// - input without a `scheme://` prefix gets `https://` prepended;
/// - if the candidate does not parse as a URL the raw input is returned
///   verbatim and encoded as plain text.
pub fn validate_and_format(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let candidate = if has_scheme_prefix(raw) {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    match Url::parse(&candidate) {
        Ok(_) => candidate,
        Err(err) => {
            debug!(error = %err, "input is not a URL, encoding as text");
            raw.to_string()
        }
    }
}

/// `^[A-Za-z]+://`
fn has_scheme_prefix(input: &str) -> bool {
    match input.find("://") {
        Some(idx) if idx > 0 => input[..idx].chars().all(|c| c.is_ascii_alphabetic()),
        _ => false,
    }
}
