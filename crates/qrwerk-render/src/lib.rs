// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qrwerk-render — QR encoding, logo compositing and export for qrwerk.
//
// Provides the module encoder (raster + SVG), the SVG logo compositor, the
// async composition pipeline, the generator session state machine, and
// PNG/SVG/PDF export.

pub mod encoder;
pub mod export;
pub mod image;
pub mod pdf;
pub mod pipeline;
pub mod session;

// Re-export the primary structs so callers can use `qrwerk_render::GeneratorSession` etc.
pub use encoder::{ModuleEncoder, QrEncoder};
pub use export::Exporter;
pub use self::image::LogoCompositor;
pub use pdf::PdfWriter;
pub use pipeline::CompositionPipeline;
pub use session::{GeneratorSession, NotificationLog, Notifier, SessionSnapshot};
