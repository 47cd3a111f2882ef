// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — SVG logo decoding and logo compositing onto QR rasters.

pub mod compositor;
pub mod logo;

pub use compositor::{LOGO_PADDING, LOGO_SCALE, LogoBox, LogoCompositor, encode_png};
pub use logo::rasterize_svg;
