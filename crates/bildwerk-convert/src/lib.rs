// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-convert — Batch conversion for the Bildwerk image converter.
//
// Provides source discovery (extension filtering and deterministic ordering),
// per-image processing (decode, color normalisation, aspect-preserving Lanczos
// resize, WebP encoding) and the batch driver that numbers the outputs.

pub mod batch;
pub mod discover;
pub mod image;

// Re-export the primary items so callers can use `bildwerk_convert::BatchConverter` etc.
pub use batch::BatchConverter;
pub use discover::{WorkEntry, discover};
pub use image::processor::ImageProcessor;
