// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode, color normalisation, resize and WebP encoding.

pub mod processor;

#[cfg(test)]
pub(crate) mod fixtures;

pub use processor::{ImageProcessor, SourceMode};
