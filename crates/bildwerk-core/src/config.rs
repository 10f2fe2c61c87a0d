// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion configuration.

use std::path::{Path, PathBuf};

use crate::types::TargetFormat;

/// Recognised input suffixes, matched against the lowercase file name.
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".webp"];

/// Length in pixels of the longer side of every output image.
pub const DEFAULT_TARGET_SIZE: u32 = 512;

/// Encoder quality on the 0-100 scale.
pub const DEFAULT_QUALITY: u8 = 95;

/// Name of the output directory, relative to the source root.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// What to do when a single entry fails to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first failure. Outputs written so far stay on disk.
    #[default]
    Abort,
    /// Record the failure and move on to the next entry.
    Continue,
}

/// Settings for one batch conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Directory scanned for input images. Never modified.
    pub source_root: PathBuf,
    /// Output directory. Relative paths resolve against `source_root`.
    pub output_dir: PathBuf,
    /// Lowercase suffixes (including the dot) that mark a candidate file.
    pub extensions: Vec<String>,
    /// Longer side of each output image, in pixels.
    pub target_size: u32,
    /// Output encoding.
    pub format: TargetFormat,
    /// Encoder quality (0-100).
    pub quality: u8,
    /// Failure handling for per-entry errors.
    pub error_policy: ErrorPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            target_size: DEFAULT_TARGET_SIZE,
            format: TargetFormat::WebP,
            quality: DEFAULT_QUALITY,
            error_policy: ErrorPolicy::Abort,
        }
    }
}

impl ConvertConfig {
    /// Default settings scanning `source_root`.
    pub fn with_source_root(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Self::default()
        }
    }

    /// The output directory as an actual location on disk.
    pub fn resolved_output_dir(&self) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            self.source_root.join(&self.output_dir)
        }
    }

    /// Quality clamped to the encoder's 0-100 range.
    pub fn effective_quality(&self) -> u8 {
        self.quality.min(100)
    }

    /// Whether `file_name` carries one of the recognised suffixes.
    ///
    /// Matching is on the whole lowercase name, so `.PNG` and even a bare
    /// `.png` qualify.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
    }

    /// Output path for the entry at 1-based position `ordinal`.
    pub fn output_path(&self, ordinal: usize) -> PathBuf {
        output_path_in(&self.resolved_output_dir(), ordinal, self.format)
    }
}

/// `<dir>/<ordinal>.<ext>`.
pub fn output_path_in(dir: &Path, ordinal: usize, format: TargetFormat) -> PathBuf {
    dir.join(format!("{}.{}", ordinal, format.extension()))
}
