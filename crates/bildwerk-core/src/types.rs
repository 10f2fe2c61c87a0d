// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bildwerk converter.

use std::path::{Path, PathBuf};

/// Output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Lossy WebP.
    WebP,
}

impl TargetFormat {
    /// File extension (without the dot) used for output names.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
        }
    }
}

/// Channel layout handed to the encoder after color normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Red, green, blue. Any alpha in the source is discarded.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl ChannelLayout {
    pub fn channel_count(&self) -> u8 {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale so the longer side equals `target`, preserving aspect ratio.
    ///
    /// Only a strictly wider image is pinned on its width; squares and
    /// portraits are pinned on their height. The other side is
    /// `floor(side * target / longer)`, clamped to at least one pixel.
    ///
    /// Returns `None` when either side is zero.
    pub fn fit_longest_side(self, target: u32) -> Option<Self> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let scale = |side: u32, longer: u32| -> u32 {
            let scaled = u64::from(side) * u64::from(target) / u64::from(longer);
            // `scaled <= target` because `side <= longer`.
            (scaled as u32).max(1)
        };
        let fitted = if self.width > self.height {
            Self::new(target, scale(self.height, self.width))
        } else {
            Self::new(scale(self.width, self.height), target)
        };
        Some(fitted)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One successfully written output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedImage {
    /// 1-based position in the ordered work list.
    pub ordinal: usize,
    pub source: PathBuf,
    pub output: PathBuf,
    pub dimensions: Dimensions,
    pub layout: ChannelLayout,
}

/// An entry skipped under [`ErrorPolicy::Continue`](crate::ErrorPolicy::Continue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntry {
    pub ordinal: usize,
    pub source: PathBuf,
    /// Rendered error message.
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub output_dir: PathBuf,
    pub converted: Vec<ConvertedImage>,
    pub failures: Vec<FailedEntry>,
}

impl ConversionReport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            converted: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn converted_count(&self) -> usize {
        self.converted.len()
    }

    /// The single human-readable line printed at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Converted {} images to /{} folder.",
            self.converted_count(),
            display_name(&self.output_dir)
        )
    }
}

/// Last path component, falling back to the full path for roots.
fn display_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
