// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
///
/// Every variant names the path it failed on so the single line printed on
/// abort is enough to find the offending file.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Discovery --
    #[error("cannot read source directory {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Per-image --
    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("image {} has zero size ({width}x{height})", path.display())]
    InvalidDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("cannot encode {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    // -- Output --
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BildwerkError {
    /// The file or directory the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Discovery { path, .. }
            | Self::Decode { path, .. }
            | Self::InvalidDimensions { path, .. }
            | Self::Encode { path, .. }
            | Self::OutputDir { path, .. }
            | Self::Write { path, .. } => path,
        }
    }

    /// Whether the error concerns a single input entry rather than the run
    /// as a whole. Only per-entry errors can be skipped under
    /// [`ErrorPolicy::Continue`](crate::ErrorPolicy::Continue).
    pub fn is_per_entry(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::InvalidDimensions { .. }
                | Self::Encode { .. }
                | Self::Write { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
