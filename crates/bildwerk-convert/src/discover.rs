// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source discovery — list the source directory once, keep regular files with a
// recognised extension, and order them by file name.

use std::ffi::OsString;
use std::path::PathBuf;

use bildwerk_core::config::ConvertConfig;
use bildwerk_core::error::{BildwerkError, Result};
use tracing::{debug, info, instrument};

/// A source file with its position in the ordered work list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkEntry {
    /// 1-based position; becomes the output file stem.
    pub ordinal: usize,
    pub path: PathBuf,
}

/// Build the ordered work list for `config.source_root`.
///
/// An entry qualifies when its lowercase name ends with one of
/// `config.extensions` and it resolves (following symlinks) to a regular file.
/// Everything else is skipped with nothing printed at the default log level.
/// Entries are sorted by raw file name, so the numbering does not depend on
/// the order the filesystem returns them in.
#[instrument(skip_all, fields(source_root = %config.source_root.display()))]
pub fn discover(config: &ConvertConfig) -> Result<Vec<WorkEntry>> {
    let root = &config.source_root;
    let discovery_error = |source| BildwerkError::Discovery {
        path: root.clone(),
        source,
    };

    let mut candidates: Vec<(OsString, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(root).map_err(discovery_error)? {
        let entry = entry.map_err(discovery_error)?;
        let name = entry.file_name();
        if !config.matches_extension(&name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        // `metadata` follows symlinks; a dangling link is simply not a file.
        let is_file = std::fs::metadata(&path)
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            debug!(path = %path.display(), "Skipping non-file entry");
            continue;
        }
        candidates.push((name, path));
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let entries: Vec<WorkEntry> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, (_, path))| WorkEntry {
            ordinal: index + 1,
            path,
        })
        .collect();

    info!(count = entries.len(), "Source images discovered");
    Ok(entries)
}
