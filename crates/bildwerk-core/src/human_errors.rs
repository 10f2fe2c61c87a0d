// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a suggestion of what
// to check before running again.

use std::io::ErrorKind;

use crate::error::BildwerkError;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.message, self.suggestion)
    }
}

/// Convert a `BildwerkError` into a `HumanError`.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    let path = err.path().display();
    match err {
        BildwerkError::Discovery { source, .. } => HumanError {
            message: format!("Couldn't look inside the folder {path}."),
            suggestion: io_suggestion(source.kind(), "Check that the folder exists and you can open it."),
        },

        BildwerkError::Decode { .. } => HumanError {
            message: format!("{path} doesn't look like a picture we can read."),
            suggestion: "The file may be damaged or saved in an unusual variant. \
                         Re-save it from an image editor, or move it out of the folder."
                .into(),
        },

        BildwerkError::InvalidDimensions { .. } => HumanError {
            message: format!("{path} is an empty picture."),
            suggestion: "Remove the file from the folder and run again.".into(),
        },

        BildwerkError::Encode { .. } => HumanError {
            message: format!("Couldn't save the converted copy of {path}."),
            suggestion: "The picture may be too large for the output format. \
                         Try shrinking it first."
                .into(),
        },

        BildwerkError::OutputDir { source, .. } => HumanError {
            message: format!("Couldn't create the output folder {path}."),
            suggestion: io_suggestion(
                source.kind(),
                "Check that you can create folders here, or remove any file named like the output folder.",
            ),
        },

        BildwerkError::Write { source, .. } => HumanError {
            message: format!("Couldn't write {path}."),
            suggestion: io_suggestion(source.kind(), "Check the disk and try again."),
        },
    }
}

fn io_suggestion(kind: ErrorKind, fallback: &str) -> String {
    match kind {
        ErrorKind::NotFound => "The location doesn't exist. Check the path and try again.".into(),
        ErrorKind::PermissionDenied => {
            "You don't have permission here. Run from a folder you own.".into()
        }
        ErrorKind::StorageFull => "The disk is full. Free some space and try again.".into(),
        _ => fallback.into(),
    }
}
