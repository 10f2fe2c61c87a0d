// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — batch image converter.
//
// Entry point. Initialises logging, converts every image in the working
// directory into `output/<n>.webp`, and prints a one-line summary.

use std::process::ExitCode;

use bildwerk_convert::BatchConverter;
use bildwerk_core::ConvertConfig;
use bildwerk_core::human_errors::humanize_error;

fn main() -> ExitCode {
    // Logs go to stderr and stay quiet unless RUST_LOG asks for more, so the
    // summary is the only thing on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let source_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!(error = %e, "cannot determine working directory");
            eprintln!("Couldn't determine the current folder: {e}");
            return ExitCode::FAILURE;
        }
    };

    let converter = BatchConverter::new(ConvertConfig::with_source_root(source_root));
    match converter.run() {
        Ok(report) => {
            println!("{}", report.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "conversion failed");
            eprintln!("{}", humanize_error(&e));
            eprintln!("({e})");
            ExitCode::FAILURE
        }
    }
}
