// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver — discover, prepare the output directory, then convert each
// entry in order into `<ordinal>.<ext>`.
//
// The run is a single straight pass. Each image is decoded, resized, encoded
// and written before the next one is opened, so at most one decoded image is
// alive at a time.

use std::path::Path;

use bildwerk_core::config::{ConvertConfig, ErrorPolicy};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{ConversionReport, ConvertedImage, FailedEntry};
use tracing::{debug, error, info, instrument, warn};

use crate::discover::{WorkEntry, discover};
use crate::image::ImageProcessor;

/// Converts every eligible image under a source root.
pub struct BatchConverter {
    config: ConvertConfig,
}

impl BatchConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Run the whole batch.
    ///
    /// Under [`ErrorPolicy::Abort`] the first failure is returned as-is and
    /// outputs written before it stay on disk. Under
    /// [`ErrorPolicy::Continue`] per-entry failures are collected in the
    /// report instead; discovery and output-directory failures are fatal
    /// either way.
    #[instrument(skip(self), fields(source_root = %self.config.source_root.display()))]
    pub fn run(&self) -> Result<ConversionReport> {
        let entries = discover(&self.config)?;
        let output_dir = self.config.resolved_output_dir();
        prepare_output_dir(&output_dir)?;

        let mut report = ConversionReport::new(&output_dir);
        for entry in &entries {
            match self.convert_entry(entry) {
                Ok(converted) => report.converted.push(converted),
                Err(err)
                    if self.config.error_policy == ErrorPolicy::Continue
                        && err.is_per_entry() =>
                {
                    warn!(
                        ordinal = entry.ordinal,
                        path = %entry.path.display(),
                        error = %err,
                        "Skipping image"
                    );
                    report.failures.push(FailedEntry {
                        ordinal: entry.ordinal,
                        source: entry.path.clone(),
                        error: err.to_string(),
                    });
                }
                Err(err) => {
                    error!(
                        ordinal = entry.ordinal,
                        converted = report.converted_count(),
                        error = %err,
                        "Aborting batch"
                    );
                    return Err(err);
                }
            }
        }

        info!(
            converted = report.converted_count(),
            failed = report.failures.len(),
            output_dir = %output_dir.display(),
            "Batch complete"
        );
        Ok(report)
    }

    /// Decode, normalise, resize, encode and write a single entry.
    #[instrument(skip_all, fields(ordinal = entry.ordinal, path = %entry.path.display()))]
    pub fn convert_entry(&self, entry: &WorkEntry) -> Result<ConvertedImage> {
        let output = self.config.output_path(entry.ordinal);

        let processor = ImageProcessor::open(&entry.path)?
            .normalize_color()
            .fit_longest_side(self.config.target_size)?;
        processor.save_as(&output, self.config.format, self.config.effective_quality())?;

        let converted = ConvertedImage {
            ordinal: entry.ordinal,
            source: entry.path.clone(),
            output,
            dimensions: processor.dimensions(),
            layout: processor.layout(),
        };
        debug!(
            output = %converted.output.display(),
            dimensions = %converted.dimensions,
            layout = ?converted.layout,
            "Image converted"
        );
        Ok(converted)
    }
}

/// Create the output directory and any missing parents. An existing
/// directory is left as it is, stale contents included.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| BildwerkError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use ::image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
    use bildwerk_core::types::{ChannelLayout, Dimensions};

    use crate::image::fixtures::{checkerboard, indexed_png, rgb_png_with_color_key};

    fn write_rgb(path: &Path, width: u32, height: u32) {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
        .save(path)
        .unwrap();
    }

    fn write_translucent(path: &Path, width: u32, height: u32) {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([20, 200, 40, 90])))
            .save(path)
            .unwrap();
    }

    fn decoded(path: &Path) -> DynamicImage {
        ::image::open(path).unwrap()
    }

    #[test]
    fn converts_in_name_order_with_fitted_sizes() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb(&dir.path().join("b.png"), 800, 400);
        write_rgb(&dir.path().join("a.jpg"), 300, 600);

        let report = BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap();

        assert_eq!(report.summary(), "Converted 2 images to /output folder.");
        assert_eq!(report.converted[0].source, dir.path().join("a.jpg"));
        assert_eq!(report.converted[0].dimensions, Dimensions::new(256, 512));
        assert_eq!(report.converted[1].source, dir.path().join("b.png"));
        assert_eq!(report.converted[1].dimensions, Dimensions::new(512, 256));

        let first = decoded(&dir.path().join("output/1.webp"));
        assert_eq!((first.width(), first.height()), (256, 512));
        let second = decoded(&dir.path().join("output/2.webp"));
        assert_eq!((second.width(), second.height()), (512, 256));
    }

    #[test]
    fn channel_count_follows_source_alpha() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb(&dir.path().join("a.png"), 64, 64);
        write_translucent(&dir.path().join("b.png"), 64, 32);

        let report = BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap();

        assert_eq!(report.converted[0].layout, ChannelLayout::Rgb);
        assert_eq!(report.converted[1].layout, ChannelLayout::Rgba);
        for converted in &report.converted {
            assert_eq!(
                decoded(&converted.output).color().channel_count(),
                converted.layout.channel_count()
            );
        }
    }

    #[test]
    fn translucent_palette_png_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let data = indexed_png(
            8,
            8,
            &[[255, 0, 0], [0, 0, 255]],
            Some(&[128, 255]),
            &checkerboard(8, 8),
        );
        fs::write(dir.path().join("indexed.png"), data).unwrap();

        let report = BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap();

        let converted = &report.converted[0];
        assert_eq!(converted.layout, ChannelLayout::Rgba);
        assert_eq!(converted.dimensions, Dimensions::new(512, 512));
        assert_eq!(decoded(&converted.output).color().channel_count(), 4);
    }

    #[test]
    fn color_keyed_rgb_png_drops_transparency() {
        let dir = tempfile::tempdir().unwrap();
        let pixels: Vec<u8> = (0..32)
            .flat_map(|i| if i % 3 == 0 { [0, 0, 0] } else { [30, 160, 90] })
            .collect();
        let data = rgb_png_with_color_key(8, 4, [0, 0, 0], &pixels);
        fs::write(dir.path().join("keyed.png"), data).unwrap();

        let report = BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap();

        let converted = &report.converted[0];
        assert_eq!(converted.layout, ChannelLayout::Rgb);
        assert_eq!(decoded(&converted.output).color().channel_count(), 3);
    }

    #[test]
    fn rerun_overwrites_and_keeps_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb(&dir.path().join("a.png"), 100, 50);
        let out = dir.path().join("output");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("1.webp"), b"stale").unwrap();
        fs::write(out.join("99.webp"), b"unrelated").unwrap();

        let converter = BatchConverter::new(ConvertConfig::with_source_root(dir.path()));
        converter.run().unwrap();
        let first_bytes = fs::read(out.join("1.webp")).unwrap();
        converter.run().unwrap();
        let second_bytes = fs::read(out.join("1.webp")).unwrap();

        assert_ne!(first_bytes, b"stale");
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(fs::read(out.join("99.webp")).unwrap(), b"unrelated");
    }

    #[test]
    fn sources_are_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.png");
        write_rgb(&src, 40, 40);
        let before = fs::read(&src).unwrap();

        BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap();

        assert_eq!(fs::read(&src).unwrap(), before);
    }

    #[test]
    fn empty_source_still_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap();

        assert_eq!(report.converted_count(), 0);
        assert!(dir.path().join("output").is_dir());
        assert_eq!(report.summary(), "Converted 0 images to /output folder.");
    }

    #[test]
    fn corrupt_entry_aborts_with_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb(&dir.path().join("a.png"), 20, 10);
        fs::write(dir.path().join("b.jpg"), b"not really a jpeg").unwrap();
        write_rgb(&dir.path().join("c.png"), 20, 10);

        let err = BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap_err();

        assert!(matches!(err, BildwerkError::Decode { .. }));
        assert_eq!(err.path(), dir.path().join("b.jpg").as_path());
        assert!(dir.path().join("output/1.webp").is_file());
        assert!(!dir.path().join("output/2.webp").exists());
        assert!(!dir.path().join("output/3.webp").exists());
    }

    #[test]
    fn continue_policy_records_failure_and_keeps_numbering() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb(&dir.path().join("a.png"), 20, 10);
        fs::write(dir.path().join("b.jpg"), b"not really a jpeg").unwrap();
        write_rgb(&dir.path().join("c.png"), 20, 10);

        let config = ConvertConfig {
            error_policy: ErrorPolicy::Continue,
            ..ConvertConfig::with_source_root(dir.path())
        };
        let report = BatchConverter::new(config).run().unwrap();

        assert_eq!(report.converted_count(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].ordinal, 2);
        assert_eq!(report.failures[0].source, dir.path().join("b.jpg"));
        assert!(dir.path().join("output/1.webp").is_file());
        assert!(!dir.path().join("output/2.webp").exists());
        assert!(dir.path().join("output/3.webp").is_file());
    }

    #[test]
    fn output_dir_blocked_by_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb(&dir.path().join("a.png"), 20, 10);
        fs::write(dir.path().join("output"), b"in the way").unwrap();

        let config = ConvertConfig {
            error_policy: ErrorPolicy::Continue,
            ..ConvertConfig::with_source_root(dir.path())
        };
        let err = BatchConverter::new(config).run().unwrap_err();

        assert!(matches!(err, BildwerkError::OutputDir { .. }));
    }

    #[test]
    fn nested_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        write_rgb(&dir.path().join("a.png"), 30, 60);

        let config = ConvertConfig {
            output_dir: PathBuf::from("build/thumbs"),
            ..ConvertConfig::with_source_root(dir.path())
        };
        let report = BatchConverter::new(config).run().unwrap();

        assert!(dir.path().join("build/thumbs/1.webp").is_file());
        assert_eq!(report.summary(), "Converted 1 images to /thumbs folder.");
    }

    #[test]
    fn existing_webp_inputs_are_reconverted() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = ImageProcessor::from_dynamic(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(1024, 256, Rgb([9, 9, 9]))),
            "seed",
        )
        .to_webp_bytes(80)
        .unwrap();
        fs::write(dir.path().join("wide.webp"), bytes).unwrap();

        let report = BatchConverter::new(ConvertConfig::with_source_root(dir.path()))
            .run()
            .unwrap();

        assert_eq!(report.converted[0].dimensions, Dimensions::new(512, 128));
    }
}
