// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, color normalisation, aspect-preserving resize and
// WebP encoding. Operates on in-memory images using the `image` and `webp`
// crates.

use std::path::{Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{ChannelLayout, Dimensions, TargetFormat};
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, instrument};

/// PNG file signature.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// IHDR color types without an alpha channel of their own.
const PNG_COLOR_TYPE_GRAYSCALE: u8 = 0;
const PNG_COLOR_TYPE_RGB: u8 = 2;
/// IHDR color type for palette-indexed PNGs.
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// How the encoded source stored its pixels, as far as it matters for
/// choosing the output channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Palette indices. Always normalised to RGBA.
    Palette,
    /// Gray or RGB samples with no alpha channel. A `tRNS` chunk is expanded
    /// to alpha by the decoder but is not part of the native mode, so these
    /// normalise to RGB.
    Opaque,
    /// Anything else: the decoded buffer's own alpha decides.
    Decoded,
}

/// Image processing pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns the transformed processor, so a
/// conversion reads as one chain:
///
/// ```ignore
/// ImageProcessor::open("photo.jpg")?
///     .normalize_color()
///     .fit_longest_side(512)?
///     .save_as("output/1.webp", TargetFormat::WebP, 95)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
    /// Where the image came from, for error messages.
    source: PathBuf,
    /// Native pixel mode of the encoded source.
    mode: SourceMode,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load and decode an image file. The format is sniffed from the content,
    /// not the extension.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| BildwerkError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Self::decode(&data, path)
    }

    /// Decode raw encoded bytes (PNG, JPEG, WebP, ...). `source` is only used
    /// to label errors.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8], source: &Path) -> Result<Self> {
        let image = image::load_from_memory(data).map_err(|err| BildwerkError::Decode {
            path: source.to_path_buf(),
            reason: err.to_string(),
        })?;
        let mode = source_mode(data);
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            ?mode,
            "Image decoded"
        );
        Ok(Self {
            image,
            source: source.to_path_buf(),
            mode,
        })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage, source: impl Into<PathBuf>) -> Self {
        Self {
            image,
            source: source.into(),
            mode: SourceMode::Decoded,
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image size in pixels.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// Layout an encoder will receive for the current buffer.
    pub fn layout(&self) -> ChannelLayout {
        match self.mode {
            SourceMode::Palette => ChannelLayout::Rgba,
            SourceMode::Opaque => ChannelLayout::Rgb,
            SourceMode::Decoded if self.image.color().has_alpha() => ChannelLayout::Rgba,
            SourceMode::Decoded => ChannelLayout::Rgb,
        }
    }

    /// Native pixel mode of the source.
    pub fn source_mode(&self) -> SourceMode {
        self.mode
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Reduce the buffer to 8-bit RGBA when the source had a palette or an
    /// alpha channel, and to 8-bit RGB otherwise. Transparency that only came
    /// from a `tRNS` chunk on a gray or RGB PNG is dropped.
    #[instrument(skip(self), fields(path = %self.source.display()))]
    pub fn normalize_color(self) -> Self {
        let layout = self.layout();
        let image = match (layout, self.image) {
            (ChannelLayout::Rgba, img @ DynamicImage::ImageRgba8(_)) => img,
            (ChannelLayout::Rgba, img) => DynamicImage::ImageRgba8(img.to_rgba8()),
            (ChannelLayout::Rgb, img @ DynamicImage::ImageRgb8(_)) => img,
            (ChannelLayout::Rgb, img) => DynamicImage::ImageRgb8(img.to_rgb8()),
        };
        debug!(?layout, "Color normalised");
        Self { image, ..self }
    }

    /// Resize so the longer side equals `target`, preserving aspect ratio.
    /// Uses Lanczos3 filtering. See [`Dimensions::fit_longest_side`] for the
    /// rounding rule.
    #[instrument(skip(self), fields(path = %self.source.display()))]
    pub fn fit_longest_side(self, target: u32) -> Result<Self> {
        let from = self.dimensions();
        let to = from
            .fit_longest_side(target)
            .ok_or_else(|| BildwerkError::InvalidDimensions {
                path: self.source.clone(),
                width: from.width,
                height: from.height,
            })?;
        debug!(%from, %to, "Resizing image");
        Ok(self.resize_exact(to))
    }

    /// Resize to exactly `to`, ignoring aspect ratio.
    pub fn resize_exact(self, to: Dimensions) -> Self {
        if self.dimensions() == to {
            return self;
        }
        let resized = self
            .image
            .resize_exact(to.width, to.height, FilterType::Lanczos3);
        Self {
            image: resized,
            ..self
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image in `format` at `quality` (0-100).
    pub fn encode(&self, format: TargetFormat, quality: u8) -> Result<Vec<u8>> {
        match format {
            TargetFormat::WebP => self.to_webp_bytes(quality),
        }
    }

    /// Encode the current image as lossy WebP. RGBA buffers keep their alpha
    /// plane; anything else is encoded as RGB.
    pub fn to_webp_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let (width, height) = (self.image.width(), self.image.height());
        let quality = f32::from(quality.min(100));

        let encoded = match &self.image {
            DynamicImage::ImageRgba8(buf) => {
                webp::Encoder::from_rgba(buf.as_raw(), width, height).encode_simple(false, quality)
            }
            DynamicImage::ImageRgb8(buf) => {
                webp::Encoder::from_rgb(buf.as_raw(), width, height).encode_simple(false, quality)
            }
            other if other.color().has_alpha() => {
                let rgba = other.to_rgba8();
                webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                    .encode_simple(false, quality)
            }
            other => {
                let rgb = other.to_rgb8();
                webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
            }
        }
        .map_err(|err| BildwerkError::Encode {
            path: self.source.clone(),
            reason: format!("WebP encoding failed: {:?}", err),
        })?;

        Ok(encoded.to_vec())
    }

    /// Encode and write to `path`, replacing any existing file.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), format = ?format, quality = quality))]
    pub fn save_as(
        &self,
        path: impl AsRef<Path>,
        format: TargetFormat,
        quality: u8,
    ) -> Result<()> {
        let bytes = self.encode(format, quality)?;
        std::fs::write(path.as_ref(), &bytes).map_err(|source| BildwerkError::Write {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        debug!(bytes = bytes.len(), "Image written");
        Ok(())
    }
}

/// Native mode of an encoded image.
///
/// Decoders expand palettes and `tRNS` chunks on load, so the original PNG
/// color type has to be read from the header. Other formats expose no mode
/// beyond what the decoded buffer shows.
pub fn source_mode(data: &[u8]) -> SourceMode {
    match png_color_type(data) {
        Some(PNG_COLOR_TYPE_INDEXED) => SourceMode::Palette,
        Some(PNG_COLOR_TYPE_GRAYSCALE | PNG_COLOR_TYPE_RGB) => SourceMode::Opaque,
        _ => SourceMode::Decoded,
    }
}

/// IHDR color type byte, if `data` starts like a PNG.
fn png_color_type(data: &[u8]) -> Option<u8> {
    // signature(8) + chunk length(4) + "IHDR"(4) + width(4) + height(4) + bit depth(1)
    const COLOR_TYPE_OFFSET: usize = 25;
    let is_png = data.len() > COLOR_TYPE_OFFSET
        && data[..8] == PNG_SIGNATURE
        && &data[12..16] == b"IHDR";
    is_png.then(|| data[COLOR_TYPE_OFFSET])
}
