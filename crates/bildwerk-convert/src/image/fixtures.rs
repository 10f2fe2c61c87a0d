// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PNG fixtures for tests. The `image` encoder only writes direct-color PNGs,
// so palette and `tRNS` variants are built with the `png` crate.

/// An 8-bit palette PNG. `indices` holds one palette index per pixel and
/// `trns` the optional per-entry alpha table.
pub fn indexed_png(
    width: u32,
    height: u32,
    palette: &[[u8; 3]],
    trns: Option<&[u8]>,
    indices: &[u8],
) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(palette.iter().flatten().copied().collect::<Vec<u8>>());
        if let Some(trns) = trns {
            encoder.set_trns(trns.to_vec());
        }
        let mut writer = encoder.write_header().expect("png header");
        writer.write_image_data(indices).expect("png data");
        writer.finish().expect("png finish");
    }
    buffer
}

/// An 8-bit RGB PNG whose `tRNS` chunk marks `key` as fully transparent.
pub fn rgb_png_with_color_key(width: u32, height: u32, key: [u8; 3], pixels: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        // tRNS for RGB stores each sample as a big-endian u16.
        let trns: Vec<u8> = key.iter().flat_map(|&c| [0, c]).collect();
        encoder.set_trns(trns);
        let mut writer = encoder.write_header().expect("png header");
        writer.write_image_data(pixels).expect("png data");
        writer.finish().expect("png finish");
    }
    buffer
}

/// Two-color checkerboard indices.
pub fn checkerboard(width: u32, height: u32) -> Vec<u8> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x + y) % 2) as u8))
        .collect()
}
