#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;

/// Deterministic noise so the encoder cannot squeeze the fixture to nothing.
pub fn noise_image(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    })
}

/// Writes a real JPEG at `quality` and returns its size on disk.
pub fn write_jpeg(path: &Path, width: u32, height: u32, quality: u8) -> u64 {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(&noise_image(width, height, width ^ height))
        .unwrap();
    fs::write(path, &buffer).unwrap();
    buffer.len() as u64
}

/// A file with a JPEG extension that is not a JPEG.
pub fn write_corrupt_jpeg(path: &Path) -> u64 {
    let data = b"fake image data";
    fs::write(path, data).unwrap();
    data.len() as u64
}

pub fn mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}
