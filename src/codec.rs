use crate::error::{CompressionError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use std::fs::{self, File};
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

/// The image codec the worker delegates to.
///
/// `decode` must not modify the file it reads. `encode` writes the complete
/// encoded image to `path` and returns the number of bytes written.
pub trait ImageCodec: Send + Sync {
    type Image: Send;

    fn decode(&self, path: &Path) -> Result<Self::Image>;

    fn encode(&self, image: &Self::Image, path: &Path, quality: u8) -> Result<u64>;
}

/// Baseline JPEG codec backed by the `image` crate. Writes the standard
/// Huffman tables; `JpegEncoder` cannot optimise them.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl ImageCodec for JpegCodec {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(CompressionError::Decode)
    }

    fn encode(&self, image: &DynamicImage, path: &Path, quality: u8) -> Result<u64> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        // JPEG has no alpha channel and no 16-bit samples.
        let rgb = image.to_rgb8();
        JpegEncoder::new_with_quality(&mut writer, quality)
            .encode_image(&rgb)
            .map_err(|e| CompressionError::Encode(e.to_string()))?;

        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| CompressionError::Io(e.into_error()))?
            .sync_all()?;

        Ok(fs::metadata(path)?.len())
    }
}
