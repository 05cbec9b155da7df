use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};

/// Produces the bytes written for one image.
///
/// Implementations must return the input unchanged for formats they do not
/// handle.
pub trait Optimizer: Send + Sync {
    fn optimize(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>>;
}

/// Re-encodes PNG and JPEG, keeping the original when that is not smaller.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptimizer {
    jpeg_quality: u8,
}

impl RasterOptimizer {
    pub const fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }
}

impl Optimizer for RasterOptimizer {
    fn optimize(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>> {
        let format = match ImageFormat::from_path(path) {
            Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
            _ => return Ok(bytes),
        };

        let image = image::load_from_memory_with_format(&bytes, format)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        let encoded = match format {
            ImageFormat::Png => encode_png(&image),
            _ => encode_jpeg(&image, self.jpeg_quality),
        }
        .with_context(|| format!("Failed to encode {}", path.display()))?;

        Ok(if encoded.len() < bytes.len() {
            encoded
        } else {
            bytes
        })
    }
}

fn encode_png(image: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    image.write_with_encoder(encoder)?;
    Ok(out)
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, Rgba, RgbaImage};

    /// Flat image stored with no compression, so re-encoding always wins.
    fn uncompressed_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(64, 64, Rgba([200, 30, 30, 255]));
        let mut out = Vec::new();
        PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::NoFilter)
            .write_image(img.as_raw(), 64, 64, image::ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    #[test]
    fn test_png_gets_smaller() {
        let original = uncompressed_png();
        let optimized = RasterOptimizer::new(85)
            .optimize(Path::new("a.png"), original.clone())
            .unwrap();
        assert!(optimized.len() <= original.len());
        assert!(image::load_from_memory(&optimized).is_ok());
    }

    #[test]
    fn test_unknown_format_passes_through() {
        let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec();
        let out = RasterOptimizer::new(85).optimize(Path::new("icon.svg"), svg.clone()).unwrap();
        assert_eq!(out, svg);
    }

    #[test]
    fn test_never_grows() {
        let tiny = uncompressed_png();
        let once = RasterOptimizer::new(85).optimize(Path::new("a.png"), tiny).unwrap();
        let twice = RasterOptimizer::new(85).optimize(Path::new("a.png"), once.clone()).unwrap();
        assert!(twice.len() <= once.len());
    }

    #[test]
    fn test_corrupt_png_is_error() {
        let result = RasterOptimizer::new(85).optimize(Path::new("broken.png"), b"not a png".to_vec());
        assert!(result.is_err());
    }
}
