//! Favicon set generation.
//!
//! From one source image, writes `favicon.ico` (16/32/48 frames), PNG
//! favicons and the Apple touch icon set.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat};

/// Frames embedded in `favicon.ico`; also written as standalone PNGs.
const FAVICON_SIZES: [u32; 3] = [16, 32, 48];

/// Apple touch icon sizes (`apple-touch-icon-NxN.png`).
const APPLE_SIZES: [u32; 10] = [57, 60, 72, 76, 114, 120, 144, 152, 167, 180];

/// Size of the unsuffixed `apple-touch-icon.png`.
const APPLE_DEFAULT: u32 = 180;

/// Generate every icon from `source` into `dest`. Returns the written paths.
pub fn generate(source: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let image = image::open(source)
        .with_context(|| format!("Failed to open {}", source.display()))?;
    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    let mut written = Vec::new();

    let ico = dest.join("favicon.ico");
    write_ico(&image, &ico)?;
    written.push(ico);

    for size in FAVICON_SIZES {
        let path = dest.join(format!("favicon-{size}x{size}.png"));
        write_png(&image, size, &path)?;
        written.push(path);
    }

    let path = dest.join("apple-touch-icon.png");
    write_png(&image, APPLE_DEFAULT, &path)?;
    written.push(path);

    for size in APPLE_SIZES {
        let path = dest.join(format!("apple-touch-icon-{size}x{size}.png"));
        write_png(&image, size, &path)?;
        written.push(path);
    }

    Ok(written)
}

fn resize(image: &DynamicImage, size: u32) -> DynamicImage {
    image.resize_exact(size, size, FilterType::Lanczos3)
}

fn png_bytes(image: &DynamicImage, size: u32) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    resize(image, size).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

fn write_png(image: &DynamicImage, size: u32, path: &Path) -> Result<()> {
    let bytes = png_bytes(image, size)?;
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_ico(image: &DynamicImage, path: &Path) -> Result<()> {
    let frames = FAVICON_SIZES
        .iter()
        .map(|&size| {
            let pixels = resize(image, size).to_rgba8();
            Ok(IcoFrame::as_png(pixels.as_raw(), size, size, ExtendedColorType::Rgba8)?)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::new();
    IcoEncoder::new(&mut out).encode_images(&frames)?;
    fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))
}
