//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG) | `image::ImageReader` |
//! | Resize | `DynamicImage::resize_exact` with the `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (encoder default quality) |
//!
//! The encoded bytes are built in memory and written in one go. If the write
//! fails, whatever landed on disk is removed again.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::scaled_dimensions;
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(|source| BackendError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| BackendError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Encode as baseline JPEG. The encoder only takes 8-bit luma or RGB, so
/// anything else is converted to RGB first.
fn encode_jpeg(img: DynamicImage, path: &Path) -> Result<Vec<u8>, BackendError> {
    let img = match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };
    let mut bytes = Vec::new();
    img.write_with_encoder(JpegEncoder::new(&mut bytes))
        .map_err(|e| BackendError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(bytes)
}

fn write_output(bytes: &[u8], path: &Path) -> Result<(), BackendError> {
    std::fs::write(path, bytes).map_err(|source| {
        let _ = std::fs::remove_file(path);
        BackendError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

impl ImageBackend for RustBackend {
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source)?;
        let (width, height) = scaled_dimensions((img.width(), img.height()), params.width)
            .ok_or(BackendError::TooLarge {
                path: params.source.clone(),
                width: img.width(),
                height: img.height(),
                target_width: params.width,
            })?;
        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        let bytes = encode_jpeg(resized, &params.output)?;
        write_output(&bytes, &params.output)?;
        Ok(Dimensions { width, height })
    }
}
