//! Image processing: decode, resize, re-encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG) |
//! | **Resize** | `DynamicImage::resize_exact` with `Lanczos3` |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` at its default quality |
//!
//! Narrow sources are upscaled to the target width. A resize whose output
//! would exceed [`MAX_OUTPUT_HEIGHT`] or [`MAX_OUTPUT_PIXELS`] is refused with
//! [`BackendError::TooLarge`] before any pixel buffer is allocated.
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{MAX_OUTPUT_HEIGHT, MAX_OUTPUT_PIXELS, scaled_dimensions};
pub use params::{ResizeParams, TARGET_WIDTH};
pub use rust_backend::RustBackend;
