//! Image processing backend trait and shared types.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! [`MockBackend`](tests::MockBackend), which records requests and touches
//! the output file instead of encoding anything.

use super::params::ResizeParams;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single image could not be produced.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("{path} is {width}x{height}; scaled to {target_width}px wide it would be too large")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        target_width: u32,
    },
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decode `params.source`, scale it to `params.width`, and write a JPEG
    /// to `params.output`. Returns the dimensions that were written.
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError>;
}
