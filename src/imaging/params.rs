//! Parameter types for image operations.
//!
//! These describe *what* to produce, leaving the pixel work to the
//! [`backend`](super::backend). Keeping them separate lets tests swap in a
//! mock backend and assert on the requested operations.

use std::path::PathBuf;

/// Width every published image is scaled to, in pixels.
pub const TARGET_WIDTH: u32 = 1440;

/// Resize `source` to `width` (height follows the aspect ratio) and write a
/// JPEG to `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
}

impl ResizeParams {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            width: TARGET_WIDTH,
        }
    }
}
