//! Pure calculation functions for image dimensions.

/// Tallest output the JPEG encoder can write.
pub const MAX_OUTPUT_HEIGHT: u32 = 65_535;

/// Pixel ceiling for a single output image (1440 x 16384).
///
/// An 8-bit RGB buffer this size is about 68 MiB.
pub const MAX_OUTPUT_PIXELS: u64 = 1440 * 16_384;

/// Dimensions after scaling `source` to `target_width`, keeping the aspect
/// ratio, or `None` if the result would exceed [`MAX_OUTPUT_HEIGHT`] or
/// [`MAX_OUTPUT_PIXELS`].
///
/// The height is rounded to the nearest pixel and never drops below 1.
/// Sources narrower than the target are scaled up, so a very tall and
/// narrow source can blow up into an output too large to allocate.
///
/// ```
/// # use photofeed::imaging::scaled_dimensions;
/// assert_eq!(scaled_dimensions((2880, 1920), 1440), Some((1440, 960)));
/// assert_eq!(scaled_dimensions((720, 1080), 1440), Some((1440, 2160)));
/// assert_eq!(scaled_dimensions((1, 65_535), 1440), None);
/// ```
pub fn scaled_dimensions(source: (u32, u32), target_width: u32) -> Option<(u32, u32)> {
    let (src_w, src_h) = (u64::from(source.0), u64::from(source.1));
    let width = u64::from(target_width);
    // Round half up. Both factors fit in u32, so the product can't overflow.
    let height = match src_w {
        0 => src_h,
        _ => (src_h * width + src_w / 2) / src_w,
    }
    .max(1);

    if height > u64::from(MAX_OUTPUT_HEIGHT) || height * width > MAX_OUTPUT_PIXELS {
        return None;
    }
    let height = u32::try_from(height).ok()?;
    Some((target_width, height))
}
