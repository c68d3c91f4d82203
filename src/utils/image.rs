//! Thin wrappers over the pixel-level resize and pad primitives.
//!
//! The actual resampling and pixel-fill kernels come from the `image`
//! crate; this module only fixes the parameters the pipeline relies on
//! (exact target sizes, trailing-edge zero padding).

use image::{imageops, imageops::FilterType, RgbImage};

/// Resamples an image to exactly `width x height`.
///
/// Pure scale: no cropping and no aspect correction beyond what the target
/// dimensions encode. Returns a clone when the image already has the target
/// size.
pub fn resize_exact(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// Extends an image to `width x height` with zero-filled pixels on the
/// bottom and right edges only; the original content keeps its top-left
/// origin.
///
/// The target must dominate the image in both dimensions. Callers derive
/// the target from a maximum over per-image sizes, so a smaller target is
/// an invariant violation, not an input error.
pub fn pad_to_bottom_right(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    debug_assert!(
        width >= img.width() && height >= img.height(),
        "pad target {}x{} smaller than image {}x{}",
        width,
        height,
        img.width(),
        img.height()
    );

    if img.width() == width && img.height() == height {
        return img.clone();
    }

    let mut canvas = RgbImage::new(width, height);
    imageops::overlay(&mut canvas, img, 0, 0);
    canvas
}
