//! Per-batch shape resolution.
//!
//! Applies the configured sizing policy to every image of a batch, in batch
//! order, and tracks the running maximum target width and height. The maxima
//! are computed over already-aligned per-image targets, so they are
//! themselves multiples of the alignment base.

use crate::core::errors::PrepResult;
use crate::core::validation::validate_image_batch;
use crate::processors::sizing::target_size;
use crate::processors::types::{ImageInfo, TargetPolicy};
use image::RgbImage;

/// Resolved shapes for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchShape {
    /// Per-image sizing records, ordered by batch index.
    pub infos: Vec<ImageInfo>,
    /// Maximum target width over the batch.
    pub max_w: u32,
    /// Maximum target height over the batch.
    pub max_h: u32,
}

/// Resolves the target shape of every image in a batch.
///
/// # Errors
///
/// Returns an error if the batch is empty, any image has invalid
/// dimensions, or the policy fails validation.
pub fn resolve_batch_shape(
    images: &[RgbImage],
    policy: &TargetPolicy,
    align: u32,
) -> PrepResult<BatchShape> {
    validate_image_batch(images, "batch shape resolution")?;

    let mut infos = Vec::with_capacity(images.len());
    let mut max_w = 0;
    let mut max_h = 0;

    for img in images {
        let (src_w, src_h) = img.dimensions();
        let (target_w, target_h) = target_size(src_w, src_h, policy, align)?;
        max_w = max_w.max(target_w);
        max_h = max_h.max(target_h);
        infos.push(ImageInfo {
            src_w,
            src_h,
            target_w,
            target_h,
        });
    }

    Ok(BatchShape {
        infos,
        max_w,
        max_h,
    })
}
