//! Target-shape computation for detection preprocessing.
//!
//! Each sizing policy is a deterministic, pure function of the source
//! dimensions and the configuration. The resolved edges are always multiples
//! of the alignment base and at least one base unit, so the batch maxima
//! derived from them inherit both properties.

use crate::core::errors::PrepResult;
use crate::core::validation::validate_image_dimensions;
use crate::processors::types::{Orientation, TargetPolicy};

/// Computes the target `(width, height)` for one image under `policy`.
///
/// # Arguments
///
/// * `src_w` - Source image width in pixels
/// * `src_h` - Source image height in pixels
/// * `policy` - The sizing policy to apply
/// * `align` - The alignment base both result edges are rounded to
///
/// # Errors
///
/// Returns an error if the source dimensions are zero or oversized, or if
/// the policy parameters fail validation. Under valid preconditions every
/// branch yields a positive, aligned target.
pub fn target_size(
    src_w: u32,
    src_h: u32,
    policy: &TargetPolicy,
    align: u32,
) -> PrepResult<(u32, u32)> {
    validate_image_dimensions(src_h, src_w, "target size")?;
    policy.validate(align)?;

    let dims = match *policy {
        TargetPolicy::Fixed { height, width } => (width, height),
        TargetPolicy::LongSideLimit { max_side_len } => {
            long_side_limit_size(src_w, src_h, max_side_len, align)
        }
        TargetPolicy::EdgeThresholds {
            long_min,
            short_min,
        } => edge_threshold_size(src_w, src_h, long_min, short_min, align),
    };

    Ok(dims)
}

/// Rounds an edge to the nearest multiple of `align`, flooring at one base
/// unit.
fn round_nearest(edge: u32, align: u32) -> u32 {
    (((edge as f32 / align as f32).round() as u32) * align).max(align)
}

/// Rounds an edge up to the next multiple of `align`, flooring at one base
/// unit.
fn round_up(edge: u32, align: u32) -> u32 {
    (edge.div_ceil(align) * align).max(align)
}

/// Shrinks the image if its long side exceeds `max_side_len`.
///
/// Both edges are scaled by the same factor, truncated to whole pixels, and
/// rounded to the nearest aligned size. Images within the limit keep their
/// original dimensions apart from alignment.
fn long_side_limit_size(src_w: u32, src_h: u32, max_side_len: u32, align: u32) -> (u32, u32) {
    let long = src_w.max(src_h);
    let ratio = if long > max_side_len {
        max_side_len as f32 / long as f32
    } else {
        1.0
    };

    let resize_w = (src_w as f32 * ratio) as u32;
    let resize_h = (src_h as f32 * ratio) as u32;

    (round_nearest(resize_w, align), round_nearest(resize_h, align))
}

/// Grows the image until both edges clear their minimum thresholds.
///
/// Images already above both thresholds keep their dimensions, rounded up to
/// the alignment base. Otherwise the image is scaled up along one edge:
/// when its aspect ratio is more elongated than `long_min / short_min`, the
/// short edge is pinned to `short_min`; otherwise the long edge is pinned to
/// `long_min`. The other edge follows with ceiling rounding, so the scale is
/// never below the pinned factor.
fn edge_threshold_size(
    src_w: u32,
    src_h: u32,
    long_min: u32,
    short_min: u32,
    align: u32,
) -> (u32, u32) {
    let orientation = Orientation::of(src_w, src_h);
    let (cur_long, cur_short) = match orientation {
        Orientation::Landscape => (src_w, src_h),
        Orientation::Portrait => (src_h, src_w),
    };

    if cur_long > long_min && cur_short > short_min {
        let (dst_w, dst_h) = match orientation {
            Orientation::Landscape => (cur_long, cur_short),
            Orientation::Portrait => (cur_short, cur_long),
        };
        return (round_up(dst_w, align), round_up(dst_h, align));
    }

    let base_ratio = long_min as f32 / short_min as f32;
    let cur_ratio = cur_long as f32 / cur_short as f32;

    let (new_long, new_short) = if cur_ratio > base_ratio {
        let ratio = short_min as f32 / cur_short as f32;
        ((ratio * cur_long as f32).ceil() as u32, short_min)
    } else {
        let ratio = long_min as f32 / cur_long as f32;
        (long_min, (ratio * cur_short as f32).ceil() as u32)
    };

    let (dst_w, dst_h) = match orientation {
        Orientation::Landscape => (new_long, new_short),
        Orientation::Portrait => (new_short, new_long),
    };

    (round_up(dst_w, align), round_up(dst_h, align))
}
