//! Types used in detection preprocessing.
//!
//! This module defines the sizing policy selector, the orientation
//! classification it relies on, and the per-image shape record produced by
//! batch shape resolution.

use crate::core::constants::{DEFAULT_LONG_SIDE_THRESHOLD, DEFAULT_SHORT_SIDE_THRESHOLD};
use crate::core::errors::{PrepError, PrepResult};
use crate::core::validation::validate_positive;
use serde::{Deserialize, Serialize};

/// Selects how the target dimensions for one image are computed.
///
/// The three policies are mutually exclusive and chosen per configuration;
/// a whole batch is always sized under a single policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPolicy {
    /// Always target the configured `(height, width)`, independent of input
    /// size. Used when the downstream engine requires one compiled input
    /// shape; the configured dimensions must be multiples of the alignment
    /// base.
    Fixed {
        /// Target height in pixels.
        height: u32,
        /// Target width in pixels.
        width: u32,
    },
    /// Shrink the image if its long side exceeds `max_side_len`, keeping the
    /// aspect ratio. Edges are rounded to the nearest multiple of the
    /// alignment base.
    LongSideLimit {
        /// Upper bound for the longer edge.
        max_side_len: u32,
    },
    /// Grow the image until both edges clear their minimum thresholds,
    /// keeping the aspect ratio. Edges are rounded up to the next multiple
    /// of the alignment base; images already above both thresholds are never
    /// upscaled.
    EdgeThresholds {
        /// Minimum for the longer edge.
        long_min: u32,
        /// Minimum for the shorter edge.
        short_min: u32,
    },
}

impl Default for TargetPolicy {
    fn default() -> Self {
        TargetPolicy::EdgeThresholds {
            long_min: DEFAULT_LONG_SIDE_THRESHOLD,
            short_min: DEFAULT_SHORT_SIDE_THRESHOLD,
        }
    }
}

impl TargetPolicy {
    /// Validates the policy parameters against an alignment base.
    ///
    /// Zero thresholds would produce a division by zero or a non-finite
    /// ratio inside the shape computation, and fixed dimensions that are not
    /// multiples of `align` would violate the alignment guarantee, so both
    /// are rejected here before any sizing runs.
    pub fn validate(&self, align: u32) -> PrepResult<()> {
        validate_positive(align, "align")?;

        match self {
            TargetPolicy::Fixed { height, width } => {
                validate_positive(*height, "height")?;
                validate_positive(*width, "width")?;
                if height % align != 0 || width % align != 0 {
                    return Err(PrepError::config_error(format!(
                        "fixed dimensions {}x{} must be multiples of the alignment base {}",
                        height, width, align
                    )));
                }
            }
            TargetPolicy::LongSideLimit { max_side_len } => {
                validate_positive(*max_side_len, "max_side_len")?;
            }
            TargetPolicy::EdgeThresholds {
                long_min,
                short_min,
            } => {
                validate_positive(*long_min, "long_min")?;
                validate_positive(*short_min, "short_min")?;
            }
        }

        Ok(())
    }
}

/// Orientation class of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Width is greater than or equal to height.
    Landscape,
    /// Height is greater than width.
    Portrait,
}

impl Orientation {
    /// Classifies an image by its dimensions.
    ///
    /// A square image (`width == height`) classifies as `Landscape`. The
    /// threshold branches in the edge-thresholds policy assign long/short
    /// edges back to width/height based on this class, so the tie-break is
    /// part of the policy's observable behavior and must not change.
    pub fn of(width: u32, height: u32) -> Self {
        if width >= height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Per-image sizing record.
///
/// Ordered by batch index and rebuilt on every call; never persisted across
/// calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Original width in pixels.
    pub src_w: u32,
    /// Original height in pixels.
    pub src_h: u32,
    /// Resolved target width in pixels.
    pub target_w: u32,
    /// Resolved target height in pixels.
    pub target_h: u32,
}

impl ImageInfo {
    /// Width scale factor applied by the resize, for mapping detected boxes
    /// back to the original image.
    pub fn ratio_w(&self) -> f32 {
        self.target_w as f32 / self.src_w as f32
    }

    /// Height scale factor applied by the resize.
    pub fn ratio_h(&self) -> f32 {
        self.target_h as f32 / self.src_h as f32
    }
}

/// Specifies the order of channels in an assembled tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (planar).
    CHW,
    /// Height, Width, Channel order (interleaved).
    HWC,
}
