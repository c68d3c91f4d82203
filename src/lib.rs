//! # dbnet-prep
//!
//! Batch image preprocessing for DBNet-family text detection models.
//!
//! Text detection backbones accept one tensor per batch, with every image in
//! the batch sharing a single height and width that is a multiple of the
//! network stride. This crate computes per-image target shapes under a
//! selectable sizing policy, resizes each image to its own target, zero-pads
//! the batch to a common shape, and assembles a single normalized tensor
//! ready for an inference engine.
//!
//! ## Sizing policies
//!
//! - [`TargetPolicy::Fixed`] - always target the configured dimensions, for
//!   engines compiled with a static input shape
//! - [`TargetPolicy::LongSideLimit`] - shrink images whose long side exceeds
//!   a limit, keeping aspect ratio, with round-to-nearest stride alignment
//! - [`TargetPolicy::EdgeThresholds`] - grow images until both edges clear
//!   their minimum thresholds, keeping aspect ratio, with round-up stride
//!   alignment
//!
//! [`TargetPolicy::Fixed`]: processors::TargetPolicy::Fixed
//! [`TargetPolicy::LongSideLimit`]: processors::TargetPolicy::LongSideLimit
//! [`TargetPolicy::EdgeThresholds`]: processors::TargetPolicy::EdgeThresholds
//!
//! ## Modules
//!
//! * [`core`] - Error handling, validation, constants, and the batch tensor
//! * [`processors`] - Shape policies, batch shape resolution, normalization
//! * [`pipeline`] - The preprocessing pipeline gluing the processors together
//! * [`utils`] - Thin wrappers over the pixel-level resize/pad primitives
//!
//! ## Quick Start
//!
//! ```rust
//! use dbnet_prep::prelude::*;
//! use image::RgbImage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let preprocessor = DetPreprocessor::new(PreprocessConfig::default())?;
//!
//! let images = vec![RgbImage::new(320, 240), RgbImage::new(200, 100)];
//! let output = preprocessor.run(&images)?;
//!
//! // Exactly one tensor descriptor viewing the assembled batch buffer.
//! let views = output.tensor_views();
//! assert_eq!(views.len(), 1);
//! assert_eq!(views[0].shape[0], 2);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use dbnet_prep::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{PrepError, PrepResult, TensorView};
    pub use crate::pipeline::{DetPreprocessor, PreprocessConfig, PreprocessOutput};
    pub use crate::processors::{ImageInfo, TargetPolicy};
}
