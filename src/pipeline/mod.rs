//! The batch preprocessing pipeline.
//!
//! [`DetPreprocessor`] glues the processors together for one batch call:
//! it resolves every image's target shape, resizes each image to its own
//! target, pads the batch to a common shape, runs one batched
//! normalize-and-layout pass, and wraps the result as a tensor buffer with
//! a single borrowing descriptor for the inference engine.
//!
//! The preprocessor holds no per-call mutable state; every operation takes
//! explicit parameters, so one instance can be shared by concurrent
//! callers. Each call still processes one batch start-to-finish,
//! synchronously.

use crate::core::constants::{DEFAULT_ALIGN, DEFAULT_MEAN, DEFAULT_SCALE, DEFAULT_STD};
use crate::core::errors::{PrepError, PrepResult};
use crate::core::tensor::{BatchTensor, TensorLayout, TensorView};
use crate::core::validation::{
    validate_finite, validate_image_batch, validate_normalization_params, validate_positive,
};
use crate::processors::batch_shape::resolve_batch_shape;
use crate::processors::normalization::Normalizer;
use crate::processors::types::{ChannelOrder, ImageInfo, TargetPolicy};
use crate::utils::image::{pad_to_bottom_right, resize_exact};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the detection preprocessing pipeline.
///
/// Set once before building a [`DetPreprocessor`]; read on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// The sizing policy applied to every image of a batch.
    pub policy: TargetPolicy,
    /// The alignment base target dimensions are rounded to.
    pub align: u32,
    /// Scaling factor applied to pixel values before normalization.
    pub scale: f32,
    /// Per-channel mean.
    pub mean: [f32; 3],
    /// Per-channel standard deviation.
    pub std: [f32; 3],
    /// Skip mean/variance normalization, keeping raw pixel values.
    pub disable_normalize: bool,
    /// Skip the interleaved-to-planar permutation, keeping HWC layout.
    pub disable_permute: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            policy: TargetPolicy::default(),
            align: DEFAULT_ALIGN,
            scale: DEFAULT_SCALE,
            mean: DEFAULT_MEAN,
            std: DEFAULT_STD,
            disable_normalize: false,
            disable_permute: false,
        }
    }
}

impl PreprocessConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> PrepResult<()> {
        self.policy.validate(self.align)?;
        validate_finite(self.scale, "scale")?;
        validate_positive(self.scale, "scale")?;
        validate_normalization_params(&self.mean, &self.std)?;
        Ok(())
    }

    /// Loads and validates a configuration from a JSON string.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> PrepResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PrepError::config_error(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

/// Output of one preprocessing call.
#[derive(Debug)]
pub struct PreprocessOutput {
    /// The assembled batch tensor.
    pub batch: BatchTensor,
    /// Per-image sizing records, ordered by batch index.
    pub infos: Vec<ImageInfo>,
}

impl PreprocessOutput {
    /// Returns the descriptors consumed by the inference engine: exactly
    /// one view of the batch buffer's data.
    pub fn tensor_views(&self) -> Vec<TensorView<'_>> {
        vec![self.batch.as_view()]
    }
}

/// Batch preprocessor for detection models.
///
/// Immutable after construction; see the module docs for the concurrency
/// contract.
#[derive(Debug, Clone)]
pub struct DetPreprocessor {
    config: PreprocessConfig,
    normalizer: Normalizer,
}

impl DetPreprocessor {
    /// Creates a preprocessor from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any parameter fails validation.
    pub fn new(config: PreprocessConfig) -> PrepResult<Self> {
        config.validate()?;

        let normalizer = if config.disable_normalize {
            Normalizer::identity()
        } else {
            Normalizer::new(config.scale, config.mean, config.std)?
        };

        Ok(Self { config, normalizer })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Preprocesses one batch of images into a single tensor.
    ///
    /// Under well-formed input (non-empty batch, positive image
    /// dimensions) this always succeeds; there is no data-dependent
    /// failure path.
    pub fn run(&self, images: &[RgbImage]) -> PrepResult<PreprocessOutput> {
        validate_image_batch(images, "detection preprocessing")?;

        let shape = resolve_batch_shape(images, &self.config.policy, self.config.align)?;
        debug!(
            "resolved batch shape {}x{} over {} images",
            shape.max_w,
            shape.max_h,
            images.len()
        );

        let mut prepared = Vec::with_capacity(images.len());
        for (i, (img, info)) in images.iter().zip(&shape.infos).enumerate() {
            let resized = resize_exact(img, info.target_w, info.target_h);

            // The maxima are computed over these same targets, so the pad
            // amounts cannot be negative.
            debug_assert!(shape.max_w >= info.target_w && shape.max_h >= info.target_h);
            let padded = pad_to_bottom_right(&resized, shape.max_w, shape.max_h);

            debug!(
                "image {}: {}x{} -> {}x{}, padded to {}x{}",
                i, info.src_w, info.src_h, info.target_w, info.target_h, shape.max_w, shape.max_h
            );
            prepared.push(padded);
        }

        let order = if self.config.disable_permute {
            ChannelOrder::HWC
        } else {
            ChannelOrder::CHW
        };
        let tensor = self.normalizer.apply_batch(&prepared, order)?;
        debug!("batch tensor shape {:?}", tensor.shape());

        let layout = match order {
            ChannelOrder::CHW => TensorLayout::Nchw,
            ChannelOrder::HWC => TensorLayout::Nhwc,
        };

        Ok(PreprocessOutput {
            batch: BatchTensor::new(tensor, layout),
            infos: shape.infos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tensor::DType;
    use image::Rgb;

    fn small_thresholds() -> TargetPolicy {
        TargetPolicy::EdgeThresholds {
            long_min: 64,
            short_min: 32,
        }
    }

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_batch_shares_one_padded_shape() {
        let config = PreprocessConfig {
            policy: small_thresholds(),
            ..Default::default()
        };
        let preprocessor = DetPreprocessor::new(config).unwrap();

        // 40x30 resolves to 64x64, 20x60 to 32x96.
        let images = vec![gradient_image(40, 30), gradient_image(20, 60)];
        let output = preprocessor.run(&images).unwrap();

        assert_eq!(output.batch.shape(), [2, 3, 96, 64]);
        for info in &output.infos {
            assert!(info.target_w <= 64);
            assert!(info.target_h <= 96);
        }
    }

    #[test]
    fn test_two_runs_are_bit_identical() {
        let config = PreprocessConfig {
            policy: small_thresholds(),
            ..Default::default()
        };
        let preprocessor = DetPreprocessor::new(config).unwrap();
        let images = vec![gradient_image(40, 30), gradient_image(20, 60)];

        let a = preprocessor.run(&images).unwrap();
        let b = preprocessor.run(&images).unwrap();
        assert_eq!(a.batch.data(), b.batch.data());
    }

    #[test]
    fn test_disabled_flags_keep_raw_hwc_values() {
        let config = PreprocessConfig {
            policy: TargetPolicy::Fixed {
                height: 32,
                width: 32,
            },
            disable_normalize: true,
            disable_permute: true,
            ..Default::default()
        };
        let preprocessor = DetPreprocessor::new(config).unwrap();

        // Already at the fixed target, so no resample touches the pixels.
        let img = gradient_image(32, 32);
        let output = preprocessor.run(&[img.clone()]).unwrap();
        let tensor = output.batch.data();

        assert_eq!(output.batch.layout(), TensorLayout::Nhwc);
        assert_eq!(output.batch.shape(), [1, 32, 32, 3]);
        for y in 0..32u32 {
            for x in 0..32u32 {
                let pixel = img.get_pixel(x, y);
                for c in 0..3 {
                    assert_eq!(tensor[[0, y as usize, x as usize, c]], pixel[c] as f32);
                }
            }
        }
    }

    #[test]
    fn test_padding_is_zero_and_content_keeps_origin() {
        let config = PreprocessConfig {
            policy: small_thresholds(),
            disable_normalize: true,
            disable_permute: true,
            ..Default::default()
        };
        let preprocessor = DetPreprocessor::new(config).unwrap();

        let images = vec![
            RgbImage::from_pixel(40, 30, Rgb([255, 255, 255])),
            RgbImage::from_pixel(20, 60, Rgb([255, 255, 255])),
        ];
        let output = preprocessor.run(&images).unwrap();
        let tensor = output.batch.data();

        // Image 0 occupies 64x64 of the 64x96 slot: rows below 64 are padding.
        assert!(tensor[[0, 0, 0, 0]] > 200.0);
        assert_eq!(tensor[[0, 80, 10, 0]], 0.0);
        assert_eq!(tensor[[0, 95, 63, 2]], 0.0);
        // Image 1 occupies 32x96: columns right of 32 are padding.
        assert!(tensor[[1, 0, 0, 0]] > 200.0);
        assert_eq!(tensor[[1, 0, 40, 1]], 0.0);
    }

    #[test]
    fn test_static_policy_forces_fixed_shape() {
        let config = PreprocessConfig {
            policy: TargetPolicy::Fixed {
                height: 64,
                width: 96,
            },
            ..Default::default()
        };
        let preprocessor = DetPreprocessor::new(config).unwrap();

        let images = vec![gradient_image(400, 300), gradient_image(12, 34)];
        let output = preprocessor.run(&images).unwrap();

        assert_eq!(output.batch.shape(), [2, 3, 64, 96]);
        for info in &output.infos {
            assert_eq!((info.target_w, info.target_h), (96, 64));
        }
    }

    #[test]
    fn test_exactly_one_view_with_buffer_metadata() {
        let config = PreprocessConfig {
            policy: small_thresholds(),
            ..Default::default()
        };
        let preprocessor = DetPreprocessor::new(config).unwrap();
        let output = preprocessor.run(&[gradient_image(40, 30)]).unwrap();

        let views = output.tensor_views();
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.shape, output.batch.shape());
        assert_eq!(view.dtype, DType::F32);
        assert_eq!(view.layout, output.batch.layout());
        assert_eq!(view.device, output.batch.device());
        assert_eq!(view.device_id, output.batch.device_id());
        assert_eq!(view.as_ptr(), output.batch.data().as_ptr());
    }

    #[test]
    fn test_empty_batch_rejected() {
        let preprocessor = DetPreprocessor::new(PreprocessConfig::default()).unwrap();
        assert!(preprocessor.run(&[]).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PreprocessConfig {
            policy: TargetPolicy::EdgeThresholds {
                long_min: 960,
                short_min: 0,
            },
            ..Default::default()
        };
        assert!(DetPreprocessor::new(config).is_err());

        let config = PreprocessConfig {
            std: [0.0, 0.5, 0.5],
            ..Default::default()
        };
        assert!(DetPreprocessor::new(config).is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config = PreprocessConfig::from_json(
            r#"{
                "policy": { "EdgeThresholds": { "long_min": 960, "short_min": 640 } },
                "disable_normalize": true
            }"#,
        )
        .unwrap();
        assert!(config.disable_normalize);
        assert!(!config.disable_permute);
        assert_eq!(config.align, 32);

        // Unparseable and invalid configurations are both rejected.
        assert!(PreprocessConfig::from_json("not json").is_err());
        assert!(
            PreprocessConfig::from_json(
                r#"{ "policy": { "LongSideLimit": { "max_side_len": 0 } } }"#
            )
            .is_err()
        );
    }
}
