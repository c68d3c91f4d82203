//! Batched normalization and channel-layout assembly.
//!
//! After resizing and padding, every image of a batch shares one shape. The
//! [`Normalizer`] turns such a batch into a single 4D tensor in one pass,
//! applying per-channel mean/variance normalization and the requested
//! channel layout at the same time.

use crate::core::errors::{PrepError, PrepResult};
use crate::core::tensor::Tensor4D;
use crate::core::validation::{
    validate_finite, validate_image_dimensions, validate_normalization_params, validate_positive,
};
use crate::processors::types::ChannelOrder;
use image::RgbImage;
use ndarray::Array4;
use rayon::prelude::*;

/// Normalizes a batch of images into one tensor.
///
/// The per-channel coefficients are precomputed at construction time as
/// `alpha = scale / std` and `beta = -mean / std`, so each pixel costs one
/// multiply-add.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    /// Scaling factor for each channel (`alpha = scale / std`).
    alpha: [f32; 3],
    /// Offset for each channel (`beta = -mean / std`).
    beta: [f32; 3],
}

impl Normalizer {
    /// Creates a new Normalizer from scale, mean, and std.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the scale is not positive and
    /// finite, or if mean/std fail validation (three finite elements,
    /// positive std).
    pub fn new(scale: f32, mean: [f32; 3], std: [f32; 3]) -> PrepResult<Self> {
        validate_finite(scale, "scale")?;
        validate_positive(scale, "scale")?;
        validate_normalization_params(&mean, &std)?;

        let mut alpha = [0.0; 3];
        let mut beta = [0.0; 3];
        for c in 0..3 {
            alpha[c] = scale / std[c];
            beta[c] = -mean[c] / std[c];
        }

        Ok(Self { alpha, beta })
    }

    /// Creates a pass-through Normalizer.
    ///
    /// With `alpha = 1` and `beta = 0` the resized and padded pixel values
    /// survive the batch assembly unchanged.
    pub fn identity() -> Self {
        Self {
            alpha: [1.0; 3],
            beta: [0.0; 3],
        }
    }

    /// Normalizes a batch of same-sized images into one 4D tensor.
    ///
    /// The whole batch is processed in a single pass; batches with more
    /// than one image are filled in parallel.
    ///
    /// # Arguments
    ///
    /// * `imgs` - Images to assemble; all must share one width and height
    /// * `order` - `CHW` for a planar `[batch, 3, h, w]` tensor, `HWC` for
    ///   an interleaved `[batch, h, w, 3]` tensor
    ///
    /// # Errors
    ///
    /// Returns an error if the images do not all share the same dimensions.
    pub fn apply_batch(&self, imgs: &[RgbImage], order: ChannelOrder) -> PrepResult<Tensor4D> {
        if imgs.is_empty() {
            return Ok(Array4::zeros((0, 0, 0, 0)));
        }

        let (width, height) = imgs[0].dimensions();
        validate_image_dimensions(height, width, "batch normalization")?;
        for (i, img) in imgs.iter().enumerate() {
            if img.dimensions() != (width, height) {
                return Err(PrepError::InvalidInput {
                    message: format!(
                        "All images in batch must have the same dimensions. Image 0: {}x{}, Image {}: {}x{}",
                        width,
                        height,
                        i,
                        img.width(),
                        img.height()
                    ),
                });
            }
        }

        let batch_size = imgs.len();
        let (w, h) = (width as usize, height as usize);
        let img_size = 3 * h * w;
        let mut data = vec![0.0f32; batch_size * img_size];

        if batch_size <= 1 {
            // Avoid rayon overhead for single-image batches
            self.fill_image(&imgs[0], order, &mut data[..img_size]);
        } else {
            data.par_chunks_mut(img_size)
                .enumerate()
                .for_each(|(batch_idx, chunk)| {
                    self.fill_image(&imgs[batch_idx], order, chunk);
                });
        }

        let shape = match order {
            ChannelOrder::CHW => (batch_size, 3, h, w),
            ChannelOrder::HWC => (batch_size, h, w, 3),
        };

        Array4::from_shape_vec(shape, data).map_err(|e| {
            PrepError::normalization(
                &format!(
                    "failed to create {:?} batch tensor for {} images of {}x{}",
                    order, batch_size, width, height
                ),
                e,
            )
        })
    }

    /// Writes one normalized image into its slot of the batch buffer.
    fn fill_image(&self, img: &RgbImage, order: ChannelOrder, out: &mut [f32]) {
        let (width, height) = img.dimensions();
        let (w, h) = (width as usize, height as usize);

        match order {
            ChannelOrder::CHW => {
                for c in 0..3 {
                    for y in 0..h {
                        for x in 0..w {
                            let pixel = img.get_pixel(x as u32, y as u32);
                            out[c * h * w + y * w + x] =
                                pixel[c] as f32 * self.alpha[c] + self.beta[c];
                        }
                    }
                }
            }
            ChannelOrder::HWC => {
                for y in 0..h {
                    for x in 0..w {
                        let pixel = img.get_pixel(x as u32, y as u32);
                        for c in 0..3 {
                            out[(y * w + x) * 3 + c] =
                                pixel[c] as f32 * self.alpha[c] + self.beta[c];
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_coefficients() {
        let n = Normalizer::new(1.0 / 255.0, [0.485, 0.456, 0.406], [0.229, 0.224, 0.225])
            .unwrap();
        assert!((n.alpha[0] - 1.0 / 255.0 / 0.229).abs() < 1e-7);
        assert!((n.beta[0] - (-0.485 / 0.229)).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(Normalizer::new(0.0, [0.5; 3], [0.5; 3]).is_err());
        assert!(Normalizer::new(-1.0, [0.5; 3], [0.5; 3]).is_err());
        assert!(Normalizer::new(1.0, [f32::NAN, 0.5, 0.5], [0.5; 3]).is_err());
        assert!(Normalizer::new(1.0, [0.5; 3], [0.0, 0.5, 0.5]).is_err());
    }

    #[test]
    fn test_identity_preserves_pixel_values() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([40, 50, 60]));
        img.put_pixel(0, 1, Rgb([70, 80, 90]));
        img.put_pixel(1, 1, Rgb([100, 110, 120]));

        let tensor = Normalizer::identity()
            .apply_batch(&[img], ChannelOrder::CHW)
            .unwrap();

        assert_eq!(tensor.dim(), (1, 3, 2, 2));
        assert_eq!(tensor[[0, 0, 0, 0]], 10.0);
        assert_eq!(tensor[[0, 1, 0, 0]], 20.0);
        assert_eq!(tensor[[0, 2, 0, 0]], 30.0);
        assert_eq!(tensor[[0, 0, 1, 1]], 100.0);
        assert_eq!(tensor[[0, 2, 0, 1]], 60.0);
    }

    #[test]
    fn test_hwc_layout_keeps_channels_interleaved() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([1, 2, 3]));
        img.put_pixel(1, 0, Rgb([4, 5, 6]));

        let tensor = Normalizer::identity()
            .apply_batch(&[img], ChannelOrder::HWC)
            .unwrap();

        assert_eq!(tensor.dim(), (1, 1, 2, 3));
        assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[0, 0, 0, 2]], 3.0);
        assert_eq!(tensor[[0, 0, 1, 1]], 5.0);
    }

    #[test]
    fn test_normalization_applies_mean_and_std() {
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 128]));
        let n = Normalizer::new(1.0 / 255.0, [0.5, 0.5, 0.5], [0.25, 0.25, 0.25]).unwrap();
        let tensor = n.apply_batch(&[img], ChannelOrder::CHW).unwrap();

        // (255/255 - 0.5) / 0.25 = 2.0, (0 - 0.5) / 0.25 = -2.0
        assert!((tensor[[0, 0, 0, 0]] - 2.0).abs() < 1e-5);
        assert!((tensor[[0, 1, 0, 0]] + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let imgs = vec![RgbImage::new(2, 2), RgbImage::new(3, 2)];
        let result = Normalizer::identity().apply_batch(&imgs, ChannelOrder::CHW);
        assert!(result.is_err());
    }

    #[test]
    fn test_multi_image_batch_fills_every_slot() {
        let imgs = vec![
            RgbImage::from_pixel(2, 2, Rgb([10, 10, 10])),
            RgbImage::from_pixel(2, 2, Rgb([20, 20, 20])),
            RgbImage::from_pixel(2, 2, Rgb([30, 30, 30])),
        ];
        let tensor = Normalizer::identity()
            .apply_batch(&imgs, ChannelOrder::CHW)
            .unwrap();

        assert_eq!(tensor.dim(), (3, 3, 2, 2));
        assert_eq!(tensor[[0, 0, 0, 0]], 10.0);
        assert_eq!(tensor[[1, 1, 1, 0]], 20.0);
        assert_eq!(tensor[[2, 2, 1, 1]], 30.0);
    }
}
