//! Input validation utilities.
//!
//! This module provides validation helpers that reject malformed inputs and
//! configurations before they reach the shape computation, so that no NaN,
//! non-finite, or zero target size can ever be handed to the resize and pad
//! primitives.

use crate::core::constants::MAX_DIMENSION;
use crate::core::errors::{PrepError, PrepResult};
use image::RgbImage;

/// Validates that a float value is finite (not NaN or infinite).
#[inline]
pub fn validate_finite(value: f32, param_name: &str) -> PrepResult<()> {
    if !value.is_finite() {
        return Err(PrepError::ConfigError {
            message: format!("Parameter '{}' must be finite, got: {}", param_name, value),
        });
    }
    Ok(())
}

/// Validates that a value is positive (> 0).
#[inline]
pub fn validate_positive<T: PartialOrd + std::fmt::Display + Default>(
    value: T,
    param_name: &str,
) -> PrepResult<()> {
    if value <= T::default() {
        return Err(PrepError::ConfigError {
            message: format!(
                "Parameter '{}' must be positive, got: {}",
                param_name, value
            ),
        });
    }
    Ok(())
}

/// Validates that a collection is not empty.
#[inline]
pub fn validate_non_empty<T>(items: &[T], param_name: &str) -> PrepResult<()> {
    if items.is_empty() {
        return Err(PrepError::InvalidInput {
            message: format!("Parameter '{}' cannot be empty", param_name),
        });
    }
    Ok(())
}

/// Validates image dimensions.
///
/// Rejects zero-sized images and images exceeding [`MAX_DIMENSION`] on
/// either edge.
pub fn validate_image_dimensions(height: u32, width: u32, context: &str) -> PrepResult<()> {
    if height == 0 || width == 0 {
        return Err(PrepError::InvalidInput {
            message: format!(
                "{}: image dimensions must be positive, got {}x{}",
                context, height, width
            ),
        });
    }

    if height > MAX_DIMENSION || width > MAX_DIMENSION {
        return Err(PrepError::InvalidInput {
            message: format!(
                "{}: image dimensions exceed maximum of {}x{}, got {}x{}",
                context, MAX_DIMENSION, MAX_DIMENSION, height, width
            ),
        });
    }

    Ok(())
}

/// Validates a batch of images: non-empty and each has positive dimensions.
///
/// # Arguments
///
/// * `images` - The batch of images to validate
/// * `context` - Context string describing the validation (e.g., "detection preprocessing")
///
/// # Returns
///
/// `Ok(())` if validation passes, or `Err(PrepError::InvalidInput)` if:
/// - The batch is empty
/// - Any image has zero width or height
/// - Any image exceeds maximum dimensions
pub fn validate_image_batch(images: &[RgbImage], context: &str) -> PrepResult<()> {
    validate_non_empty(images, &format!("{} images", context))?;

    for (idx, img) in images.iter().enumerate() {
        validate_image_dimensions(
            img.height(),
            img.width(),
            &format!("{} image {}", context, idx),
        )?;
    }

    Ok(())
}

/// Validates normalization parameters (mean and std).
///
/// Both slices must have exactly three elements; all values must be finite
/// and every standard deviation must be positive.
pub fn validate_normalization_params(mean: &[f32], std: &[f32]) -> PrepResult<()> {
    if mean.len() != 3 {
        return Err(PrepError::ConfigError {
            message: format!("Mean must have exactly 3 elements for RGB, got {}", mean.len()),
        });
    }

    if std.len() != 3 {
        return Err(PrepError::ConfigError {
            message: format!("Std must have exactly 3 elements for RGB, got {}", std.len()),
        });
    }

    for (i, &m) in mean.iter().enumerate() {
        validate_finite(m, &format!("mean[{}]", i))?;
    }

    for (i, &s) in std.iter().enumerate() {
        validate_finite(s, &format!("std[{}]", i))?;
        validate_positive(s, &format!("std[{}]", i))?;
    }

    Ok(())
}
