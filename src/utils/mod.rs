//! Utility functions for the preprocessing pipeline.

pub mod image;

pub use image::{pad_to_bottom_right, resize_exact};
