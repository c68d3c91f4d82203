//! Core building blocks of the preprocessing pipeline.
//!
//! This module contains the fundamental components shared by the rest of the
//! crate:
//! - Error handling
//! - Input validation utilities
//! - Constants used throughout the pipeline
//! - The batch tensor buffer and its borrowing view
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod constants;
pub mod errors;
pub mod tensor;
pub mod validation;

pub use constants::*;
pub use errors::{PrepError, PrepResult, ProcessingStage};
pub use tensor::{BatchTensor, DType, DeviceKind, Tensor4D, TensorLayout, TensorView};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging; library code only emits events and never installs a
/// subscriber on its own.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
