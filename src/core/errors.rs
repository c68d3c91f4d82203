//! Error types for the preprocessing pipeline.
//!
//! This module defines the error types that can occur while preparing a
//! batch of images for detection inference, along with helper constructors
//! for creating errors with appropriate context.

use thiserror::Error;

/// Enum representing different stages of the preprocessing pipeline.
///
/// This enum is used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred during image resizing.
    Resize,
    /// Error occurred during image normalization.
    Normalization,
    /// Error occurred while assembling the batch tensor.
    BatchAssembly,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::BatchAssembly => write!(f, "batch assembly"),
        }
    }
}

/// Enum representing the errors that can occur in the preprocessing pipeline.
#[derive(Error, Debug)]
pub enum PrepError {
    /// Error occurred during a processing stage.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },
}

/// Convenient result alias for preprocessing operations.
pub type PrepResult<T> = Result<T, PrepError>;

impl PrepError {
    /// Creates a PrepError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a PrepError for a configuration problem.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a PrepError for normalization operations.
    pub fn normalization(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Normalization,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a PrepError for batch assembly operations.
    pub fn batch_assembly(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::BatchAssembly,
            context: context.to_string(),
            source: Box::new(error),
        }
    }
}
