use pantry_protocol::{ERROR_INDEX_MISMATCH, ERROR_INTERNAL, ERROR_INVALID_INPUT};
use pantry_vector_index::IndexError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommendError>;

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("top_k must be a positive integer")]
    InvalidTopK,

    #[error("max_calories must be a non-negative number, got {0}")]
    InvalidMaxCalories(f64),

    #[error("Recipe #{index} not found (corpus has {len} recipes)")]
    RecipeNotFound { index: usize, len: usize },

    #[error("Invalid query configuration: {0}")]
    InvalidConfig(String),

    #[error("Index error: {0}")]
    IndexError(#[from] IndexError),

    #[error("Normalizer error: {0}")]
    NormalizerError(#[from] pantry_normalizer::NormalizerError),
}

impl RecommendError {
    /// Stable error code for the wire envelope
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidTopK
            | Self::InvalidMaxCalories(_)
            | Self::RecipeNotFound { .. } => ERROR_INVALID_INPUT,
            Self::IndexError(
                IndexError::IndexMismatch { .. }
                | IndexError::ChecksumMismatch { .. }
                | IndexError::UnsupportedSchema { .. }
                | IndexError::Corrupt(_),
            ) => ERROR_INDEX_MISMATCH,
            _ => ERROR_INTERNAL,
        }
    }

    /// Caller mistakes, as opposed to server-side faults
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.code() == ERROR_INVALID_INPUT
    }
}
