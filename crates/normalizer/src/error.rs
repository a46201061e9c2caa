use thiserror::Error;

/// Result type for normalizer operations
pub type Result<T> = std::result::Result<T, NormalizerError>;

/// Errors that can occur while building a normalizer
#[derive(Error, Debug)]
pub enum NormalizerError {
    /// A quantity or unit pattern failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl NormalizerError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub(crate) fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}
