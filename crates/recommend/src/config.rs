use crate::error::{RecommendError, Result};
use serde::{Deserialize, Serialize};

/// Query-time defaults applied when a request leaves them unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Results returned when the request carries no `top_k`
    pub default_top_k: usize,

    /// Upper bound applied to any requested `top_k`
    pub max_top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            max_top_k: 100,
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_top_k == 0 {
            return Err(RecommendError::InvalidConfig(
                "default_top_k must be >= 1".to_string(),
            ));
        }
        if self.max_top_k < self.default_top_k {
            return Err(RecommendError::InvalidConfig(format!(
                "max_top_k ({}) must be >= default_top_k ({})",
                self.max_top_k, self.default_top_k
            )));
        }
        Ok(())
    }

    /// Effective `top_k` for a request; `Some(0)` passes through so the
    /// service can reject it.
    #[must_use]
    pub fn resolve_top_k(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_top_k)
            .min(self.max_top_k)
    }
}
