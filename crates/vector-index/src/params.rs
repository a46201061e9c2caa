use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};

/// TF-IDF fitting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Terms present in fewer documents than this are dropped as noise
    pub min_df: usize,

    /// Terms present in more than this fraction of documents are dropped as uninformative
    pub max_df: f64,

    /// Inclusive n-gram window
    pub ngram_range: (usize, usize),
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            min_df: 4,
            max_df: 0.8,
            ngram_range: (1, 2),
        }
    }
}

impl FitParams {
    /// Parameters that keep every term; useful for tiny corpora
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            min_df: 1,
            max_df: 1.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_df == 0 {
            return Err(IndexError::InvalidParams("min_df must be >= 1".to_string()));
        }

        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(IndexError::InvalidParams(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }

        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(IndexError::InvalidParams(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({lo}, {hi})"
            )));
        }

        Ok(())
    }

    /// Resolve `max_df` to a document count and check it against `min_df`
    pub(crate) fn max_doc_count(&self, n_docs: usize) -> Result<f64> {
        let max_doc_count = self.max_df * n_docs as f64;
        if max_doc_count < self.min_df as f64 {
            return Err(IndexError::InvalidParams(format!(
                "max_df={} over {n_docs} documents allows {max_doc_count:.2} documents, fewer than min_df={}",
                self.max_df, self.min_df
            )));
        }
        Ok(max_doc_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        let params = FitParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.min_df, 4);
        assert_eq!(params.ngram_range, (1, 2));
        assert!(FitParams::permissive().validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let mut params = FitParams::default();

        params.min_df = 0;
        assert!(params.validate().is_err());

        params = FitParams {
            max_df: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        params = FitParams {
            max_df: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        params = FitParams {
            ngram_range: (2, 1),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_max_df_below_min_df_is_rejected() {
        let params = FitParams::default();
        // 0.8 * 3 = 2.4 documents < min_df = 4
        assert!(matches!(
            params.max_doc_count(3),
            Err(IndexError::InvalidParams(_))
        ));
        assert!(params.max_doc_count(100).is_ok());
    }
}
