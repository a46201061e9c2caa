use crate::analyzer::Analyzer;
use crate::error::{IndexError, Result};
use crate::matrix::SparseVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Frozen term → dimension mapping plus the IDF weight of every dimension.
///
/// Terms are stored in lexicographic order and a term's dimension is its
/// position. Terms that were not seen while fitting are not representable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PersistedVocabulary", into = "PersistedVocabulary")]
pub struct Vocabulary {
    ngram_range: (usize, usize),
    terms: Vec<String>,
    idf: Vec<f64>,
    lookup: HashMap<String, usize>,
    analyzer: Analyzer,
}

#[derive(Serialize, Deserialize)]
struct PersistedVocabulary {
    ngram_range: (usize, usize),
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl Vocabulary {
    pub(crate) fn new(ngram_range: (usize, usize), terms: Vec<String>, idf: Vec<f64>) -> Result<Self> {
        if terms.len() != idf.len() {
            return Err(IndexError::mismatch("idf length", terms.len(), idf.len()));
        }
        if terms.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(IndexError::Corrupt(
                "vocabulary terms must be unique and sorted".to_string(),
            ));
        }
        if idf.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(IndexError::Corrupt(
                "idf weights must be finite and non-negative".to_string(),
            ));
        }
        let lookup = terms
            .iter()
            .enumerate()
            .map(|(dim, term)| (term.clone(), dim))
            .collect();
        Ok(Self {
            ngram_range,
            analyzer: Analyzer::new(ngram_range)?,
            terms,
            idf,
            lookup,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn dimension(&self, term: &str) -> Option<usize> {
        self.lookup.get(term).copied()
    }

    #[must_use]
    pub fn term(&self, dim: usize) -> Option<&str> {
        self.terms.get(dim).map(String::as_str)
    }

    #[must_use]
    pub fn idf(&self, dim: usize) -> Option<f64> {
        self.idf.get(dim).copied()
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub const fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    /// Learned multi-word terms, in vocabulary order
    pub fn bigrams(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms
            .iter()
            .filter(|term| term.contains(' '))
            .map(String::as_str)
    }

    /// Project a pseudo-document into this space: raw counts × IDF, L2-normalized.
    ///
    /// Unknown terms are dropped; a document with no known terms maps to the zero vector.
    #[must_use]
    pub fn transform(&self, document: &str) -> SparseVector {
        let pairs = self
            .analyzer
            .term_counts(document)
            .into_iter()
            .filter_map(|(term, count)| {
                let dim = self.dimension(&term)?;
                Some((dim, f64::from(count) * self.idf[dim]))
            })
            .collect();
        let mut vector = SparseVector::from_pairs(self.len(), pairs);
        vector.l2_normalize();
        vector
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.ngram_range == other.ngram_range && self.terms == other.terms && self.idf == other.idf
    }
}

impl TryFrom<PersistedVocabulary> for Vocabulary {
    type Error = IndexError;

    fn try_from(raw: PersistedVocabulary) -> Result<Self> {
        Self::new(raw.ngram_range, raw.terms, raw.idf)
    }
}

impl From<Vocabulary> for PersistedVocabulary {
    fn from(vocab: Vocabulary) -> Self {
        Self {
            ngram_range: vocab.ngram_range,
            terms: vocab.terms,
            idf: vocab.idf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new(
            (1, 2),
            vec!["beef".into(), "ground".into(), "ground beef".into(), "rice".into()],
            vec![1.5, 1.2, 1.8, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn lookups_are_positional() {
        let v = vocab();
        assert_eq!(v.dimension("ground beef"), Some(2));
        assert_eq!(v.term(3), Some("rice"));
        assert_eq!(v.dimension("saffron"), None);
        assert_eq!(v.bigrams().collect::<Vec<_>>(), vec!["ground beef"]);
    }

    #[test]
    fn transform_drops_unknown_terms() {
        let v = vocab();
        let known = v.transform("ground beef saffron");
        assert_eq!(known.as_row().indices, &[0, 1, 2]);
        assert!((known.as_row().norm() - 1.0).abs() < 1e-12);

        let unknown = v.transform("saffron vanilla");
        assert_eq!(unknown.nnz(), 0);
        assert_eq!(unknown.dim(), 4);
    }

    #[test]
    fn rejects_unsorted_or_misaligned_tables() {
        assert!(Vocabulary::new((1, 1), vec!["b".into(), "a".into()], vec![1.0, 1.0]).is_err());
        assert!(Vocabulary::new((1, 1), vec!["a".into()], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn serde_roundtrip_rebuilds_lookup() {
        let v = vocab();
        let json = serde_json::to_string(&v).unwrap();
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert_eq!(back.dimension("rice"), Some(3));
    }
}
