use crate::analyzer::Analyzer;
use crate::error::{IndexError, Result};
use crate::matrix::{DocumentTermMatrix, SparseVector};
use crate::params::FitParams;
use crate::vocabulary::Vocabulary;
use std::collections::BTreeMap;

/// Offline TF-IDF fitter over normalized pseudo-documents.
///
/// Fitting is a pure function of `(documents, params)`: every map is ordered,
/// so vocabulary and weights are bit-for-bit reproducible.
#[derive(Debug, Clone)]
pub struct VectorIndexBuilder {
    params: FitParams,
}

impl VectorIndexBuilder {
    pub fn new(params: FitParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub const fn params(&self) -> &FitParams {
        &self.params
    }

    /// Fit the vocabulary and weight every document against it.
    ///
    /// Row `i` of the returned matrix is `documents[i]`.
    pub fn fit<S: AsRef<str>>(&self, documents: &[S]) -> Result<(Vocabulary, DocumentTermMatrix)> {
        let n_docs = documents.len();
        if n_docs == 0 {
            return Err(IndexError::EmptyVocabulary(
                "cannot fit on an empty corpus".to_string(),
            ));
        }

        let analyzer = Analyzer::new(self.params.ngram_range)?;
        let counts: Vec<BTreeMap<String, u32>> = documents
            .iter()
            .map(|doc| analyzer.term_counts(doc.as_ref()))
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if doc_freq.is_empty() {
            return Err(IndexError::EmptyVocabulary(
                "every document reduced to zero terms".to_string(),
            ));
        }

        let candidates = doc_freq.len();
        let max_doc_count = self.params.max_doc_count(n_docs)?;
        let kept: Vec<(&str, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.params.min_df && (*df as f64) <= max_doc_count)
            .collect();
        if kept.is_empty() {
            return Err(IndexError::EmptyVocabulary(format!(
                "no terms left after pruning (min_df={}, max_df={})",
                self.params.min_df, self.params.max_df
            )));
        }

        let n = n_docs as f64;
        let terms: Vec<String> = kept.iter().map(|(term, _)| (*term).to_string()).collect();
        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, df)| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        log::debug!(
            "Fitted {} terms over {} documents ({} pruned)",
            terms.len(),
            n_docs,
            candidates - terms.len()
        );

        let vocabulary = Vocabulary::new(self.params.ngram_range, terms, idf)?;
        let rows = counts
            .iter()
            .map(|doc| weigh(&vocabulary, doc))
            .collect();
        let matrix = DocumentTermMatrix::from_rows(vocabulary.len(), rows)?;

        Ok((vocabulary, matrix))
    }
}

fn weigh(vocabulary: &Vocabulary, counts: &BTreeMap<String, u32>) -> SparseVector {
    let pairs = counts
        .iter()
        .filter_map(|(term, count)| {
            let dim = vocabulary.dimension(term)?;
            let idf = vocabulary.idf(dim)?;
            Some((dim, f64::from(*count) * idf))
        })
        .collect();
    let mut row = SparseVector::from_pairs(vocabulary.len(), pairs);
    row.l2_normalize();
    row
}
