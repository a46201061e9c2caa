use crate::error::{IndexError, Result};
use crate::matrix::{DocumentTermMatrix, SparseRow, SparseVector};
use ndarray::Array2;

/// Stateless cosine scorer over the document-term matrix.
pub struct SimilarityEngine;

impl SimilarityEngine {
    /// Cosine similarity of two non-negative sparse rows, in `[0, 1]`.
    ///
    /// A zero-norm side scores 0.
    #[must_use]
    pub fn cosine(a: SparseRow<'_>, b: SparseRow<'_>) -> f64 {
        let norm_a = a.norm();
        let norm_b = b.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
    }

    /// One score per matrix row, aligned by row index
    pub fn score(query: &SparseVector, matrix: &DocumentTermMatrix) -> Result<Vec<f64>> {
        if query.dim() != matrix.n_cols() {
            return Err(IndexError::mismatch(
                "query dimension",
                matrix.n_cols(),
                query.dim(),
            ));
        }

        let query_row = query.as_row();
        if query_row.is_empty() {
            return Ok(vec![0.0; matrix.n_rows()]);
        }

        Ok(matrix
            .rows()
            .map(|row| Self::cosine(query_row, row))
            .collect())
    }

    /// Dense all-pairs similarity of the corpus with itself.
    ///
    /// O(n²) memory; for analytics only, never on the query path.
    #[must_use]
    pub fn pairwise(matrix: &DocumentTermMatrix) -> Array2<f32> {
        let n = matrix.n_rows();
        let rows: Vec<SparseRow<'_>> = matrix.rows().collect();
        let mut out = Array2::<f32>::zeros((n, n));
        for i in 0..n {
            for j in i..n {
                #[allow(clippy::cast_possible_truncation)]
                let sim = Self::cosine(rows[i], rows[j]) as f32;
                out[[i, j]] = sim;
                out[[j, i]] = sim;
            }
        }
        out
    }
}
