use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};

/// Borrowed view of one sparse row: parallel, index-sorted slices.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f64],
}

impl SparseRow<'_> {
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product via merge-join over the sorted indices
    #[must_use]
    pub fn dot(&self, other: SparseRow<'_>) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// An owned sparse vector in a space of `dim` dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs; pairs are sorted and zeros dropped.
    #[must_use]
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.retain(|(_, v)| *v != 0.0);
        pairs.sort_by_key(|(idx, _)| *idx);
        let (indices, values) = pairs.into_iter().unzip();
        Self {
            dim,
            indices,
            values,
        }
    }

    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn as_row(&self) -> SparseRow<'_> {
        SparseRow {
            indices: &self.indices,
            values: &self.values,
        }
    }

    /// Scale to unit length in place; a zero vector stays zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.as_row().norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }
}

/// Corpus-size × vocabulary-size sparse matrix in CSR layout.
///
/// Row `i` belongs to the recipe at corpus position `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl DocumentTermMatrix {
    /// Stack rows in order; every row must live in the same `n_cols` space.
    pub fn from_rows(n_cols: usize, rows: Vec<SparseVector>) -> Result<Self> {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in rows {
            if row.dim != n_cols {
                return Err(IndexError::mismatch("row dimension", n_cols, row.dim));
            }
            indices.extend(row.indices);
            data.extend(row.values);
            indptr.push(indices.len());
        }
        Ok(Self {
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Row view; `None` when out of range
    #[must_use]
    pub fn row(&self, i: usize) -> Option<SparseRow<'_>> {
        let start = *self.indptr.get(i)?;
        let end = *self.indptr.get(i + 1)?;
        Some(SparseRow {
            indices: self.indices.get(start..end)?,
            values: self.data.get(start..end)?,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_>> + '_ {
        (0..self.n_rows()).filter_map(move |i| self.row(i))
    }

    /// Owned copy of one row
    #[must_use]
    pub fn row_vector(&self, i: usize) -> Option<SparseVector> {
        let row = self.row(i)?;
        Some(SparseVector {
            dim: self.n_cols,
            indices: row.indices.to_vec(),
            values: row.values.to_vec(),
        })
    }

    /// Structural check for matrices that came from disk
    pub fn validate(&self) -> Result<()> {
        if self.indptr.first() != Some(&0) {
            return Err(IndexError::Corrupt("indptr must start at 0".to_string()));
        }
        if self.indices.len() != self.data.len() {
            return Err(IndexError::mismatch(
                "matrix data length",
                self.indices.len(),
                self.data.len(),
            ));
        }
        if self.indptr.last() != Some(&self.data.len()) {
            return Err(IndexError::Corrupt(
                "indptr must end at the number of stored values".to_string(),
            ));
        }
        for (i, bounds) in self.indptr.windows(2).enumerate() {
            let (start, end) = (bounds[0], bounds[1]);
            if start > end {
                return Err(IndexError::Corrupt(format!("indptr decreases at row {i}")));
            }
            let row = self.indices.get(start..end).ok_or_else(|| {
                IndexError::Corrupt(format!("row {i} extends past the stored values"))
            })?;
            if row.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(IndexError::Corrupt(format!(
                    "row {i} column indices are not strictly increasing"
                )));
            }
            if let Some(&col) = row.last() {
                if col >= self.n_cols {
                    return Err(IndexError::Corrupt(format!(
                        "row {i} references column {col} of {}",
                        self.n_cols
                    )));
                }
            }
        }
        if self.data.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(IndexError::Corrupt(
                "matrix weights must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
