//! Sparse document-by-feature matrix.
//!
//! Rows are documents, columns are vocabulary features, cells are
//! non-negative presence flags or term counts. The matrix is built once,
//! validated, and read-only afterwards; mining workers share it immutably.

use serde::{Deserialize, Serialize};

use crate::error::{MineError, Result};

/// Row-major sparse matrix (CSR layout) of non-negative feature values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix {
    /// Row `i` occupies `indices[indptr[i]..indptr[i + 1]]`.
    indptr: Vec<usize>,
    /// Column ids, strictly increasing within each row.
    indices: Vec<u32>,
    /// Values parallel to `indices`.
    values: Vec<f32>,
    cols: usize,
}

impl SparseMatrix {
    /// Build from per-row `(column, value)` entries.
    ///
    /// Each row must have strictly increasing column ids below `cols`, and
    /// every value must be finite and non-negative. Zero-valued entries are
    /// dropped. Rows may be empty; such documents are excluded from mining
    /// but still receive a label during assignment.
    pub fn from_rows(rows: Vec<Vec<(u32, f32)>>, cols: usize) -> Result<Self> {
        if rows.is_empty() || cols == 0 {
            return Err(MineError::EmptyMatrix {
                rows: rows.len(),
                cols,
            });
        }

        let nnz = rows.iter().map(Vec::len).sum();
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        indptr.push(0);

        for (row, entries) in rows.into_iter().enumerate() {
            let mut prev: Option<u32> = None;
            for (col, val) in entries {
                if col as usize >= cols {
                    return Err(MineError::MalformedRow {
                        row,
                        reason: format!("column {col} out of range for {cols} columns"),
                    });
                }
                if prev.is_some_and(|p| col <= p) {
                    return Err(MineError::MalformedRow {
                        row,
                        reason: format!("column ids must be strictly increasing at {col}"),
                    });
                }
                if !val.is_finite() || val < 0.0 {
                    return Err(MineError::MalformedRow {
                        row,
                        reason: format!("value {val} at column {col} is not a non-negative finite number"),
                    });
                }
                prev = Some(col);
                if val > 0.0 {
                    indices.push(col);
                    values.push(val);
                }
            }
            indptr.push(indices.len());
        }

        Ok(Self {
            indptr,
            indices,
            values,
            cols,
        })
    }

    /// Build from dense rows; convenient for tests and small corpora.
    pub fn from_dense(rows: &[Vec<f32>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let sparse = rows
            .iter()
            .enumerate()
            .map(|(row, dense)| {
                if dense.len() != cols {
                    return Err(MineError::MalformedRow {
                        row,
                        reason: format!("row has {} columns, expected {cols}", dense.len()),
                    });
                }
                Ok(dense
                    .iter()
                    .enumerate()
                    .filter(|(_, &v)| v != 0.0)
                    .map(|(col, &v)| (col as u32, v))
                    .collect())
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(sparse, cols)
    }

    /// Number of documents.
    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Number of vocabulary features.
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Borrow row `i` as parallel index/value slices.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows()`.
    pub fn row(&self, i: usize) -> SparseRow<'_> {
        let span = self.indptr[i]..self.indptr[i + 1];
        SparseRow {
            indices: &self.indices[span.clone()],
            values: &self.values[span],
        }
    }
}

/// A borrowed view of one document's non-zero features.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    /// Column ids, strictly increasing.
    pub indices: &'a [u32],
    /// Values parallel to `indices`.
    pub values: &'a [f32],
}

impl SparseRow<'_> {
    /// True when the document has no features.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of non-zero features.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Euclidean distance between this row and a dense vector.
    ///
    /// If dimensions mismatch, returns `f32::INFINITY` so the row is never
    /// selected as a nearest neighbor.
    pub fn l2_distance_dense(&self, dense: &[f32]) -> f32 {
        if self.indices.last().is_some_and(|&j| j as usize >= dense.len()) {
            return f32::INFINITY;
        }
        let mut sum = 0.0_f32;
        let mut k = 0;
        for (j, &c) in dense.iter().enumerate() {
            let x = if k < self.indices.len() && self.indices[k] as usize == j {
                let v = self.values[k];
                k += 1;
                v
            } else {
                0.0
            };
            let d = x - c;
            sum += d * d;
        }
        sum.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_builds_csr() {
        let m = SparseMatrix::from_rows(
            vec![vec![(0, 1.0), (3, 2.0)], vec![], vec![(2, 1.0)]],
            4,
        )
        .unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 4);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).indices, &[0, 3]);
        assert!(m.row(1).is_empty());
        assert_eq!(m.row(2).values, &[1.0]);
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        assert!(matches!(
            SparseMatrix::from_rows(vec![], 4),
            Err(MineError::EmptyMatrix { .. })
        ));
        assert!(matches!(
            SparseMatrix::from_rows(vec![vec![(4, 1.0)]], 4),
            Err(MineError::MalformedRow { row: 0, .. })
        ));
        assert!(matches!(
            SparseMatrix::from_rows(vec![vec![(2, 1.0), (1, 1.0)]], 4),
            Err(MineError::MalformedRow { .. })
        ));
        assert!(matches!(
            SparseMatrix::from_rows(vec![vec![(1, -1.0)]], 4),
            Err(MineError::MalformedRow { .. })
        ));
    }

    #[test]
    fn from_dense_drops_zeros() {
        let m = SparseMatrix::from_dense(&[vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 1.0]]).unwrap();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).indices, &[1]);
        assert_eq!(m.row(1).indices, &[0, 2]);
    }

    #[test]
    fn l2_distance_matches_dense_computation() {
        let m = SparseMatrix::from_dense(&[vec![1.0, 0.0, 2.0]]).unwrap();
        let d = m.row(0).l2_distance_dense(&[0.0, 0.0, 0.0]);
        assert!((d - 5.0_f32.sqrt()).abs() < 1e-6);

        let same = m.row(0).l2_distance_dense(&[1.0, 0.0, 2.0]);
        assert!(same.abs() < 1e-6);
    }

    #[test]
    fn l2_distance_dimension_mismatch_is_infinite() {
        let m = SparseMatrix::from_dense(&[vec![0.0, 0.0, 1.0]]).unwrap();
        assert_eq!(m.row(0).l2_distance_dense(&[0.0, 0.0]), f32::INFINITY);
    }
}
