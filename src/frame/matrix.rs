//! Dense numeric matrix used as transformer output and model input.

use crate::error::{PipelineError, Result};

/// Row-major dense `f64` matrix.
///
/// This is the shape every fitted transformer produces and every model
/// consumes. It is an in-memory exchange format only and is never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a matrix from row-major data.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "matrix data length mismatch");
        Self { data, rows, cols }
    }

    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// `(rows, cols)` of this matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Raw row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Horizontally concatenate blocks that share a row count.
    pub fn hcat(blocks: &[Matrix]) -> Result<Matrix> {
        if blocks.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot concatenate zero matrix blocks".to_string(),
            ));
        }
        let rows = blocks[0].rows;
        for block in blocks {
            if block.rows != rows {
                return Err(PipelineError::SchemaMismatch {
                    expected: format!("{} rows", rows),
                    got: format!("{} rows", block.rows),
                });
            }
        }
        let cols: usize = blocks.iter().map(|b| b.cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for block in blocks {
                data.extend_from_slice(block.row(row));
            }
        }
        Ok(Matrix::new(data, rows, cols))
    }

    /// Append a column on the right (used to attach the target vector).
    pub fn append_column(&self, column: &[f64]) -> Result<Matrix> {
        if column.len() != self.rows {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("{} rows", self.rows),
                got: format!("{} values", column.len()),
            });
        }
        let mut data = Vec::with_capacity(self.rows * (self.cols + 1));
        for row in 0..self.rows {
            data.extend_from_slice(self.row(row));
            data.push(column[row]);
        }
        Ok(Matrix::new(data, self.rows, self.cols + 1))
    }

    /// Copy of the rows in `[start, end)`, used for mini-batch iteration.
    pub fn slice_rows(&self, start: usize, end: usize) -> Matrix {
        assert!(start <= end && end <= self.rows, "row range out of bounds");
        Matrix::new(
            self.data[start * self.cols..end * self.cols].to_vec(),
            end - start,
            self.cols,
        )
    }

    /// Split off the last column, returning `(features, target)`.
    pub fn split_last_column(&self) -> Result<(Matrix, Vec<f64>)> {
        if self.cols == 0 {
            return Err(PipelineError::EmptyData(
                "cannot split target off a zero-column matrix".to_string(),
            ));
        }
        let feature_cols = self.cols - 1;
        let mut features = Vec::with_capacity(self.rows * feature_cols);
        let mut target = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let r = self.row(row);
            features.extend_from_slice(&r[..feature_cols]);
            target.push(r[feature_cols]);
        }
        Ok((Matrix::new(features, self.rows, feature_cols), target))
    }
}
