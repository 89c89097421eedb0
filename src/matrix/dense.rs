//! Dense kernel matrix

use crate::core::{Result, SSKError};
use std::ops::Index;

/// Row-major dense matrix of kernel values
///
/// Rows correspond to the first sequence set and columns to the second.
/// A self-comparison yields a square, symmetric matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl KernelMatrix {
    /// Create a matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from row-major data
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(SSKError::DimensionMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from nested rows, which must all have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(SSKError::DimensionMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Value at (i, j)
    ///
    /// # Panics
    /// Panics if the index is out of bounds
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "Index ({i}, {j}) out of bounds");
        self.data[i * self.cols + j]
    }

    /// Set the value at (i, j)
    ///
    /// # Panics
    /// Panics if the index is out of bounds
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "Index ({i}, {j}) out of bounds");
        self.data[i * self.cols + j] = value;
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row-major values
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the matrix, returning its row-major values
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Nested-row copy of the matrix
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    /// Main diagonal (length min(rows, cols))
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// Elementwise `self += other`
    pub fn add_assign(&mut self, other: &KernelMatrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(SSKError::DimensionMismatch {
                expected: self.data.len(),
                actual: other.data.len(),
            });
        }
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(())
    }

    /// Largest absolute elementwise difference, infinite on shape mismatch
    pub fn max_abs_diff(&self, other: &KernelMatrix) -> f64 {
        if self.shape() != other.shape() {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Whether the matrix is square and `|K[i,j] - K[j,i]| <= tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.is_square()
            && (0..self.rows).all(|i| {
                (i + 1..self.cols).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
            })
    }

    /// Whether every value is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Divide every entry by sqrt(row_norms[i] · col_norms[j])
    ///
    /// Zero norms yield non-finite entries; they are not masked.
    pub fn normalize_cross(&mut self, row_norms: &[f64], col_norms: &[f64]) -> Result<()> {
        self.check_norms(row_norms.len(), col_norms.len())?;
        for (i, &ni) in row_norms.iter().enumerate() {
            let row = &mut self.data[i * self.cols..(i + 1) * self.cols];
            for (value, &nj) in row.iter_mut().zip(col_norms) {
                *value /= (ni * nj).sqrt();
            }
        }
        Ok(())
    }

    /// Normalize a self-comparison matrix
    ///
    /// Only the upper triangle is divided; it is mirrored into the lower
    /// triangle and the diagonal is set to 1.
    pub fn normalize_symmetric(&mut self, norms: &[f64]) -> Result<()> {
        if !self.is_square() {
            return Err(SSKError::DimensionMismatch {
                expected: self.rows,
                actual: self.cols,
            });
        }
        self.check_norms(norms.len(), norms.len())?;
        let n = self.rows;
        for i in 0..n {
            self.data[i * n + i] = 1.0;
            for j in i + 1..n {
                let value = self.data[i * n + j] / (norms[i] * norms[j]).sqrt();
                self.data[i * n + j] = value;
                self.data[j * n + i] = value;
            }
        }
        Ok(())
    }

    fn check_norms(&self, rows: usize, cols: usize) -> Result<()> {
        if rows != self.rows {
            return Err(SSKError::DimensionMismatch {
                expected: self.rows,
                actual: rows,
            });
        }
        if cols != self.cols {
            return Err(SSKError::DimensionMismatch {
                expected: self.cols,
                actual: cols,
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for KernelMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(i < self.rows && j < self.cols, "Index ({i}, {j}) out of bounds");
        &self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let m = KernelMatrix::zeros(2, 3);
        assert_eq!(m.shape(), (2, 3));
        assert!(!m.is_square());
        assert_eq!(m.as_slice(), &[0.0; 6]);

        let m = KernelMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.get(1, 0), 3.0);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.diagonal(), vec![1.0, 4.0]);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        assert!(KernelMatrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(KernelMatrix::from_vec(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds() {
        KernelMatrix::zeros(2, 2).get(2, 0);
    }

    #[test]
    fn test_add_assign() {
        let mut a = KernelMatrix::from_vec(1, 2, vec![1.0, 2.0]).unwrap();
        let b = KernelMatrix::from_vec(1, 2, vec![0.5, 0.25]).unwrap();
        a.add_assign(&b).unwrap();
        assert_eq!(a.as_slice(), &[1.5, 2.25]);

        let c = KernelMatrix::zeros(2, 1);
        assert!(matches!(
            a.add_assign(&c),
            Err(SSKError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_normalize_symmetric() {
        let mut m =
            KernelMatrix::from_rows(vec![vec![4.0, 2.0], vec![2.0, 9.0]]).unwrap();
        m.normalize_symmetric(&[4.0, 9.0]).unwrap();
        assert_eq!(m.diagonal(), vec![1.0, 1.0]);
        assert_eq!(m.get(0, 1), 2.0 / 6.0);
        assert_eq!(m.get(1, 0), 2.0 / 6.0);
        assert!(m.is_symmetric(0.0));
    }

    #[test]
    fn test_normalize_cross() {
        let mut m = KernelMatrix::from_rows(vec![vec![2.0, 3.0]]).unwrap();
        m.normalize_cross(&[4.0], &[1.0, 9.0]).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 0.5]);

        assert!(m.normalize_cross(&[1.0, 1.0], &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_zero_norm_is_not_masked() {
        let mut m =
            KernelMatrix::from_rows(vec![vec![0.0, 0.0], vec![0.0, 1.0]]).unwrap();
        m.normalize_symmetric(&[0.0, 1.0]).unwrap();
        assert!(m.get(0, 1).is_nan());
        assert!(!m.is_finite());

        let mut c = KernelMatrix::from_rows(vec![vec![1.0]]).unwrap();
        c.normalize_cross(&[0.0], &[1.0]).unwrap();
        assert!(c.get(0, 0).is_infinite());
    }

    #[test]
    fn test_max_abs_diff() {
        let a = KernelMatrix::from_vec(1, 2, vec![1.0, 2.0]).unwrap();
        let b = KernelMatrix::from_vec(1, 2, vec![1.5, 1.0]).unwrap();
        assert_eq!(a.max_abs_diff(&b), 1.0);
        assert_eq!(a.max_abs_diff(&KernelMatrix::zeros(2, 1)), f64::INFINITY);
    }
}
