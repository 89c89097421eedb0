//! Explicit feature map of the gap-weighted subsequence kernel
//!
//! Every subsequence u of a string s, occurring at positions i_1 < ... < i_n,
//! contributes λ^(i_n - i_1 + 1) to the feature φ_u(s). The kernel of
//! length k is then the inner product of the length-k features, so the
//! Gram matrix of this map reproduces the dynamic-programming kernel. The
//! enumeration is exponential in the string length and is meant for
//! cross-checking on short strings.

use crate::core::{Result, SSKError, SparseVector};
use crate::matrix::KernelMatrix;
use indexmap::IndexMap;

/// Enumerates weighted subsequences of a string
#[derive(Debug, Clone)]
pub struct FeatureMapper {
    min_k: usize,
    max_k: usize,
    lambda: f64,
    max_gap: Option<usize>,
}

impl FeatureMapper {
    /// Subsequences with length in `[min_k, max_k]`, unbounded gaps
    ///
    /// # Errors
    /// Returns an error if `min_k` is zero or exceeds `max_k`
    pub fn new(min_k: usize, max_k: usize, lambda: f64) -> Result<Self> {
        if min_k == 0 || min_k > max_k {
            return Err(SSKError::InvalidParameter(format!(
                "Invalid subsequence length range [{min_k}, {max_k}]"
            )));
        }
        Ok(Self {
            min_k,
            max_k,
            lambda,
            max_gap: None,
        })
    }

    // Callers guarantee k >= 1.
    pub(crate) fn single_length(k: usize, lambda: f64) -> Self {
        Self {
            min_k: k,
            max_k: k,
            lambda,
            max_gap: None,
        }
    }

    /// Limit the number of characters skipped between two picked characters
    pub fn with_max_gap(mut self, max_gap: Option<usize>) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Weighted subsequence counts of `s`, in first-seen order
    pub fn features(&self, s: &str) -> IndexMap<String, f64> {
        let symbols: Vec<char> = s.chars().collect();
        let mut features = IndexMap::new();
        let mut prefix = String::new();

        for first in 0..symbols.len() {
            prefix.push(symbols[first]);
            self.extend(&symbols, first, first, 1, &mut prefix, &mut features);
            prefix.pop();
        }

        features
    }

    fn extend(
        &self,
        symbols: &[char],
        first: usize,
        last: usize,
        depth: usize,
        prefix: &mut String,
        features: &mut IndexMap<String, f64>,
    ) {
        if depth >= self.min_k {
            let weight = self.lambda.powi((last - first + 1) as i32);
            *features.entry(prefix.clone()).or_insert(0.0) += weight;
        }
        if depth == self.max_k {
            return;
        }

        let end = match self.max_gap {
            Some(gap) => last.saturating_add(gap).saturating_add(2).min(symbols.len()),
            None => symbols.len(),
        };
        for next in last + 1..end {
            prefix.push(symbols[next]);
            self.extend(symbols, first, next, depth + 1, prefix, features);
            prefix.pop();
        }
    }
}

/// Sparse matrix of explicit features, one row per input string
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<SparseVector>,
    n_features: usize,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Feature vector of input string `i`
    pub fn row(&self, i: usize) -> &SparseVector {
        &self.rows[i]
    }

    /// (row, column, value) entries, row by row
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.indices
                    .iter()
                    .zip(&row.values)
                    .map(move |(&j, &v)| (i, j, v))
            })
            .collect()
    }

    /// Copy with every row scaled to unit L2 norm
    pub fn normalized(&self) -> Self {
        Self {
            rows: self.rows.iter().map(SparseVector::unit).collect(),
            n_features: self.n_features,
        }
    }

    /// Inner products between all pairs of rows
    pub fn gram(&self) -> KernelMatrix {
        let n = self.rows.len();
        let mut gram = KernelMatrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let value = self.rows[i].dot(&self.rows[j]);
                gram.set(i, j, value);
                gram.set(j, i, value);
            }
        }
        gram
    }
}

/// Explicit feature matrix and feature dictionary of `strings`
///
/// Columns are assigned to subsequences in first-seen order across the
/// input. `max_gap` bounds the characters skipped between consecutive
/// picked characters; `None` leaves gaps unbounded.
pub fn explicit_features<S: AsRef<str>>(
    strings: &[S],
    min_k: usize,
    max_k: usize,
    lambda: f64,
    max_gap: Option<usize>,
) -> Result<(FeatureMatrix, IndexMap<String, usize>)> {
    let mapper = FeatureMapper::new(min_k, max_k, lambda)?.with_max_gap(max_gap);
    let mut dictionary: IndexMap<String, usize> = IndexMap::new();
    let mut rows = Vec::with_capacity(strings.len());

    for s in strings {
        let features = mapper.features(s.as_ref());
        let mut indices = Vec::with_capacity(features.len());
        let mut values = Vec::with_capacity(features.len());

        for (subsequence, weight) in features {
            let next = dictionary.len();
            let column = *dictionary.entry(subsequence).or_insert(next);
            indices.push(column);
            values.push(weight);
        }
        rows.push(SparseVector::new(indices, values));
    }

    let n_features = dictionary.len();
    Ok((FeatureMatrix { rows, n_features }, dictionary))
}
