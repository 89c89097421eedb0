//! Core type definitions for string kernels

use crate::core::{Result, SSKError};
use crate::kernel::SubstitutionModel;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How two aligned characters contribute to the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingMode {
    /// Only identical characters contribute
    #[default]
    Hard,
    /// Every character pair contributes its substitution score
    Soft,
}

/// Pair kernel implementation used to fill kernel matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// O(k·|x|·|y|) dynamic programming recurrence
    #[default]
    Recursive,
    /// Explicit subsequence enumeration (slow, hard matching only)
    Explicit,
}

/// Parameters of a single-length subsequence kernel
#[derive(Debug, Clone)]
pub struct KernelParams {
    /// Subsequence length (k >= 1)
    pub k: usize,
    /// Gap decay factor, expected in (0, 1]
    pub lambda: f64,
    /// Hard or soft character matching
    pub matching: MatchingMode,
    /// Substitution scores, required for soft matching
    pub substitution_model: Option<Arc<SubstitutionModel>>,
    /// Divide by sqrt(K(x,x)·K(y,y))
    pub normalize: bool,
    /// Pair kernel implementation
    pub engine: Engine,
}

impl KernelParams {
    /// Hard-matching parameters for subsequence length `k`
    pub fn new(k: usize, lambda: f64) -> Self {
        Self {
            k,
            lambda,
            matching: MatchingMode::Hard,
            substitution_model: None,
            normalize: true,
            engine: Engine::Recursive,
        }
    }

    /// Set the normalization flag
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Switch to soft matching with the given substitution model
    pub fn with_soft_matching(mut self, model: Arc<SubstitutionModel>) -> Self {
        self.matching = MatchingMode::Soft;
        self.substitution_model = Some(model);
        self
    }

    /// Select the pair kernel implementation
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Reject parameter combinations that cannot be computed
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(SSKError::InvalidParameter(
                "Subsequence length must be at least 1".to_string(),
            ));
        }
        validate_matching(self.matching, self.substitution_model.as_deref(), self.engine)?;
        check_lambda(self.lambda);
        Ok(())
    }
}

/// Configuration of a sum kernel over a range of subsequence lengths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Smallest subsequence length (inclusive)
    pub min_k: usize,
    /// Largest subsequence length (inclusive)
    pub max_k: usize,
    /// Gap decay factor, expected in (0, 1]
    pub lambda: f64,
    /// Hard or soft character matching
    pub matching: MatchingMode,
    /// Substitution scores, required for soft matching
    pub substitution_model: Option<Arc<SubstitutionModel>>,
    /// Normalize once after summing the per-length kernels
    pub normalize: bool,
    /// Normalize every per-length kernel before summing
    pub normalize_before: bool,
    /// Worker threads: 1 runs sequentially, 0 uses all available cores
    pub n_workers: usize,
    /// Pair kernel implementation
    pub engine: Engine,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            min_k: 1,
            max_k: 2,
            lambda: 0.5,
            matching: MatchingMode::Hard,
            substitution_model: None,
            normalize: true,
            normalize_before: false,
            n_workers: 0,
            engine: Engine::Recursive,
        }
    }
}

impl KernelConfig {
    /// Reject configurations that cannot be computed
    pub fn validate(&self) -> Result<()> {
        if self.min_k == 0 {
            return Err(SSKError::InvalidParameter(
                "Subsequence length must be at least 1".to_string(),
            ));
        }
        if self.min_k > self.max_k {
            return Err(SSKError::InvalidParameter(format!(
                "min_k ({}) must not exceed max_k ({})",
                self.min_k, self.max_k
            )));
        }
        validate_matching(self.matching, self.substitution_model.as_deref(), self.engine)?;
        check_lambda(self.lambda);
        Ok(())
    }

    /// Per-length parameters; the sub-kernel normalizes iff `normalize_before`
    pub fn params_for(&self, k: usize) -> KernelParams {
        KernelParams {
            k,
            lambda: self.lambda,
            matching: self.matching,
            substitution_model: self.substitution_model.clone(),
            normalize: self.normalize_before,
            engine: self.engine,
        }
    }

    /// Number of subsequence lengths summed by this configuration
    pub fn n_lengths(&self) -> usize {
        (self.max_k + 1).saturating_sub(self.min_k)
    }
}

fn validate_matching(
    matching: MatchingMode,
    model: Option<&SubstitutionModel>,
    engine: Engine,
) -> Result<()> {
    if matching == MatchingMode::Soft {
        if model.is_none() {
            return Err(SSKError::InvalidParameter(
                "Soft matching requires a substitution model".to_string(),
            ));
        }
        if engine == Engine::Explicit {
            return Err(SSKError::InvalidParameter(
                "The explicit engine only supports hard matching".to_string(),
            ));
        }
    }
    Ok(())
}

// Values outside (0, 1] are computable, so they are only reported.
fn check_lambda(lambda: f64) {
    if !(lambda > 0.0 && lambda <= 1.0) {
        warn!("Decay factor lambda={lambda} is outside (0, 1]");
    }
}

/// Sparse vector representation with sorted indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, ensuring indices are sorted
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Create an empty sparse vector
    pub fn empty() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Get the value at a specific index (0 if not present)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Inner product with another sparse vector
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut result = 0.0;
        let mut i = 0;
        let mut j = 0;

        while i < self.indices.len() && j < other.indices.len() {
            let a = self.indices[i];
            let b = other.indices[j];

            if a == b {
                result += self.values[i] * other.values[j];
                i += 1;
                j += 1;
            } else if a < b {
                i += 1;
            } else {
                j += 1;
            }
        }

        result
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// Compute L2 norm
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Copy scaled to unit L2 norm; a zero vector stays zero
    pub fn unit(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        Self {
            indices: self.indices.clone(),
            values: self.values.iter().map(|v| v / norm).collect(),
        }
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
