//! High-level API for string kernel computation
//!
//! [`SumStringKernel`] wraps a [`KernelConfig`] behind a builder and exposes
//! the sum kernel as a fit/transform estimator.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rssk::api::SumStringKernel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kernel = SumStringKernel::new()
//!     .with_lengths(1, 3)
//!     .with_lambda(0.5)
//!     .with_workers(4);
//!
//! let loops = ["CARDYW", "CAKDYW", "CTRGGYW"];
//! let gram = kernel.fit_transform(&loops, None)?;
//! println!("K[0,1] = {:.4}", gram.get(0, 1));
//!
//! let fitted = kernel.fit(&loops)?;
//! let test = fitted.transform(&["CARDYF"])?;
//! println!("{} x {}", test.rows(), test.cols());
//! # Ok(())
//! # }
//! ```

use crate::aggregate::sum_kernel;
use crate::core::{Engine, KernelConfig, MatchingMode, Result, SSKError};
use crate::data::SequenceSet;
use crate::kernel::SubstitutionModel;
use crate::matrix::KernelMatrix;
use std::path::Path;
use std::sync::Arc;

/// Sum of gap-weighted subsequence kernels with builder-style configuration
#[derive(Debug, Clone, Default)]
pub struct SumStringKernel {
    config: KernelConfig,
}

impl SumStringKernel {
    /// Kernel with lengths 1..=2, λ = 0.5, hard matching and normalization
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing configuration
    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    /// Sum over subsequence lengths `min_k..=max_k`
    pub fn with_lengths(mut self, min_k: usize, max_k: usize) -> Self {
        self.config.min_k = min_k;
        self.config.max_k = max_k;
        self
    }

    /// Set the gap decay factor
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.lambda = lambda;
        self
    }

    /// Compare characters by identity
    pub fn with_hard_matching(mut self) -> Self {
        self.config.matching = MatchingMode::Hard;
        self.config.substitution_model = None;
        self
    }

    /// Score character pairs with a substitution model
    pub fn with_soft_matching(mut self, model: SubstitutionModel) -> Self {
        self.config.matching = MatchingMode::Soft;
        self.config.substitution_model = Some(Arc::new(model));
        self
    }

    /// Normalize the summed kernel
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.config.normalize = normalize;
        self
    }

    /// Normalize each per-length kernel before summing
    pub fn with_normalize_before(mut self, normalize_before: bool) -> Self {
        self.config.normalize_before = normalize_before;
        self
    }

    /// Number of worker threads; 1 is sequential, 0 uses every core
    pub fn with_workers(mut self, n_workers: usize) -> Self {
        self.config.n_workers = n_workers;
        self
    }

    /// Select the pair kernel implementation
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.config.engine = engine;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Remember a training set for later [`FittedKernel::transform`] calls
    pub fn fit<S: AsRef<str>>(&self, train: &[S]) -> Result<FittedKernel> {
        self.config.validate()?;
        if train.is_empty() {
            return Err(SSKError::EmptyInput);
        }
        Ok(FittedKernel {
            config: self.config.clone(),
            train: train.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    /// Kernel matrix of `set_a` against `set_b`, or against itself
    pub fn fit_transform<S>(&self, set_a: &[S], set_b: Option<&[S]>) -> Result<KernelMatrix>
    where
        S: AsRef<str> + Sync,
    {
        sum_kernel(set_a, set_b, &self.config)
    }

    /// Kernel value of a single pair
    ///
    /// Computed as the off-diagonal entry of the kernel of `[x, y]` with
    /// itself, so normalization uses the self-kernels of both strings.
    pub fn pairwise(&self, x: &str, y: &str) -> Result<f64> {
        let pair = [x, y];
        let matrix = sum_kernel(&pair, None, &self.config)?;
        Ok(matrix.get(0, 1))
    }

    /// Kernel matrix of a sequence file against itself or a second file
    pub fn transform_files<P: AsRef<Path>>(
        &self,
        input: P,
        against: Option<P>,
    ) -> Result<LabelledMatrix> {
        let rows = SequenceSet::from_file(input)?;
        match against {
            None => {
                let matrix = self.fit_transform(rows.sequences(), None)?;
                Ok(LabelledMatrix {
                    col_labels: rows.labels().to_vec(),
                    row_labels: rows.labels().to_vec(),
                    matrix,
                })
            }
            Some(path) => {
                let cols = SequenceSet::from_file(path)?;
                let matrix = self.fit_transform(rows.sequences(), Some(cols.sequences()))?;
                Ok(LabelledMatrix {
                    row_labels: rows.labels().to_vec(),
                    col_labels: cols.labels().to_vec(),
                    matrix,
                })
            }
        }
    }
}

/// Sum kernel bound to a training set
#[derive(Debug, Clone)]
pub struct FittedKernel {
    config: KernelConfig,
    train: Vec<String>,
}

impl FittedKernel {
    /// Kernel of `x` (rows) against the training set (columns)
    pub fn transform<S: AsRef<str>>(&self, x: &[S]) -> Result<KernelMatrix> {
        let rows: Vec<&str> = x.iter().map(AsRef::as_ref).collect();
        let cols: Vec<&str> = self.train.iter().map(String::as_str).collect();
        sum_kernel(&rows, Some(cols.as_slice()), &self.config)
    }

    /// Training sequences, in fit order
    pub fn training_set(&self) -> &[String] {
        &self.train
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

/// Kernel matrix with the labels of its rows and columns
#[derive(Debug, Clone)]
pub struct LabelledMatrix {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub matrix: KernelMatrix,
}

/// Convenience functions using the default configuration
pub mod quick {
    use super::*;

    /// Normalized sum kernel (k = 1..=2, λ = 0.5) of `x` with itself
    pub fn kernel_matrix<S: AsRef<str> + Sync>(x: &[S]) -> Result<KernelMatrix> {
        SumStringKernel::new().fit_transform(x, None)
    }

    /// Normalized sum kernel of a single pair over lengths `min_k..=max_k`
    pub fn similarity(x: &str, y: &str, min_k: usize, max_k: usize) -> Result<f64> {
        SumStringKernel::new()
            .with_lengths(min_k, max_k)
            .with_workers(1)
            .pairwise(x, y)
    }
}
