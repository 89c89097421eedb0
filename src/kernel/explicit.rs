//! Subsequence kernel evaluated through the explicit feature map
//!
//! K(x, y) = Σ_u φ_u(x) · φ_u(y) over subsequences u of length k. This gives
//! the same values as [`SubsequenceKernel`](crate::kernel::SubsequenceKernel)
//! under hard matching, at exponential cost. It serves as an independent
//! engine for validating kernel matrices on short sequences.

use crate::core::{KernelParams, MatchingMode, Result, SSKError};
use crate::feature_map::FeatureMapper;
use crate::kernel::PairKernel;

/// Hard-matching subsequence kernel computed by explicit enumeration
#[derive(Debug, Clone)]
pub struct ExplicitKernel {
    k: usize,
    mapper: FeatureMapper,
}

impl ExplicitKernel {
    /// Create an explicit kernel for subsequence length `k`
    ///
    /// # Panics
    /// Panics if `k` is zero
    pub fn new(k: usize, lambda: f64) -> Self {
        assert!(k > 0, "Subsequence length must be positive, got: {}", k);
        Self {
            k,
            mapper: FeatureMapper::single_length(k, lambda),
        }
    }

    /// Build the kernel described by `params`
    pub fn from_params(params: &KernelParams) -> Result<Self> {
        if params.matching == MatchingMode::Soft {
            return Err(SSKError::InvalidParameter(
                "The explicit engine only supports hard matching".to_string(),
            ));
        }
        if params.k == 0 {
            return Err(SSKError::InvalidParameter(
                "Subsequence length must be at least 1".to_string(),
            ));
        }
        Ok(Self::new(params.k, params.lambda))
    }
}

impl PairKernel for ExplicitKernel {
    fn compute(&self, x: &str, y: &str) -> f64 {
        if x.chars().count() < self.k || y.chars().count() < self.k {
            return if x == y { 1.0 } else { 0.0 };
        }

        let fx = self.mapper.features(x);
        let fy = self.mapper.features(y);
        let (small, large) = if fx.len() <= fy.len() {
            (&fx, &fy)
        } else {
            (&fy, &fx)
        };

        small
            .iter()
            .filter_map(|(u, &wx)| large.get(u).map(|&wy| wx * wy))
            .sum()
    }

    fn subsequence_length(&self) -> usize {
        self.k
    }
}
