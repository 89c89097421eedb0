//! Gap-weighted subsequence kernel
//!
//! The kernel of length k between strings x and y sums, over every pair of
//! occurrences of a common subsequence u with |u| = k, the weight
//! λ^(span in x) · λ^(span in y), where the span is the distance from the
//! first to the last matched character plus one.
//!
//! The value is computed with the classical O(k·|x|·|y|) recurrence. Kd holds,
//! for every pair of prefixes (x[..i], y[..j]), the auxiliary kernel K'_d of
//! depth d, i.e. subsequences of length d weighted as if they extended to the
//! end of both prefixes. Only two depths are alive at any time, so Kd is
//! stored as two flat (|x|+1)·(|y|+1) generations that swap roles.

use crate::core::{KernelParams, MatchingMode, Result, SSKError};
use crate::kernel::{PairKernel, SubstitutionModel};
use std::sync::Arc;

/// Scratch buffers for the subsequence recurrence
///
/// A workspace may be reused for any number of pairs of any size; buffers
/// only grow. It must not be shared between concurrent computations.
#[derive(Debug, Default)]
pub struct DpWorkspace {
    even: Vec<f64>,
    odd: Vec<f64>,
}

impl DpWorkspace {
    /// Create an empty workspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workspace sized for strings up to the given lengths
    pub fn with_capacity(max_x: usize, max_y: usize) -> Self {
        let cells = (max_x + 1) * (max_y + 1);
        Self {
            even: Vec::with_capacity(cells),
            odd: Vec::with_capacity(cells),
        }
    }

    /// Number of cells each generation can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.even.capacity().min(self.odd.capacity())
    }

    // Depth 0 is K'_0 = 1 for every prefix pair.
    fn reset(&mut self, cells: usize) {
        self.even.clear();
        self.even.resize(cells, 1.0);
        self.odd.clear();
        self.odd.resize(cells, 0.0);
    }

    /// (previous, current) generations for recursion depth `depth`
    fn generations(&mut self, depth: usize) -> (&[f64], &mut [f64]) {
        if depth % 2 == 1 {
            (self.even.as_slice(), self.odd.as_mut_slice())
        } else {
            (self.odd.as_slice(), self.even.as_mut_slice())
        }
    }

    fn generation(&self, depth: usize) -> &[f64] {
        if depth % 2 == 1 {
            self.odd.as_slice()
        } else {
            self.even.as_slice()
        }
    }
}

/// Gap-weighted subsequence string kernel for one subsequence length
#[derive(Debug, Clone)]
pub struct SubsequenceKernel {
    k: usize,
    lambda: f64,
    substitution: Option<Arc<SubstitutionModel>>,
}

impl SubsequenceKernel {
    /// Create a hard-matching kernel
    ///
    /// # Panics
    /// Panics if `k` is zero
    pub fn new(k: usize, lambda: f64) -> Self {
        assert!(k > 0, "Subsequence length must be positive, got: {}", k);
        Self {
            k,
            lambda,
            substitution: None,
        }
    }

    /// Create a soft-matching kernel scoring character pairs with `model`
    ///
    /// # Panics
    /// Panics if `k` is zero
    pub fn soft(k: usize, lambda: f64, model: Arc<SubstitutionModel>) -> Self {
        assert!(k > 0, "Subsequence length must be positive, got: {}", k);
        Self {
            k,
            lambda,
            substitution: Some(model),
        }
    }

    /// Build the kernel described by `params`
    pub fn from_params(params: &KernelParams) -> Result<Self> {
        if params.k == 0 {
            return Err(SSKError::InvalidParameter(
                "Subsequence length must be at least 1".to_string(),
            ));
        }
        match params.matching {
            MatchingMode::Hard => Ok(Self::new(params.k, params.lambda)),
            MatchingMode::Soft => {
                let model = params.substitution_model.clone().ok_or_else(|| {
                    SSKError::InvalidParameter(
                        "Soft matching requires a substitution model".to_string(),
                    )
                })?;
                Ok(Self::soft(params.k, params.lambda, model))
            }
        }
    }

    /// Get the decay factor
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Whether the kernel uses soft matching
    pub fn is_soft(&self) -> bool {
        self.substitution.is_some()
    }

    /// Kernel value for byte strings using the given workspace
    ///
    /// Every byte is one symbol. [`PairKernel::compute_with`] switches to
    /// char symbols when either string is not ASCII.
    pub fn evaluate(&self, x: &[u8], y: &[u8], workspace: &mut DpWorkspace) -> f64 {
        match &self.substitution {
            None => self.recurrence(x, y, workspace, |a, b| if a == b { 1.0 } else { 0.0 }),
            Some(model) => self.recurrence(x, y, workspace, |a, b| model.score(a, b)),
        }
    }

    /// Kernel value with one symbol per char
    fn evaluate_chars(&self, x: &str, y: &str, workspace: &mut DpWorkspace) -> f64 {
        let x: Vec<char> = x.chars().collect();
        let y: Vec<char> = y.chars().collect();
        match &self.substitution {
            None => self.recurrence(&x, &y, workspace, |a, b| if a == b { 1.0 } else { 0.0 }),
            Some(model) => self.recurrence(&x, &y, workspace, |a, b| {
                match (u8::try_from(a), u8::try_from(b)) {
                    (Ok(a), Ok(b)) => model.score(a, b),
                    _ => 0.0,
                }
            }),
        }
    }

    /// The recurrence itself matches symbols by identity; `score` weighs the
    /// final pair of every common subsequence.
    fn recurrence<T, F>(&self, x: &[T], y: &[T], workspace: &mut DpWorkspace, score: F) -> f64
    where
        T: Copy + PartialEq,
        F: Fn(T, T) -> f64,
    {
        let k = self.k;
        let lambda = self.lambda;
        let (n, m) = (x.len(), y.len());

        // Strings shorter than k carry no subsequence of length k; they are
        // compared by identity instead.
        if n < k || m < k {
            return if x == y { 1.0 } else { 0.0 };
        }

        let cols = m + 1;
        workspace.reset((n + 1) * cols);

        for depth in 1..k {
            let (prev, cur) = workspace.generations(depth);

            // Prefixes of length depth-1 cannot hold a subsequence of length depth.
            for row in depth - 1..n {
                cur[row * cols + depth - 1] = 0.0;
            }
            for col in depth - 1..m {
                cur[(depth - 1) * cols + col] = 0.0;
            }

            for row in depth..n {
                let mut kdd = 0.0;
                for col in depth..m {
                    if x[row - 1] == y[col - 1] {
                        kdd = lambda * (kdd + lambda * prev[(row - 1) * cols + col - 1]);
                    } else {
                        kdd = lambda * kdd;
                    }
                    cur[row * cols + col] = lambda * cur[(row - 1) * cols + col] + kdd;
                }
            }
        }

        let last = workspace.generation(k - 1);
        let lambda_sq = lambda * lambda;
        let mut sum = 0.0;

        for i in k - 1..n {
            for j in k - 1..m {
                let s = score(x[i], y[j]);
                if s != 0.0 {
                    sum += lambda_sq * s * last[i * cols + j];
                }
            }
        }

        sum
    }
}

impl PairKernel for SubsequenceKernel {
    fn compute(&self, x: &str, y: &str) -> f64 {
        let mut workspace = DpWorkspace::new();
        self.compute_with(x, y, &mut workspace)
    }

    fn compute_with(&self, x: &str, y: &str, workspace: &mut DpWorkspace) -> f64 {
        if x.is_ascii() && y.is_ascii() {
            self.evaluate(x.as_bytes(), y.as_bytes(), workspace)
        } else {
            self.evaluate_chars(x, y, workspace)
        }
    }

    fn subsequence_length(&self) -> usize {
        self.k
    }
}
