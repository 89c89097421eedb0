//! Kernel matrix assembly for one subsequence length
//!
//! A self-comparison only evaluates the upper triangle and reuses the
//! diagonal self-kernels as norms. A cross-comparison evaluates every pair
//! and, when norms are needed, the self-kernels of both sets.

use crate::core::alphabet::validate_sequences;
use crate::core::{KernelParams, MatchingMode, Result, SSKError};
use crate::kernel::{engine_for, DpWorkspace, PairKernel};
use crate::matrix::KernelMatrix;
use log::debug;

/// Self-kernel values of the row set and the column set
#[derive(Debug, Clone, PartialEq)]
pub struct Norms {
    pub rows: Vec<f64>,
    pub cols: Vec<f64>,
}

impl Norms {
    /// All-ones norms, as left behind by normalization
    pub fn ones(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![1.0; rows],
            cols: vec![1.0; cols],
        }
    }

    /// Elementwise `self += other`
    pub fn add_assign(&mut self, other: &Norms) -> Result<()> {
        for (mine, theirs) in [(&mut self.rows, &other.rows), (&mut self.cols, &other.cols)] {
            if mine.len() != theirs.len() {
                return Err(SSKError::DimensionMismatch {
                    expected: mine.len(),
                    actual: theirs.len(),
                });
            }
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        Ok(())
    }
}

/// Kernel matrix of one subsequence length, with optional norms
#[derive(Debug, Clone)]
pub struct KernelBlock {
    pub matrix: KernelMatrix,
    pub norms: Option<Norms>,
}

impl KernelBlock {
    /// Elementwise sum of matrices and norms
    pub fn accumulate(&mut self, other: &KernelBlock) -> Result<()> {
        self.matrix.add_assign(&other.matrix)?;
        match (&mut self.norms, &other.norms) {
            (Some(mine), Some(theirs)) => mine.add_assign(theirs),
            (None, None) => Ok(()),
            _ => Err(SSKError::InvalidParameter(
                "Cannot sum kernel blocks with and without norms".to_string(),
            )),
        }
    }
}

/// The two sequence sets of a kernel computation
///
/// Whether the sets are the same is decided once, up front: an absent second
/// set or one equal by value to the first selects the symmetric path.
#[derive(Debug, Clone, Copy)]
pub enum Operands<'a, S> {
    Same(&'a [S]),
    Cross(&'a [S], &'a [S]),
}

impl<'a, S: AsRef<str>> Operands<'a, S> {
    pub fn new(x: &'a [S], y: Option<&'a [S]>) -> Self {
        match y {
            None => Operands::Same(x),
            Some(y) if same_sequences(x, y) => Operands::Same(x),
            Some(y) => Operands::Cross(x, y),
        }
    }

    pub fn is_same(&self) -> bool {
        matches!(self, Operands::Same(_))
    }

    /// (rows, cols) of the resulting kernel matrix
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Operands::Same(x) => (x.len(), x.len()),
            Operands::Cross(x, y) => (x.len(), y.len()),
        }
    }

    /// Reject empty sets and, under soft matching, out-of-alphabet symbols
    pub fn check(&self, matching: MatchingMode) -> Result<()> {
        let (rows, cols) = self.shape();
        if rows == 0 || cols == 0 {
            return Err(SSKError::EmptyInput);
        }
        if matching == MatchingMode::Soft {
            match self {
                Operands::Same(x) => validate_sequences(x)?,
                Operands::Cross(x, y) => {
                    validate_sequences(x)?;
                    validate_sequences(y)?;
                }
            }
        }
        Ok(())
    }

    /// Compute the block without re-validating parameters or input
    pub(crate) fn compute(&self, params: &KernelParams, with_norms: bool) -> Result<KernelBlock> {
        let kernel = engine_for(params)?;
        match self {
            Operands::Same(x) => symmetric_block(kernel.as_ref(), x, params.normalize),
            Operands::Cross(x, y) => {
                asymmetric_block(kernel.as_ref(), x, y, params.normalize, with_norms)
            }
        }
    }
}

fn same_sequences<S: AsRef<str>>(x: &[S], y: &[S]) -> bool {
    std::ptr::eq(x, y)
        || (x.len() == y.len() && x.iter().zip(y).all(|(a, b)| a.as_ref() == b.as_ref()))
}

/// Kernel matrix of `x` against `y` (or against itself when `y` is `None`)
///
/// Norms are always returned for a self-comparison; for a cross-comparison
/// only when `with_norms` is set or the kernel is normalized.
pub fn build_matrix<S: AsRef<str>>(
    x: &[S],
    y: Option<&[S]>,
    params: &KernelParams,
    with_norms: bool,
) -> Result<KernelBlock> {
    params.validate()?;
    let operands = Operands::new(x, y);
    operands.check(params.matching)?;
    operands.compute(params, with_norms)
}

/// Kernel matrix of `x` against itself via the symmetric path
pub fn build_symmetric<S: AsRef<str>>(x: &[S], params: &KernelParams) -> Result<KernelBlock> {
    params.validate()?;
    let operands = Operands::Same(x);
    operands.check(params.matching)?;
    operands.compute(params, true)
}

/// Kernel matrix of `x` against `y` via the asymmetric path, even if equal
pub fn build_asymmetric<S: AsRef<str>>(
    x: &[S],
    y: &[S],
    params: &KernelParams,
    with_norms: bool,
) -> Result<KernelBlock> {
    params.validate()?;
    let operands = Operands::Cross(x, y);
    operands.check(params.matching)?;
    operands.compute(params, with_norms)
}

fn symmetric_block<S: AsRef<str>>(
    kernel: &dyn PairKernel,
    x: &[S],
    normalize: bool,
) -> Result<KernelBlock> {
    let n = x.len();
    debug!(
        "Symmetric kernel: {} sequences, k={}, {} pair evaluations",
        n,
        kernel.subsequence_length(),
        n * (n + 1) / 2
    );

    let mut workspace = DpWorkspace::new();
    let mut matrix = KernelMatrix::zeros(n, n);

    let norms: Vec<f64> = x
        .iter()
        .map(|s| kernel.compute_with(s.as_ref(), s.as_ref(), &mut workspace))
        .collect();

    for i in 0..n {
        matrix.set(i, i, norms[i]);
        for j in i + 1..n {
            let value = kernel.compute_with(x[i].as_ref(), x[j].as_ref(), &mut workspace);
            matrix.set(i, j, value);
            matrix.set(j, i, value);
        }
    }

    if normalize {
        matrix.normalize_symmetric(&norms)?;
        return Ok(KernelBlock {
            matrix,
            norms: Some(Norms::ones(n, n)),
        });
    }

    Ok(KernelBlock {
        matrix,
        norms: Some(Norms {
            rows: norms.clone(),
            cols: norms,
        }),
    })
}

fn asymmetric_block<S: AsRef<str>>(
    kernel: &dyn PairKernel,
    x: &[S],
    y: &[S],
    normalize: bool,
    with_norms: bool,
) -> Result<KernelBlock> {
    let (n, m) = (x.len(), y.len());
    debug!(
        "Asymmetric kernel: {}x{} sequences, k={}",
        n,
        m,
        kernel.subsequence_length()
    );

    let mut workspace = DpWorkspace::new();
    let mut matrix = KernelMatrix::zeros(n, m);
    for (i, a) in x.iter().enumerate() {
        for (j, b) in y.iter().enumerate() {
            matrix.set(i, j, kernel.compute_with(a.as_ref(), b.as_ref(), &mut workspace));
        }
    }

    if !(normalize || with_norms) {
        return Ok(KernelBlock {
            matrix,
            norms: None,
        });
    }

    let mut self_kernels = |set: &[S]| -> Vec<f64> {
        set.iter()
            .map(|s| kernel.compute_with(s.as_ref(), s.as_ref(), &mut workspace))
            .collect()
    };
    let norms = Norms {
        rows: self_kernels(x),
        cols: self_kernels(y),
    };

    if normalize {
        matrix.normalize_cross(&norms.rows, &norms.cols)?;
        return Ok(KernelBlock {
            matrix,
            norms: Some(Norms::ones(n, m)),
        });
    }

    Ok(KernelBlock {
        matrix,
        norms: Some(norms),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Engine;
    use crate::kernel::SubstitutionModel;
    use std::sync::Arc;

    fn words() -> Vec<&'static str> {
        vec!["caba", "gaba", "ciba", "siba"]
    }

    #[test]
    fn test_operands_detection() {
        let x = words();
        let y = words();
        let z = vec!["caba", "gaba"];
        assert!(Operands::new(&x, None).is_same());
        assert!(Operands::new(&x, Some(y.as_slice())).is_same());
        assert!(!Operands::new(&x, Some(z.as_slice())).is_same());
        assert_eq!(Operands::new(&x, Some(z.as_slice())).shape(), (4, 2));
    }

    #[test]
    fn test_symmetric_unnormalized_values() {
        let params = KernelParams::new(2, 0.5).with_normalize(false);
        let block = build_symmetric(&words(), &params).unwrap();
        let m = &block.matrix;
        assert_eq!(m.get(0, 0), 65.0 / 256.0);
        assert_eq!(m.get(0, 1), 9.0 / 64.0);
        assert_eq!(m.get(2, 3), 9.0 / 64.0);
        assert_eq!(m.get(3, 3), 57.0 / 256.0);
        assert!(m.is_symmetric(0.0));

        let norms = block.norms.unwrap();
        assert_eq!(norms.rows, m.diagonal());
        assert_eq!(norms.cols, m.diagonal());
    }

    #[test]
    fn test_symmetric_normalized() {
        let block = build_symmetric(&words(), &KernelParams::new(2, 0.5)).unwrap();
        let m = &block.matrix;
        assert_eq!(m.diagonal(), vec![1.0; 4]);
        assert!((m.get(0, 1) - 36.0 / 65.0).abs() < 1e-12);
        assert_eq!(block.norms.unwrap(), Norms::ones(4, 4));
    }

    #[test]
    fn test_symmetric_equals_asymmetric() {
        let x: Vec<&str> = words().into_iter().chain(words()).collect();
        for k in 1..4 {
            let params = KernelParams::new(k, 0.5).with_normalize(false);
            let sym = build_symmetric(&x, &params).unwrap();
            let asym = build_asymmetric(&x, &x, &params, true).unwrap();
            assert!(sym.matrix.max_abs_diff(&asym.matrix) < 1e-15);
            assert_eq!(sym.norms.unwrap().rows, asym.norms.unwrap().rows);
        }
    }

    #[test]
    fn test_asymmetric_normalized() {
        let x = vec!["caba", "ciba"];
        let y = vec!["gaba", "caba", "siba"];
        let params = KernelParams::new(2, 0.5);
        let block = build_matrix(&x, Some(y.as_slice()), &params, false).unwrap();
        assert_eq!(block.matrix.shape(), (2, 3));
        assert!((block.matrix.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((block.matrix.get(0, 0) - 36.0 / 65.0).abs() < 1e-12);
        assert_eq!(block.norms.unwrap(), Norms::ones(2, 3));
    }

    #[test]
    fn test_asymmetric_norms_only_when_requested() {
        let x = vec!["caba"];
        let y = vec!["gaba"];
        let params = KernelParams::new(2, 0.5).with_normalize(false);
        assert!(build_matrix(&x, Some(y.as_slice()), &params, false).unwrap().norms.is_none());

        let norms = build_matrix(&x, Some(y.as_slice()), &params, true).unwrap().norms.unwrap();
        assert_eq!(norms.rows, vec![65.0 / 256.0]);
        assert_eq!(norms.cols, vec![65.0 / 256.0]);
    }

    #[test]
    fn test_short_strings_use_identity() {
        let x = vec!["ab", "ab", "abcd"];
        let block = build_symmetric(&x, &KernelParams::new(3, 0.5).with_normalize(false)).unwrap();
        assert_eq!(block.matrix.get(0, 1), 1.0);
        assert_eq!(block.matrix.get(0, 2), 0.0);
        assert_eq!(block.matrix.get(0, 0), 1.0);
    }

    #[test]
    fn test_zero_norm_propagates_non_finite() {
        // With λ = 0 every self-kernel vanishes.
        let x = vec!["abc", "abd"];
        let block = build_symmetric(&x, &KernelParams::new(2, 0.0)).unwrap();
        assert!(block.matrix.get(0, 1).is_nan());
        assert_eq!(block.matrix.get(0, 0), 1.0);
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty: Vec<&str> = Vec::new();
        let params = KernelParams::new(2, 0.5);
        assert!(matches!(
            build_matrix(&empty, None, &params, false),
            Err(SSKError::EmptyInput)
        ));
        assert!(matches!(
            build_asymmetric(&words(), &empty, &params, false),
            Err(SSKError::EmptyInput)
        ));
    }

    #[test]
    fn test_soft_matching_validates_alphabet() {
        let params = KernelParams::new(2, 0.5)
            .with_soft_matching(Arc::new(SubstitutionModel::identity()));
        let good = vec!["CABA", "GABA"];
        let bad = vec!["CABA", "gaba"];
        assert!(build_matrix(&good, None, &params, false).is_ok());
        assert!(matches!(
            build_matrix(&bad, None, &params, false),
            Err(SSKError::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn test_explicit_engine_matrix() {
        let params = KernelParams::new(2, 0.5).with_normalize(false);
        let recursive = build_symmetric(&words(), &params).unwrap();
        let explicit =
            build_symmetric(&words(), &params.clone().with_engine(Engine::Explicit)).unwrap();
        assert!(recursive.matrix.max_abs_diff(&explicit.matrix) < 1e-12);
    }

    #[test]
    fn test_block_accumulate() {
        let params = KernelParams::new(1, 0.5).with_normalize(false);
        let mut a = build_symmetric(&words(), &params).unwrap();
        let b = build_symmetric(&words(), &params).unwrap();
        a.accumulate(&b).unwrap();
        assert_eq!(a.matrix.get(0, 0), 3.0);
        assert_eq!(a.norms.unwrap().rows[0], 3.0);

        let mut c = build_asymmetric(&words(), &words(), &params, false).unwrap();
        assert!(c.accumulate(&b).is_err());
    }
}
