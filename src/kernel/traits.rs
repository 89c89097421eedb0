//! Pair kernel trait definition

use crate::kernel::DpWorkspace;

/// String kernel evaluated on a single pair of sequences
///
/// Implementations compute the unnormalized kernel value K(x, y) for one
/// fixed subsequence length. Normalization and matrix assembly are handled
/// by the matrix builder.
pub trait PairKernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &str, y: &str) -> f64;

    /// Compute K(x, y) reusing caller-owned scratch buffers
    ///
    /// Implementations that need no scratch space ignore the workspace.
    fn compute_with(&self, x: &str, y: &str, workspace: &mut DpWorkspace) -> f64 {
        let _ = workspace;
        self.compute(x, y)
    }

    /// Subsequence length this kernel compares
    fn subsequence_length(&self) -> usize;
}
