//! Pair kernels for string comparison

pub mod explicit;
pub mod subsequence;
pub mod substitution;
pub mod traits;

pub use self::explicit::*;
pub use self::subsequence::*;
pub use self::substitution::*;
pub use self::traits::*;

use crate::core::alphabet::validate_sequence;
use crate::core::{Engine, KernelParams, MatchingMode, Result};

/// Instantiate the pair kernel implementation selected by `params.engine`
pub fn engine_for(params: &KernelParams) -> Result<Box<dyn PairKernel>> {
    match params.engine {
        Engine::Recursive => Ok(Box::new(SubsequenceKernel::from_params(params)?)),
        Engine::Explicit => Ok(Box::new(ExplicitKernel::from_params(params)?)),
    }
}

/// Unnormalized kernel value of a single pair for one subsequence length
///
/// # Errors
/// Configuration errors and, under soft matching, sequences containing
/// symbols outside `A..=Z` are reported before anything is computed.
pub fn pair_kernel(x: &str, y: &str, params: &KernelParams) -> Result<f64> {
    params.validate()?;
    if params.matching == MatchingMode::Soft {
        validate_sequence(x)?;
        validate_sequence(y)?;
    }
    let kernel = engine_for(params)?;
    Ok(kernel.compute(x, y))
}
