//! Gap-weighted subsequence string kernels
//!
//! Based on "Text Classification using String Kernels" by Lodhi et al.,
//! with soft matching through letter substitution scores and a sum kernel
//! over a range of subsequence lengths.

pub mod aggregate;
pub mod api;
pub mod core;
pub mod data;
pub mod feature_map;
pub mod kernel;
pub mod matrix;
pub mod persistence;

// Re-export main types for convenience
pub use crate::aggregate::sum_kernel;
pub use crate::api::{FittedKernel, LabelledMatrix, SumStringKernel};
pub use crate::core::types::*;
pub use crate::core::{Result, SSKError};
pub use crate::data::SequenceSet;
pub use crate::feature_map::{explicit_features, FeatureMapper, FeatureMatrix};
pub use crate::kernel::{pair_kernel, PairKernel, SubsequenceKernel, SubstitutionModel};
pub use crate::matrix::{build_matrix, KernelMatrix};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
