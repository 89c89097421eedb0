//! Sum kernel over a range of subsequence lengths
//!
//! The per-length kernels are independent, so they are built one task per
//! length, either sequentially or on a rayon pool, and reduced by
//! elementwise addition in ascending length order. Normalization, if
//! requested, happens once on the summed matrix using the summed norms.

use crate::core::{KernelConfig, Result, SSKError};
use crate::matrix::{KernelBlock, KernelMatrix, Operands};
use log::{debug, info};
use rayon::prelude::*;

/// Sum of the subsequence kernels for every k in `[min_k, max_k]`
///
/// `y == None`, or a `y` equal to `x`, selects the symmetric computation.
///
/// # Errors
/// Invalid configuration, an empty input set, symbols outside `A..=Z` under
/// soft matching, or a thread pool that cannot be started. The first failing
/// length aborts the whole computation.
pub fn sum_kernel<S>(x: &[S], y: Option<&[S]>, config: &KernelConfig) -> Result<KernelMatrix>
where
    S: AsRef<str> + Sync,
{
    config.validate()?;
    let operands = Operands::new(x, y);
    operands.check(config.matching)?;

    let same_set = operands.is_same();
    let want_norms = config.normalize && !same_set;
    let (rows, cols) = operands.shape();
    info!(
        "Sum kernel: {}x{} matrix, k in [{}, {}], lambda={}, {} workers",
        rows, cols, config.min_k, config.max_k, config.lambda, config.n_workers
    );

    let mut total = if config.n_workers == 1 {
        sequential_sum(&operands, config, want_norms)?
    } else {
        parallel_sum(&operands, config, want_norms)?
    };

    if config.normalize {
        let norms = total.norms.take().ok_or_else(|| {
            SSKError::InvalidParameter("Normalization requires self-kernel norms".to_string())
        })?;
        if same_set {
            total.matrix.normalize_symmetric(&norms.rows)?;
        } else {
            total.matrix.normalize_cross(&norms.rows, &norms.cols)?;
        }
    }

    Ok(total.matrix)
}

fn sequential_sum<S: AsRef<str>>(
    operands: &Operands<'_, S>,
    config: &KernelConfig,
    want_norms: bool,
) -> Result<KernelBlock> {
    let mut total: Option<KernelBlock> = None;
    for k in config.min_k..=config.max_k {
        debug!("Building kernel for k={k}");
        let block = operands.compute(&config.params_for(k), want_norms)?;
        match total.as_mut() {
            Some(sum) => sum.accumulate(&block)?,
            None => total = Some(block),
        }
    }
    total.ok_or_else(|| SSKError::InvalidParameter("Empty subsequence length range".to_string()))
}

fn parallel_sum<S: AsRef<str> + Sync>(
    operands: &Operands<'_, S>,
    config: &KernelConfig,
    want_norms: bool,
) -> Result<KernelBlock> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.n_workers)
        .build()
        .map_err(|e| SSKError::ThreadPool(e.to_string()))?;

    let lengths: Vec<usize> = (config.min_k..=config.max_k).collect();
    let blocks = pool.install(|| {
        lengths
            .par_iter()
            .map(|&k| {
                debug!("Building kernel for k={k}");
                operands.compute(&config.params_for(k), want_norms)
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut blocks = blocks.into_iter();
    let mut total = blocks
        .next()
        .ok_or_else(|| SSKError::InvalidParameter("Empty subsequence length range".to_string()))?;
    for block in blocks {
        total.accumulate(&block)?;
    }
    Ok(total)
}
