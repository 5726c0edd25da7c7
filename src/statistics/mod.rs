//! Statistical computations and parallel reduction operations
//!
//! This module provides the dimension-reducing statistics (mean, std, median,
//! min, max, robust and mixed scale) that normalization parameters are
//! estimated from.
//!
//! # Organization
//!
//! This module is organized into submodules:
//! - [`operations`]: The [`Statistic`] enum and the reduction trait
//! - [`parallel`]: Parallel per-slice reductions
//! - [`kernels`]: Scalar kernels over flat buffers

pub mod kernels;
pub mod operations;
pub mod parallel;

// Re-export the main types and functions for convenience
pub use operations::{Statistic, StatisticalReduction};
pub use parallel::{
    parallel_max_dims, parallel_mean_dims, parallel_median_dims, parallel_min_dims,
    parallel_reduce_dims, parallel_robust_scale_dims, parallel_std_dims,
};
