//! Parallel per-slice reductions for the built-in statistics
//!
//! Each function collapses every slice of `data` spanning `dims` on the Rayon
//! pool and returns an array of the input's rank with those axes set to 1.

use super::operations::{Statistic, StatisticalReduction};
use crate::element::Element;
use crate::errors::Result;
use ndarray::ArrayD;
use tracing::debug;

/// Reduce `data` over `dims` with `statistic`.
///
/// # Errors
///
/// Returns an error if `dims` contains duplicates or out-of-range axes.
pub fn parallel_reduce_dims<T: Element>(
    data: &ArrayD<T>,
    dims: &[usize],
    statistic: Statistic,
    skip_nan: bool,
) -> Result<ArrayD<T>> {
    debug!(
        statistic = statistic.as_str(),
        ?dims,
        shape = ?data.shape(),
        threads = rayon::current_num_threads(),
        "computing statistic over dimensions"
    );
    data.reduce_over_dims(dims, statistic, skip_nan)
}

/// Computes the mean of every slice spanning `dims`
///
/// # Errors
///
/// Returns an error if `dims` is invalid.
pub fn parallel_mean_dims<T: Element>(data: &ArrayD<T>, dims: &[usize]) -> Result<ArrayD<T>> {
    parallel_reduce_dims(data, dims, Statistic::Mean, false)
}

/// Computes the sample standard deviation of every slice spanning `dims`
///
/// # Errors
///
/// Returns an error if `dims` is invalid.
pub fn parallel_std_dims<T: Element>(data: &ArrayD<T>, dims: &[usize]) -> Result<ArrayD<T>> {
    parallel_reduce_dims(data, dims, Statistic::Std, false)
}

/// Computes the median of every slice spanning `dims`
///
/// # Errors
///
/// Returns an error if `dims` is invalid.
pub fn parallel_median_dims<T: Element>(data: &ArrayD<T>, dims: &[usize]) -> Result<ArrayD<T>> {
    parallel_reduce_dims(data, dims, Statistic::Median, false)
}

/// Computes the minimum of every slice spanning `dims`
///
/// # Errors
///
/// Returns an error if `dims` is invalid.
pub fn parallel_min_dims<T: Element>(data: &ArrayD<T>, dims: &[usize]) -> Result<ArrayD<T>> {
    parallel_reduce_dims(data, dims, Statistic::Min, false)
}

/// Computes the maximum of every slice spanning `dims`
///
/// # Errors
///
/// Returns an error if `dims` is invalid.
pub fn parallel_max_dims<T: Element>(data: &ArrayD<T>, dims: &[usize]) -> Result<ArrayD<T>> {
    parallel_reduce_dims(data, dims, Statistic::Max, false)
}

/// Computes `(q75 - q25) / 1.35` of every slice spanning `dims`
///
/// # Errors
///
/// Returns an error if `dims` is invalid.
pub fn parallel_robust_scale_dims<T: Element>(
    data: &ArrayD<T>,
    dims: &[usize],
) -> Result<ArrayD<T>> {
    parallel_reduce_dims(data, dims, Statistic::RobustScale, false)
}
