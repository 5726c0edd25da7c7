//! Scalar statistic kernels over flat value buffers
//!
//! Kernels assume NaN handling has already happened: callers either filter
//! NaN values out or short-circuit to NaN before calling in here.

use crate::element::{constant, Element};
use num_traits::Float;
use std::cmp::Ordering;

/// Divisor turning an interquartile range into a standard-deviation estimate
/// for normally distributed data.
pub const IQR_TO_STD: f64 = 1.35;

/// Arithmetic mean; NaN for an empty buffer.
pub fn mean<T: Element>(values: &[T]) -> T {
    if values.is_empty() {
        return T::nan();
    }
    let sum = values.iter().fold(T::zero(), |acc, &v| acc + v);
    sum / count::<T>(values.len())
}

/// Sample standard deviation (`n - 1` denominator); NaN below two values.
pub fn std<T: Element>(values: &[T]) -> T {
    if values.len() < 2 {
        return T::nan();
    }
    let m = mean(values);
    let ss = values.iter().fold(T::zero(), |acc, &v| acc + (v - m) * (v - m));
    (ss / count::<T>(values.len() - 1)).sqrt()
}

/// Smallest value; NaN for an empty buffer.
pub fn min<T: Element>(values: &[T]) -> T {
    values.iter().copied().reduce(Float::min).unwrap_or_else(T::nan)
}

/// Largest value; NaN for an empty buffer.
pub fn max<T: Element>(values: &[T]) -> T {
    values.iter().copied().reduce(Float::max).unwrap_or_else(T::nan)
}

/// Euclidean norm `sqrt(sum(x^2))`.
pub fn energy<T: Element>(values: &[T]) -> T {
    if values.is_empty() {
        return T::nan();
    }
    values.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt()
}

/// Root mean square `sqrt(mean(x^2))`.
pub fn rms<T: Element>(values: &[T]) -> T {
    if values.is_empty() {
        return T::nan();
    }
    let ss = values.iter().fold(T::zero(), |acc, &v| acc + v * v);
    (ss / count::<T>(values.len())).sqrt()
}

/// Sort in place, ascending.
pub fn sort<T: Element>(values: &mut [T]) {
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Quantile of an ascending buffer, interpolating linearly between order
/// statistics at position `(n - 1) * p`.
pub fn quantile_sorted<T: Element>(sorted: &[T], p: f64) -> T {
    let n = sorted.len();
    if n == 0 {
        return T::nan();
    }
    if n == 1 {
        return sorted[0];
    }
    let h = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = constant::<T>(h - lower as f64);
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Median of an ascending buffer.
pub fn median_sorted<T: Element>(sorted: &[T]) -> T {
    quantile_sorted(sorted, 0.5)
}

/// `(q75 - q25) / 1.35` of an ascending buffer.
pub fn robust_scale_sorted<T: Element>(sorted: &[T]) -> T {
    let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
    iqr / constant::<T>(IQR_TO_STD)
}

fn count<T: Element>(n: usize) -> T {
    T::from_usize(n).unwrap_or_else(T::nan)
}
