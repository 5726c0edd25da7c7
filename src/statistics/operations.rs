//! Core statistical operations and traits
//!
//! This module defines the dimension-reducing statistics used to estimate
//! normalization parameters.

use super::kernels;
use crate::element::Element;
use crate::errors::Result;
use crate::slicing::reduce_over_axes;
use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, IxDyn};
use serde::{Deserialize, Serialize};

/// Supported statistical operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Arithmetic mean
    Mean,
    /// Sample standard deviation (`n - 1` denominator)
    Std,
    /// Median (0.5 quantile)
    Median,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Interquartile range divided by 1.35
    RobustScale,
    /// Median, or mean when the robust scale is zero
    MixedCenter,
    /// Robust scale, or standard deviation when the robust scale is zero
    MixedScale,
    /// Euclidean norm
    Energy,
    /// Root mean square
    Rms,
}

impl Statistic {
    /// Get the string representation of the operation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Std => "std",
            Self::Median => "median",
            Self::Min => "minimum",
            Self::Max => "maximum",
            Self::RobustScale => "robust_scale",
            Self::MixedCenter => "mixed_center",
            Self::MixedScale => "mixed_scale",
            Self::Energy => "energy",
            Self::Rms => "rms",
        }
    }

    /// Robust counterpart used by `Robust*` normalization families.
    #[must_use]
    pub const fn robust(self) -> Self {
        match self {
            Self::Mean => Self::Median,
            Self::Std => Self::RobustScale,
            other => other,
        }
    }

    /// Shape-dependent counterpart used by `Mixed*` normalization families.
    #[must_use]
    pub const fn mixed(self) -> Self {
        match self {
            Self::Mean => Self::MixedCenter,
            Self::Std => Self::MixedScale,
            other => other,
        }
    }

    /// Collapse `values` to one number.
    ///
    /// With `skip_nan` the NaN entries are dropped first; otherwise a single
    /// NaN makes the result NaN. An empty (or all-NaN) input yields NaN.
    pub fn compute<'a, T, I>(self, values: I, skip_nan: bool) -> T
    where
        T: Element,
        I: IntoIterator<Item = &'a T>,
    {
        let mut buffer: Vec<T> = if skip_nan {
            values.into_iter().copied().filter(|v| !v.is_nan()).collect()
        } else {
            values.into_iter().copied().collect()
        };
        if buffer.iter().any(|v| v.is_nan()) {
            return T::nan();
        }

        match self {
            Self::Mean => kernels::mean(&buffer),
            Self::Std => kernels::std(&buffer),
            Self::Min => kernels::min(&buffer),
            Self::Max => kernels::max(&buffer),
            Self::Energy => kernels::energy(&buffer),
            Self::Rms => kernels::rms(&buffer),
            Self::Median => {
                kernels::sort(&mut buffer);
                kernels::median_sorted(&buffer)
            }
            Self::RobustScale => {
                kernels::sort(&mut buffer);
                kernels::robust_scale_sorted(&buffer)
            }
            Self::MixedCenter => {
                kernels::sort(&mut buffer);
                if kernels::robust_scale_sorted(&buffer) != T::zero() {
                    kernels::median_sorted(&buffer)
                } else {
                    kernels::mean(&buffer)
                }
            }
            Self::MixedScale => {
                kernels::sort(&mut buffer);
                let scale = kernels::robust_scale_sorted(&buffer);
                if scale != T::zero() {
                    scale
                } else {
                    kernels::std(&buffer)
                }
            }
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for arrays that can be reduced over a set of axes
pub trait StatisticalReduction<T> {
    /// Reduce every slice spanning `dims` to `statistic`.
    ///
    /// The result keeps the input's rank with every axis in `dims` collapsed
    /// to length 1.
    ///
    /// # Errors
    ///
    /// Returns an error if `dims` contains duplicates or out-of-range axes.
    fn reduce_over_dims(
        &self,
        dims: &[usize],
        statistic: Statistic,
        skip_nan: bool,
    ) -> Result<ArrayD<T>>;
}

impl<T, S> StatisticalReduction<T> for ArrayBase<S, IxDyn>
where
    T: Element,
    S: Data<Elem = T>,
{
    fn reduce_over_dims(
        &self,
        dims: &[usize],
        statistic: Statistic,
        skip_nan: bool,
    ) -> Result<ArrayD<T>> {
        reduce_over_axes(
            |slice: ArrayViewD<'_, T>| statistic.compute(slice.iter(), skip_nan),
            dims,
            self.view(),
        )
    }
}
