//! nd_normalize: reversible per-axis normalization of n-dimensional arrays
//!
//! nd_normalize estimates normalization parameters (mean and standard
//! deviation, min and max, median and interquartile scale, ...) over chosen
//! axes of an `ndarray` array, applies the forward transform, and inverts it
//! again. Slices are processed in parallel with Rayon.
//!
//! ## Key Features
//!
//! - **Transform Families**: z-score, sigmoid, min-max, centering, unit energy/power
//! - **Robust & Mixed Variants**: median/IQR estimators with a fallback for constant data
//! - **Any Axes**: parameters are estimated over any subset of axes and broadcast back
//! - **NaN-safe Fitting**: optional NaN filtering during parameter estimation
//! - **Parallel Processing**: disjoint slices are handled on the Rayon pool
//!
//! ## Module Organization
//!
//! - [`normalization`]: Family registry and fitted [`Normalizer`] instances
//! - [`transform`]: `fit` / `normalize` / `denormalize` entry points
//! - [`statistics`]: Dimension-reducing statistics
//! - [`slicing`]: The slice mapper behind fitting and applying
//! - [`config`]: JSON configuration
//! - [`parallel`]: Parallel processing configuration
//! - [`errors`]: Centralized error handling
//!
//! ## Usage
//!
//! ```rust
//! use nd_normalize::prelude::*;
//! use ndarray::array;
//!
//! // Normalize each column of a 2x3 matrix independently
//! let x = array![[1.0, 2.0, 3.0], [4.0, 6.0, 8.0]].into_dyn();
//! let mut z = Normalizer::new(Normalization::ZScore).with_dims(vec![0]).unwrap();
//! let y = z.normalize(&x).unwrap();
//! assert_eq!(z.params().unwrap()[0].shape(), &[1, 3]);
//!
//! // Recover the original data
//! let back = z.denormalize(&y).unwrap();
//! assert!((back[[1, 2]] - 8.0_f64).abs() < 1e-12);
//! ```

// Core modules
pub mod config;
pub mod element;
pub mod errors;
pub mod normalization;
pub mod parallel;
pub mod slicing;
pub mod statistics;
pub mod transform;

// Direct re-exports for the public API
pub use config::NormalizationConfig;
pub use element::Element;
pub use errors::{NormError, Result};
pub use normalization::{Normalization, Normalizer};
pub use parallel::{get_parallel_info, ParallelConfig, ParallelInfo};
pub use slicing::{map_over_axes, parameter_shape, reduce_over_axes, validate_dims};
pub use statistics::{Statistic, StatisticalReduction};
pub use transform::{
    denormalize, denormalize_inplace, fit, nan_safe, normalize, normalize_inplace, Target,
};

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::config::NormalizationConfig;
    pub use crate::errors::{NormError, Result};
    pub use crate::normalization::{Normalization, Normalizer};
    pub use crate::parallel::ParallelConfig;
    pub use crate::statistics::{Statistic, StatisticalReduction};
    pub use crate::transform::{denormalize, fit, nan_safe, normalize};
}
