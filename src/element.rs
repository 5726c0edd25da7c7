//! Numeric element bound shared by statistics and transforms.

use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Floating-point element type accepted by every reducer and transform.
///
/// Implemented for any `Float` that can cross thread boundaries, which in
/// practice means `f32` and `f64`.
pub trait Element: Float + FromPrimitive + Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Float + FromPrimitive + Debug + Send + Sync + 'static {}

/// Convert an `f64` constant into `T`.
pub(crate) fn constant<T: Element>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}
