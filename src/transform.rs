//! Fit / normalize / denormalize entry points
//!
//! These free functions accept either a bare [`Normalization`] family (a
//! fresh instance is fit on the spot) or a mutable [`Normalizer`], which is
//! fit lazily on first use and then reused.

use crate::element::Element;
use crate::errors::Result;
use crate::normalization::{Normalization, Normalizer};
use ndarray::{ArrayBase, ArrayD, Data, DataMut, IxDyn};

/// What to normalize with: an owned instance or a borrowed one whose fit is
/// kept by the caller.
#[derive(Debug)]
pub enum Target<'a, T> {
    Owned(Normalizer<T>),
    Borrowed(&'a mut Normalizer<T>),
}

impl<T: Element> From<Normalization> for Target<'_, T> {
    fn from(family: Normalization) -> Self {
        Target::Owned(Normalizer::new(family))
    }
}

impl<T> From<Normalizer<T>> for Target<'_, T> {
    fn from(normalizer: Normalizer<T>) -> Self {
        Target::Owned(normalizer)
    }
}

impl<'a, T> From<&'a mut Normalizer<T>> for Target<'a, T> {
    fn from(normalizer: &'a mut Normalizer<T>) -> Self {
        Target::Borrowed(normalizer)
    }
}

impl<T> Target<'_, T> {
    fn normalizer(&mut self) -> &mut Normalizer<T> {
        match self {
            Target::Owned(normalizer) => normalizer,
            Target::Borrowed(normalizer) => normalizer,
        }
    }
}

/// Fit `target` to `x`, reducing over `dims` (or the stored axes, or all axes).
///
/// # Errors
///
/// Returns an error if the axes are invalid for `x`.
pub fn fit<T, S>(
    target: impl Into<Normalizer<T>>,
    x: &ArrayBase<S, IxDyn>,
    dims: Option<&[usize]>,
) -> Result<Normalizer<T>>
where
    T: Element,
    S: Data<Elem = T>,
{
    let mut normalizer = target.into();
    normalizer.fit(x, dims)?;
    Ok(normalizer)
}

/// Normalize `x` in place.
///
/// An unfit target is fit against `x` first, using `dims` when given. A
/// target that is already fit keeps its own axes and parameters.
///
/// # Errors
///
/// Returns an error if fitting fails or the parameters do not broadcast
/// against `x`.
pub fn normalize_inplace<'a, T, S>(
    x: &mut ArrayBase<S, IxDyn>,
    target: impl Into<Target<'a, T>>,
    dims: Option<&[usize]>,
) -> Result<()>
where
    T: Element,
    S: DataMut<Elem = T>,
{
    let mut target = target.into();
    let normalizer = target.normalizer();
    if !normalizer.is_fit() {
        normalizer.fit(&*x, dims)?;
    }
    normalizer.normalize_inplace(x)
}

/// Normalized copy of `x`; see [`normalize_inplace`].
///
/// # Errors
///
/// Same as [`normalize_inplace`].
pub fn normalize<'a, T, S>(
    x: &ArrayBase<S, IxDyn>,
    target: impl Into<Target<'a, T>>,
    dims: Option<&[usize]>,
) -> Result<ArrayD<T>>
where
    T: Element,
    S: Data<Elem = T>,
{
    let mut out = x.to_owned();
    normalize_inplace(&mut out, target, dims)?;
    Ok(out)
}

/// Invert a fitted normalization in place.
///
/// # Errors
///
/// Returns [`NormError::UnfitNormalization`](crate::NormError::UnfitNormalization)
/// if `normalizer` has no parameters; fitting never happens here.
pub fn denormalize_inplace<T, S>(
    y: &mut ArrayBase<S, IxDyn>,
    normalizer: &Normalizer<T>,
) -> Result<()>
where
    T: Element,
    S: DataMut<Elem = T>,
{
    normalizer.denormalize_inplace(y)
}

/// Denormalized copy of `y`; see [`denormalize_inplace`].
///
/// # Errors
///
/// Same as [`denormalize_inplace`].
pub fn denormalize<T, S>(y: &ArrayBase<S, IxDyn>, normalizer: &Normalizer<T>) -> Result<ArrayD<T>>
where
    T: Element,
    S: Data<Elem = T>,
{
    normalizer.denormalize(y)
}

/// NaN-safe version of `target`: parameter estimation skips NaN values.
pub fn nan_safe<T: Element>(target: impl Into<Normalizer<T>>) -> Normalizer<T> {
    target.into().nan_safe()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NormError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn definition_target_fits_fresh_instance() {
        let x = array![[1.0, 2.0], [3.0, 6.0]].into_dyn();
        let y = normalize(&x, Normalization::MinMax, Some(&[0][..])).unwrap();
        assert_eq!(y, array![[0.0, 0.0], [1.0, 1.0]].into_dyn());
    }

    #[test]
    fn borrowed_target_keeps_fit() {
        let x = array![2.0, 4.0, 6.0].into_dyn();
        let mut n = Normalizer::new(Normalization::Center);
        let y = normalize(&x, &mut n, None).unwrap();
        assert_eq!(y, array![-2.0, 0.0, 2.0].into_dyn());
        assert!(n.is_fit());

        // already fit: parameters come from the first call
        let z = normalize(&array![10.0].into_dyn(), &mut n, None).unwrap();
        assert_abs_diff_eq!(z[[0]], 6.0);
    }

    #[test]
    fn denormalize_never_fits() {
        let n = Normalizer::<f64>::new(Normalization::ZScore);
        let mut y = array![0.0, 1.0].into_dyn();
        assert!(matches!(
            denormalize_inplace(&mut y, &n),
            Err(NormError::UnfitNormalization { .. })
        ));
        assert!(!n.is_fit());
    }

    #[test]
    fn nan_safe_wraps_definitions() {
        let n: Normalizer<f64> = nan_safe(Normalization::ZScore);
        assert!(n.is_nan_safe());
        assert!(!n.is_fit());
    }
}
