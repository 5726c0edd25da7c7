//! Normalization instances bound to axes and fitted parameters

use super::family::Normalization;
use crate::element::Element;
use crate::errors::{NormError, Result};
use crate::slicing::{map_over_axes, validate_dims};
use crate::statistics::{Statistic, StatisticalReduction};
use ndarray::{ArrayBase, ArrayD, ArrayViewD, ArrayViewMutD, Data, DataMut, IxDyn, Zip};
use tracing::debug;

/// A normalization family bound to the axes it reduces over and, once fit,
/// to one parameter array per estimator.
///
/// `dims` lists the axes each statistic is computed over; every parameter
/// array has the input's shape with those axes collapsed to length 1, so it
/// broadcasts against the data in [`normalize`](Self::normalize) and
/// [`denormalize`](Self::denormalize). `None` means every axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer<T = f64> {
    family: Normalization,
    statistics: Vec<Statistic>,
    skip_nan: bool,
    dims: Option<Vec<usize>>,
    params: Option<Vec<ArrayD<T>>>,
}

impl<T: Element> Normalizer<T> {
    /// Unfit instance of `family` reducing over every axis.
    #[must_use]
    pub fn new(family: Normalization) -> Self {
        Self {
            family,
            statistics: family.statistics(),
            skip_nan: false,
            dims: None,
            params: None,
        }
    }

    /// Unfit instance sharing `other`'s family, estimators and NaN handling.
    #[must_use]
    pub fn like(other: &Self) -> Self {
        Self {
            family: other.family,
            statistics: other.statistics.clone(),
            skip_nan: other.skip_nan,
            dims: None,
            params: None,
        }
    }

    /// Instance with explicit parameters.
    ///
    /// When `dims` is `None` it is taken to be every axis on which the
    /// parameters have length 1.
    ///
    /// # Errors
    ///
    /// - [`NormError::ParameterCount`] if `params` does not match the family's arity
    /// - [`NormError::InconsistentParameterDimensions`] if the parameter arrays
    ///   disagree on rank or on any axis length
    /// - [`NormError::AxisOutOfRange`] / [`NormError::DuplicateAxis`] for bad `dims`
    /// - [`NormError::ShapeMismatch`] if a parameter is not collapsed on an axis in `dims`
    pub fn with_params(
        family: Normalization,
        dims: Option<Vec<usize>>,
        params: Vec<ArrayD<T>>,
    ) -> Result<Self> {
        if params.len() != family.arity() {
            return Err(NormError::ParameterCount {
                family: family.name().to_string(),
                expected: family.arity(),
                found: params.len(),
            });
        }
        let expected = params[0].shape().to_vec();
        for (index, param) in params.iter().enumerate().skip(1) {
            if param.shape() != expected.as_slice() {
                return Err(NormError::InconsistentParameterDimensions {
                    index,
                    expected,
                    found: param.shape().to_vec(),
                });
            }
        }

        let dims = match dims {
            Some(dims) => {
                let dims = validate_dims(&dims, expected.len())?;
                if let Some(&axis) = dims.iter().find(|&&axis| expected[axis] != 1) {
                    return Err(NormError::ShapeMismatch {
                        axis,
                        expected: 1,
                        found: expected[axis],
                    });
                }
                dims
            }
            None => (0..expected.len()).filter(|&axis| expected[axis] == 1).collect(),
        };

        Ok(Self {
            family,
            statistics: family.statistics(),
            skip_nan: false,
            dims: Some(dims),
            params: Some(params),
        })
    }

    /// Set the axes to reduce over.
    ///
    /// Axes are sorted; the rank check happens at fit time.
    ///
    /// # Errors
    ///
    /// Returns [`NormError::DuplicateAxis`] if an axis is listed twice.
    pub fn with_dims(mut self, dims: impl Into<Vec<usize>>) -> Result<Self> {
        self.dims = Some(validate_dims(&dims.into(), usize::MAX)?);
        Ok(self)
    }

    /// Replace the parameter estimators, keeping the family's transforms.
    ///
    /// # Errors
    ///
    /// Returns [`NormError::ParameterCount`] if the number of estimators
    /// differs from the family's arity.
    pub fn with_statistics(mut self, statistics: Vec<Statistic>) -> Result<Self> {
        if statistics.len() != self.family.arity() {
            return Err(NormError::ParameterCount {
                family: self.family.name().to_string(),
                expected: self.family.arity(),
                found: statistics.len(),
            });
        }
        self.statistics = statistics;
        Ok(self)
    }

    /// Estimate parameters with NaN values removed from every slice.
    ///
    /// Transforms still propagate NaN elementwise. Parameters already fit are
    /// kept until the next [`fit`](Self::fit).
    #[must_use]
    pub fn nan_safe(mut self) -> Self {
        self.skip_nan = true;
        self
    }

    /// Family this instance normalizes with.
    #[must_use]
    pub fn family(&self) -> Normalization {
        self.family
    }

    /// Estimators producing the parameters, one per parameter.
    #[must_use]
    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    /// Axes reduced over; `None` until set or fit.
    #[must_use]
    pub fn dims(&self) -> Option<&[usize]> {
        self.dims.as_deref()
    }

    /// Fitted parameters, each collapsed to length 1 on `dims`.
    #[must_use]
    pub fn params(&self) -> Option<&[ArrayD<T>]> {
        self.params.as_deref()
    }

    /// Whether parameters are available.
    #[must_use]
    pub fn is_fit(&self) -> bool {
        self.params.is_some()
    }

    /// Whether fitting skips NaN values.
    #[must_use]
    pub fn is_nan_safe(&self) -> bool {
        self.skip_nan
    }

    /// Estimate parameters from `x`, replacing any previous fit.
    ///
    /// `dims` overrides the stored axes; with neither, every axis is reduced.
    /// `x` is never modified, and on error the instance is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`NormError::AxisOutOfRange`] or [`NormError::DuplicateAxis`]
    /// if the axes do not fit `x`.
    pub fn fit<S>(&mut self, x: &ArrayBase<S, IxDyn>, dims: Option<&[usize]>) -> Result<&mut Self>
    where
        S: Data<Elem = T>,
    {
        let dims = match dims.or(self.dims.as_deref()) {
            Some(dims) => validate_dims(dims, x.ndim())?,
            None => (0..x.ndim()).collect(),
        };

        debug!(
            family = self.family.name(),
            ?dims,
            shape = ?x.shape(),
            nan_safe = self.skip_nan,
            "fitting normalization"
        );

        let params = self
            .statistics
            .iter()
            .map(|&statistic| x.reduce_over_dims(&dims, statistic, self.skip_nan))
            .collect::<Result<Vec<_>>>()?;

        self.dims = Some(dims);
        self.params = Some(params);
        Ok(self)
    }

    /// Fitted copy of this instance; `self` is left as it was.
    ///
    /// # Errors
    ///
    /// Same as [`fit`](Self::fit).
    pub fn fitted<S>(&self, x: &ArrayBase<S, IxDyn>, dims: Option<&[usize]>) -> Result<Self>
    where
        S: Data<Elem = T>,
    {
        let mut copy = self.clone();
        copy.fit(x, dims)?;
        Ok(copy)
    }

    /// Normalize `x` in place, fitting against it first if unfit.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails or the parameters do not broadcast
    /// against `x`.
    pub fn normalize_inplace<S>(&mut self, x: &mut ArrayBase<S, IxDyn>) -> Result<()>
    where
        S: DataMut<Elem = T>,
    {
        if !self.is_fit() {
            self.fit(&*x, None)?;
        }
        self.apply(x.view_mut(), false)
    }

    /// Normalized copy of `x`, fitting against it first if unfit.
    ///
    /// # Errors
    ///
    /// Same as [`normalize_inplace`](Self::normalize_inplace).
    pub fn normalize<S>(&mut self, x: &ArrayBase<S, IxDyn>) -> Result<ArrayD<T>>
    where
        S: Data<Elem = T>,
    {
        let mut out = x.to_owned();
        self.normalize_inplace(&mut out)?;
        Ok(out)
    }

    /// Invert the normalization of `y` in place.
    ///
    /// # Errors
    ///
    /// Returns [`NormError::UnfitNormalization`] if the instance has not been
    /// fit, or a shape error if the parameters do not broadcast against `y`.
    pub fn denormalize_inplace<S>(&self, y: &mut ArrayBase<S, IxDyn>) -> Result<()>
    where
        S: DataMut<Elem = T>,
    {
        self.apply(y.view_mut(), true)
    }

    /// Denormalized copy of `y`.
    ///
    /// # Errors
    ///
    /// Same as [`denormalize_inplace`](Self::denormalize_inplace).
    pub fn denormalize<S>(&self, y: &ArrayBase<S, IxDyn>) -> Result<ArrayD<T>>
    where
        S: Data<Elem = T>,
    {
        let mut out = y.to_owned();
        self.denormalize_inplace(&mut out)?;
        Ok(out)
    }

    fn apply(&self, x: ArrayViewMutD<'_, T>, inverse: bool) -> Result<()> {
        let params = self.params.as_ref().ok_or_else(|| NormError::UnfitNormalization {
            family: self.family.name().to_string(),
        })?;
        let dims = self
            .dims
            .clone()
            .unwrap_or_else(|| (0..x.ndim()).collect());
        let views: Vec<ArrayViewD<'_, T>> = params.iter().map(|p| p.view()).collect();

        debug!(
            family = self.family.name(),
            ?dims,
            shape = ?x.shape(),
            inverse,
            "applying normalization"
        );

        let family = self.family;
        let step = move |v: T, p: &[T]| {
            if inverse {
                family.inverse(v, p)
            } else {
                family.forward(v, p)
            }
        };

        map_over_axes(
            |mut slice, ps| match ps {
                [a] => Zip::from(slice.view_mut())
                    .and(a)
                    .for_each(|v, &p| *v = step(*v, &[p])),
                [a, b] => Zip::from(slice.view_mut())
                    .and(a)
                    .and(b)
                    .for_each(|v, &p, &q| *v = step(*v, &[p, q])),
                _ => unreachable!("normalization families take one or two parameters"),
            },
            &dims,
            x,
            &views,
        )
    }
}

impl<T: Element> From<Normalization> for Normalizer<T> {
    fn from(family: Normalization) -> Self {
        Self::new(family)
    }
}
