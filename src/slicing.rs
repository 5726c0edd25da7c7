//! Dimension-restricted slice mapping
//!
//! A *slice* spans every index along the axes listed in `dims` and a single
//! index along each remaining axis. The functions here enumerate all slices
//! of an array, hand each one to a closure on the Rayon pool, and either
//! rewrite the slice in place ([`map_over_axes`]) or collapse it to one value
//! ([`reduce_over_axes`]).
//!
//! Slices are carved out of the output with `split_at`, so every worker owns a
//! disjoint `ArrayViewMut` and no synchronization is needed.

use crate::errors::{NormError, Result};
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Axis, Dimension, IxDyn, Slice};
use rayon::prelude::*;
use tracing::trace;

/// Sort `dims`, rejecting duplicates and axes outside `0..ndim`.
pub fn validate_dims(dims: &[usize], ndim: usize) -> Result<Vec<usize>> {
    let mut sorted = dims.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(NormError::DuplicateAxis { axis: pair[0] });
        }
    }
    if let Some(&axis) = sorted.iter().find(|&&axis| axis >= ndim) {
        return Err(NormError::AxisOutOfRange { axis, ndim });
    }
    Ok(sorted)
}

/// Shape of a per-slice statistic: `shape` with every axis in `dims` set to 1.
pub fn parameter_shape(shape: &[usize], dims: &[usize]) -> Vec<usize> {
    shape
        .iter()
        .enumerate()
        .map(|(axis, &len)| if dims.contains(&axis) { 1 } else { len })
        .collect()
}

/// Axes of an `ndim`-dimensional array that are not in `dims`.
fn iterated_axes(dims: &[usize], ndim: usize) -> Vec<usize> {
    (0..ndim).filter(|axis| !dims.contains(axis)).collect()
}

/// Check that `operand` broadcasts against `shape` under `dims`.
///
/// Every axis must have length 1 or the reference length; on spanned axes the
/// operand is expected to be collapsed, on iterated axes it usually is not.
fn check_operand(shape: &[usize], operand: &[usize]) -> Result<()> {
    if operand.len() != shape.len() {
        return Err(NormError::RankMismatch {
            expected: shape.len(),
            found: operand.len(),
        });
    }
    for (axis, (&expected, &found)) in shape.iter().zip(operand).enumerate() {
        if found != expected && found != 1 {
            return Err(NormError::ShapeMismatch {
                axis,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Split `view` along `axis` into length-1 pieces, keeping the rank.
fn split_axis<'a, T>(mut view: ArrayViewMutD<'a, T>, axis: usize) -> Vec<ArrayViewMutD<'a, T>> {
    let len = view.len_of(Axis(axis));
    let mut pieces = Vec::with_capacity(len);
    for _ in 1..len {
        let (head, tail) = view.split_at(Axis(axis), 1);
        pieces.push(head);
        view = tail;
    }
    if len > 0 {
        pieces.push(view);
    }
    pieces
}

/// Enumerate every slice of `view`, paired with its index on the iterated axes.
///
/// Indices are full-rank; entries for spanned axes are 0.
fn split_slices<'a, T>(
    view: ArrayViewMutD<'a, T>,
    iterated: &[usize],
) -> Vec<(Vec<usize>, ArrayViewMutD<'a, T>)> {
    let mut slices = vec![(vec![0; view.ndim()], view)];
    for &axis in iterated {
        slices = slices
            .into_iter()
            .flat_map(|(index, piece)| {
                split_axis(piece, axis)
                    .into_iter()
                    .enumerate()
                    .map(move |(i, part)| {
                        let mut index = index.clone();
                        index[axis] = i;
                        (index, part)
                    })
            })
            .collect();
    }
    slices
}

/// Select the slice of `array` at `index` along the iterated axes.
///
/// Length-1 axes are kept whole so broadcast operands stay aligned.
fn select<'a, T>(
    array: &'a ArrayViewD<'_, T>,
    index: &[usize],
    iterated: &[usize],
) -> ArrayViewD<'a, T> {
    array.slice_each_axis(|desc| {
        let axis = desc.axis.index();
        if iterated.contains(&axis) && desc.len > 1 {
            Slice::from(index[axis]..index[axis] + 1)
        } else {
            Slice::from(..)
        }
    })
}

/// Broadcast each operand slice to `dim`.
fn broadcast_all<'a, T>(
    operands: &'a [ArrayViewD<'_, T>],
    dim: &IxDyn,
) -> Result<Vec<ArrayViewD<'a, T>>> {
    operands
        .iter()
        .map(|operand| {
            operand.broadcast(dim.clone()).ok_or_else(|| {
                let axis = operand
                    .shape()
                    .iter()
                    .zip(dim.slice())
                    .position(|(&found, &expected)| found != expected && found != 1)
                    .unwrap_or(0);
                NormError::ShapeMismatch {
                    axis,
                    expected: dim.slice().get(axis).copied().unwrap_or(0),
                    found: operand.shape().get(axis).copied().unwrap_or(0),
                }
            })
        })
        .collect()
}

/// Apply `f` to every slice of `target` spanning `dims`, in parallel.
///
/// `operands` are read-only arrays of the same rank as `target`; each is
/// sliced at the same iterated-axis index and broadcast to the slice's shape
/// before `f` sees it. When `dims` covers every axis `f` is called once on
/// the whole arrays.
///
/// # Errors
///
/// Returns an error if `dims` is invalid or an operand does not broadcast
/// against `target`. Validation happens before `f` is called on any slice.
pub fn map_over_axes<T, F>(
    f: F,
    dims: &[usize],
    target: ArrayViewMutD<'_, T>,
    operands: &[ArrayViewD<'_, T>],
) -> Result<()>
where
    T: Send + Sync,
    F: Fn(ArrayViewMutD<'_, T>, &[ArrayViewD<'_, T>]) + Sync,
{
    let ndim = target.ndim();
    let dims = validate_dims(dims, ndim)?;
    for operand in operands {
        check_operand(target.shape(), operand.shape())?;
    }

    if dims.len() == ndim {
        let dim = target.raw_dim();
        let views = broadcast_all(operands, &dim)?;
        f(target, &views);
        return Ok(());
    }

    let iterated = iterated_axes(&dims, ndim);
    let slices = split_slices(target, &iterated);
    trace!(
        slices = slices.len(),
        threads = rayon::current_num_threads(),
        "mapping over slices"
    );

    slices.into_par_iter().try_for_each(|(index, piece)| {
        let selected: Vec<ArrayViewD<'_, T>> = operands
            .iter()
            .map(|operand| select(operand, &index, &iterated))
            .collect();
        let dim = piece.raw_dim();
        let views = broadcast_all(&selected, &dim)?;
        f(piece, &views);
        Ok(())
    })
}

/// Collapse every slice of `x` spanning `dims` to the single value `f(slice)`.
///
/// The result has the shape of `x` with every axis in `dims` set to 1.
///
/// # Errors
///
/// Returns an error if `dims` contains duplicates or out-of-range axes.
pub fn reduce_over_axes<T, F>(f: F, dims: &[usize], x: ArrayViewD<'_, T>) -> Result<ArrayD<T>>
where
    T: Clone + Send + Sync,
    F: Fn(ArrayViewD<'_, T>) -> T + Sync,
{
    let ndim = x.ndim();
    let dims = validate_dims(dims, ndim)?;
    let shape = parameter_shape(x.shape(), &dims);

    if dims.len() == ndim {
        return Ok(ArrayD::from_elem(shape, f(x)));
    }

    let iterated = iterated_axes(&dims, ndim);
    let mut values: Vec<Option<T>> = vec![None; shape.iter().product()];
    {
        let out = ArrayViewMutD::from_shape(IxDyn(&shape), values.as_mut_slice())?;
        let slices = split_slices(out, &iterated);
        trace!(
            slices = slices.len(),
            threads = rayon::current_num_threads(),
            "reducing over slices"
        );
        slices.into_par_iter().for_each(|(index, mut cell)| {
            let value = f(select(&x, &index, &iterated));
            cell.fill(Some(value));
        });
    }

    let values = values.into_iter().flatten().collect::<Vec<T>>();
    Ok(ArrayD::from_shape_vec(shape, values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};

    #[test]
    fn validate_dims_sorts_and_rejects() {
        assert_eq!(validate_dims(&[2, 0], 3).unwrap(), vec![0, 2]);
        assert!(matches!(
            validate_dims(&[1, 1], 3),
            Err(NormError::DuplicateAxis { axis: 1 })
        ));
        assert!(matches!(
            validate_dims(&[3], 3),
            Err(NormError::AxisOutOfRange { axis: 3, ndim: 3 })
        ));
    }

    #[test]
    fn parameter_shape_collapses_dims() {
        assert_eq!(parameter_shape(&[2, 3, 4], &[0, 2]), vec![1, 3, 1]);
        assert_eq!(parameter_shape(&[5], &[0]), vec![1]);
    }

    #[test]
    fn reduce_sums_each_column() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
        let sums = reduce_over_axes(|s| s.sum(), &[0], x.view()).unwrap();
        assert_eq!(sums.shape(), &[1, 3]);
        assert_eq!(sums, array![[5.0, 7.0, 9.0]].into_dyn());
    }

    #[test]
    fn reduce_over_every_axis_is_global() {
        let x = Array::from_shape_fn((2, 3, 4), |(i, j, k)| (i * 12 + j * 4 + k) as f64).into_dyn();
        let sums = reduce_over_axes(|s| s.sum(), &[0, 1, 2], x.view()).unwrap();
        assert_eq!(sums.shape(), &[1, 1, 1]);
        assert_eq!(sums[[0, 0, 0]], (0..24).sum::<usize>() as f64);
    }

    #[test]
    fn map_subtracts_broadcast_row_means() {
        let mut x = array![[1.0, 2.0, 3.0], [4.0, 6.0, 8.0]].into_dyn();
        let means = array![[2.0], [6.0]].into_dyn();
        map_over_axes(
            |mut slice, ops| {
                slice.zip_mut_with(&ops[0], |v, &m| *v -= m);
            },
            &[1],
            x.view_mut(),
            &[means.view()],
        )
        .unwrap();
        assert_eq!(x, array![[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0]].into_dyn());
    }

    #[test]
    fn map_with_full_shaped_operand() {
        let mut x = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let y = array![[10.0, 20.0], [30.0, 40.0]].into_dyn();
        map_over_axes(
            |mut slice, ops| slice.zip_mut_with(&ops[0], |v, &w| *v += w),
            &[0],
            x.view_mut(),
            &[y.view()],
        )
        .unwrap();
        assert_eq!(x, array![[11.0, 22.0], [33.0, 44.0]].into_dyn());
    }

    #[test]
    fn map_rejects_mismatched_operand() {
        let mut x = Array::<f64, _>::zeros((2, 3)).into_dyn();
        let bad = Array::<f64, _>::zeros((2, 2)).into_dyn();
        let err = map_over_axes(|_, _| {}, &[0], x.view_mut(), &[bad.view()]).unwrap_err();
        assert!(matches!(
            err,
            NormError::ShapeMismatch {
                axis: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn map_visits_every_slice_once() {
        let mut x = Array::<f64, _>::zeros((3, 4, 5)).into_dyn();
        map_over_axes(|mut slice, _| slice += 1.0, &[1], x.view_mut(), &[]).unwrap();
        assert!(x.iter().all(|&v| v == 1.0));
    }
}
