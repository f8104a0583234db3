//! Array helpers for building dense parameter grids.

use ndarray::{ArrayD, ArrayView1, IxDyn};

use crate::{PlotError, PlotResult};

/// Orients a 1-D sequence along `dim` and broadcasts it to `shape`.
///
/// The result has exactly `shape`; its values vary only along `dim` and are
/// repeated across every other axis. Flattening several oriented grids of the
/// same shape gives matching columns for a dataframe, one row per grid point.
///
/// # Errors
/// Returns [`PlotError::DimensionMismatch`] if `dim` is not an axis of `shape`
/// or if `a.len() != shape[dim]`.
///
/// # Examples
/// ```
/// use frameplot::orient_and_broadcast;
///
/// let x = [1.0, 2.0, 3.0];
/// let grid = orient_and_broadcast(&x, 0, &[3, 2]).unwrap();
/// assert_eq!(grid.shape(), &[3, 2]);
/// assert_eq!(grid[[2, 1]], 3.0);
/// ```
pub fn orient_and_broadcast<T: Clone>(a: &[T], dim: usize, shape: &[usize]) -> PlotResult<ArrayD<T>> {
    let Some(&target) = shape.get(dim) else {
        return Err(PlotError::dimension_mismatch(format!(
            "axis {dim} is out of range for a shape of rank {}",
            shape.len()
        )));
    };
    if a.len() != target {
        return Err(PlotError::dimension_mismatch(format!(
            "sequence of length {} cannot be oriented along axis {dim} of size {target}",
            a.len()
        )));
    }

    // Singleton everywhere except `dim`, so broadcasting only repeats.
    let mut oriented = vec![1; shape.len()];
    oriented[dim] = target;

    let view = ArrayView1::from(a)
        .into_shape_with_order(IxDyn(&oriented))
        .map_err(|e| PlotError::dimension_mismatch(e.to_string()))?;

    view.broadcast(IxDyn(shape))
        .map(|b| b.to_owned())
        .ok_or_else(|| {
            PlotError::dimension_mismatch(format!("cannot broadcast {oriented:?} to {shape:?}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Axis;

    #[test]
    fn test_output_shape_matches_request() {
        let a = [1, 2, 3];
        let out = orient_and_broadcast(&a, 1, &[4, 3, 2]).expect("broadcast failed");
        assert_eq!(out.shape(), &[4, 3, 2]);
    }

    #[test]
    fn test_every_lane_reproduces_input() {
        let a = [10.0, 20.0, 30.0, 40.0];
        for dim in 0..3 {
            let mut shape = vec![2, 3, 5];
            shape.insert(dim, a.len());
            let out = orient_and_broadcast(&a, dim, &shape).expect("broadcast failed");

            let mut lanes = 0;
            for lane in out.lanes(Axis(dim)) {
                assert_eq!(lane.to_vec(), a.to_vec());
                lanes += 1;
            }
            // One lane per combination of the other axes
            assert_eq!(lanes, 2 * 3 * 5);
        }
    }

    #[test]
    fn test_values_constant_off_axis() {
        let a = [-1, 0, 1];
        let out = orient_and_broadcast(&a, 0, &[3, 4]).expect("broadcast failed");
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(out[[i, j]], a[i]);
            }
        }
    }

    #[test]
    fn test_grid_arithmetic() {
        // y = a * x + b over a 3 x 2 x 2 grid
        let shape = [3, 2, 2];
        let x = orient_and_broadcast(&[-1.0, 0.0, 1.0], 0, &shape).expect("x");
        let a = orient_and_broadcast(&[1.0, 2.0], 1, &shape).expect("a");
        let b = orient_and_broadcast(&[0.0, 5.0], 2, &shape).expect("b");

        let y = &a * &x + &b;
        assert_eq!(y[[0, 1, 1]], 2.0 * -1.0 + 5.0);
        assert_eq!(y[[2, 0, 0]], 1.0);
        assert_eq!(y.len(), 12);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let result = orient_and_broadcast(&[1, 2, 3], 0, &[4, 2]);
        assert!(matches!(result, Err(PlotError::DimensionMismatch(_))));
    }

    #[test]
    fn test_axis_out_of_range_fails() {
        let result = orient_and_broadcast(&[1, 2], 2, &[2, 2]);
        assert!(matches!(result, Err(PlotError::DimensionMismatch(_))));
    }
}
