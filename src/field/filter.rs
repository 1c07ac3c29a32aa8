//! Spatial (test) filters
//!
//! The dynamic Smagorinsky model filters the resolved fields between
//! its two passes. Any filter implementing [`SpatialFilter`] can be
//! plugged into the pipeline.
use ndarray::{s, Array4, ArrayView4, ArrayViewMut4, Axis, Zip};

/// Filter acting on cell-centered fields with one ghost layer
pub trait SpatialFilter {
    /// Filter width in units of the grid spacing
    fn ratio(&self) -> f64;

    /// Filter all components of `input` and write the interior cells
    /// of `output`. Ghost cells of `output` are left untouched,
    /// ghost cells of `input` must be valid.
    fn apply(&self, input: ArrayView4<'_, f64>, output: ArrayViewMut4<'_, f64>);
}

/// Separable three point top-hat filter with weights (1/4, 1/2, 1/4)
/// along each axis, nominal width two grid cells.
///
/// # Example
///```
/// use rustles::field::filter::{BoxFilter, SpatialFilter};
/// use ndarray::Array4;
///
/// let input = Array4::<f64>::from_elem((6, 6, 6, 1), 2.5);
/// let mut output = Array4::<f64>::zeros((6, 6, 6, 1));
/// BoxFilter.apply(input.view(), output.view_mut());
/// assert_eq!(output[[3, 3, 3, 0]], 2.5);
///```
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxFilter;

impl BoxFilter {
    /// One sweep along `axis`; entries outside the interior range
    /// along `axis` keep the input value
    fn sweep(input: &Array4<f64>, axis: usize) -> Array4<f64> {
        let n = input.shape()[axis] - 2;
        let mut output = input.clone();
        let lo = input.slice_axis(Axis(axis), (0..n).into());
        let mid = input.slice_axis(Axis(axis), (1..n + 1).into());
        let hi = input.slice_axis(Axis(axis), (2..n + 2).into());
        Zip::from(output.slice_axis_mut(Axis(axis), (1..n + 1).into()))
            .and(&lo)
            .and(&mid)
            .and(&hi)
            .par_for_each(|out, &l, &m, &h| {
                // exact for constant fields
                *out = 0.5 * (m + 0.5 * (l + h));
            });
        output
    }
}

impl SpatialFilter for BoxFilter {
    fn ratio(&self) -> f64 {
        2.
    }

    fn apply(&self, input: ArrayView4<'_, f64>, mut output: ArrayViewMut4<'_, f64>) {
        let mut tmp = input.to_owned();
        for axis in 0..3 {
            tmp = Self::sweep(&tmp, axis);
        }
        output
            .slice_mut(s![1..-1, 1..-1, 1..-1, ..])
            .assign(&tmp.slice(s![1..-1, 1..-1, 1..-1, ..]));
    }
}
