//! Ghost cell refresh
//!
//! The dynamic model needs valid ghost layers between its passes.
//! In a full solver this is the halo exchange of the grid framework;
//! here it is a trait with two single-block implementations.
use ndarray::{ArrayViewMut4, Axis};

/// Refresh the ghost layer of a cell-centered field (all components)
pub trait GhostFill {
    /// Overwrite ghost cells from interior data
    fn fill(&self, field: ArrayViewMut4<'_, f64>);
}

/// Periodic in all three directions
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodicGhosts;

/// Zero-gradient extrapolation in all three directions
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtrapolatedGhosts;

impl GhostFill for PeriodicGhosts {
    fn fill(&self, mut field: ArrayViewMut4<'_, f64>) {
        // axes one after another, so edges and corners are filled too
        for axis in 0..3 {
            let n = field.shape()[axis] - 2;
            copy_layer(&mut field, axis, n, 0);
            copy_layer(&mut field, axis, 1, n + 1);
        }
    }
}

impl GhostFill for ExtrapolatedGhosts {
    fn fill(&self, mut field: ArrayViewMut4<'_, f64>) {
        for axis in 0..3 {
            let n = field.shape()[axis] - 2;
            copy_layer(&mut field, axis, 1, 0);
            copy_layer(&mut field, axis, n, n + 1);
        }
    }
}

fn copy_layer(field: &mut ArrayViewMut4<'_, f64>, axis: usize, src: usize, dst: usize) {
    let layer = field.index_axis(Axis(axis), src).to_owned();
    field.index_axis_mut(Axis(axis), dst).assign(&layer);
}
