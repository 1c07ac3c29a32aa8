//! Some useful functions to set up primitive fields
use super::Grid;
use crate::layout::StateLayout;
use ndarray::{Array4, ArrayBase, Data, Dimension, Zip};

/// Cell center coordinate of array index `i` along `axis`
pub fn cell_center(grid: &Grid, i: usize, axis: usize) -> f64 {
    (i as f64 - 0.5) * grid.dx[axis]
}

/// Return l2 norm of real array
pub fn norm_l2<S: Data<Elem = f64>, D: Dimension>(array: &ArrayBase<S, D>) -> f64 {
    array.iter().map(|x| x.powi(2)).sum::<f64>().sqrt()
}

/// Primitive field in a uniform state, ghost cells included
///
/// # Panics
/// Number of mass fractions does not match the layout
pub fn uniform_state(
    grid: &Grid,
    layout: &StateLayout,
    rho: f64,
    vel: [f64; 3],
    temp: f64,
    massfrac: &[f64],
) -> Array4<f64> {
    assert!(
        massfrac.len() == layout.nspecies,
        "Expected {} mass fractions, got {}",
        layout.nspecies,
        massfrac.len()
    );
    let mut q = grid.zeros(layout.ncomp());
    for mut state in q.lanes_mut(ndarray::Axis(3)) {
        state[layout.rho] = rho;
        for m in 0..3 {
            state[layout.vel[m]] = vel[m];
        }
        state[layout.temp] = temp;
        for (k, y) in massfrac.iter().enumerate() {
            state[layout.species(k)] = *y;
        }
    }
    q
}

/// Add a linear shear profile `u_m += gamma * x_axis`, ghost cells included
pub fn apply_shear(
    q: &mut Array4<f64>,
    grid: &Grid,
    layout: &StateLayout,
    m: usize,
    axis: usize,
    gamma: f64,
) {
    let comp = layout.vel[m];
    for ((i, j, k, c), v) in q.indexed_iter_mut() {
        if c == comp {
            *v += gamma * cell_center(grid, [i, j, k][axis], axis);
        }
    }
}

/// Add a Taylor-Green vortex of amplitude `amp` to the velocity,
/// periodic over the interior of the grid
pub fn apply_taylor_green(q: &mut Array4<f64>, grid: &Grid, layout: &StateLayout, amp: f64) {
    use std::f64::consts::PI;
    let length = [
        grid.n[0] as f64 * grid.dx[0],
        grid.n[1] as f64 * grid.dx[1],
        grid.n[2] as f64 * grid.dx[2],
    ];
    let [cu, cv, _] = layout.vel;
    for ((i, j, k, c), v) in q.indexed_iter_mut() {
        let x = 2. * PI * cell_center(grid, i, 0) / length[0];
        let y = 2. * PI * cell_center(grid, j, 1) / length[1];
        let z = 2. * PI * cell_center(grid, k, 2) / length[2];
        if c == cu {
            *v += amp * x.sin() * y.cos() * z.cos();
        } else if c == cv {
            *v -= amp * x.cos() * y.sin() * z.cos();
        }
    }
}

/// Add random disturbance [-c, c] to component `comp`
pub fn random_disturbance(q: &mut Array4<f64>, comp: usize, c: f64) {
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    let shape = q.shape();
    let rand = ndarray::Array3::<f64>::random((shape[0], shape[1], shape[2]), Uniform::new(-c, c));
    Zip::from(q.index_axis_mut(ndarray::Axis(3), comp))
        .and(&rand)
        .for_each(|v, &r| *v += r);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_state() {
        let grid = Grid::new([3, 3, 3], [1., 1., 1.]);
        let layout = StateLayout::new(2);
        let q = uniform_state(&grid, &layout, 1.2, [1., 2., 3.], 300., &[0.3, 0.7]);
        assert_eq!(q[[0, 2, 4, layout.rho]], 1.2);
        assert_eq!(q[[1, 1, 1, layout.vel[2]]], 3.);
        assert_eq!(q[[4, 4, 4, layout.species(1)]], 0.7);
    }

    #[test]
    fn test_shear_profile() {
        let grid = Grid::new([3, 3, 3], [0.5, 0.5, 0.5]);
        let layout = StateLayout::new(1);
        let mut q = uniform_state(&grid, &layout, 1., [0., 0., 0.], 300., &[1.]);
        apply_shear(&mut q, &grid, &layout, 0, 1, 2.);
        let du = q[[1, 2, 1, layout.vel[0]]] - q[[1, 1, 1, layout.vel[0]]];
        assert!((du - 1.).abs() < 1e-14);
        assert_eq!(q[[1, 2, 1, layout.vel[1]]], 0.);
    }

    #[test]
    fn test_random_disturbance_bounds() {
        let grid = Grid::new([4, 4, 4], [1., 1., 1.]);
        let mut q = grid.zeros(2);
        random_disturbance(&mut q, 1, 0.1);
        let disturbed = q.index_axis(ndarray::Axis(3), 1);
        assert!(disturbed.iter().all(|v| v.abs() <= 0.1));
        assert!(q.index_axis(ndarray::Axis(3), 0).iter().all(|v| *v == 0.));
    }
}
